use crate::{Event, KeyCode};
use imglabel_domain::{pos_to_canvas, PtF, ShapeF, ShapeI};

#[derive(Debug, Default)]
pub struct LastSensedBtns {
    pub btn_codes: Vec<KeyCode>,
    /// Where the buttons went down. egui reports a drag only after the pointer has left the
    /// click distance, so the latest position is off by that distance when the drag starts.
    pub press_pos: Option<egui::Pos2>,
}
impl LastSensedBtns {
    pub fn is_empty(&self) -> bool {
        self.btn_codes.is_empty()
    }
}

fn map_button(button: egui::PointerButton) -> KeyCode {
    match button {
        egui::PointerButton::Primary => KeyCode::MouseLeft,
        egui::PointerButton::Secondary => KeyCode::MouseRight,
        _ => KeyCode::DontCare,
    }
}

/// Pointer position in canvas coordinates. Positions outside are kept since drags may leave
/// the canvas.
pub fn pos_on_canvas(pos: egui::Pos2, canvas_rect: egui::Rect, shape_canvas: ShapeI) -> PtF {
    let rel = PtF {
        x: f64::from(pos.x - canvas_rect.min.x),
        y: f64::from(pos.y - canvas_rect.min.y),
    };
    let shape_displayed = ShapeF::new(
        f64::from(canvas_rect.width()),
        f64::from(canvas_rect.height()),
    );
    pos_to_canvas(rel, shape_displayed, shape_canvas)
}

/// Maps this frame's pointer input on the canvas to events. The second element is the screen
/// position where the button went down if a press is among the events.
pub fn map_mouse_events(
    ui: &mut egui::Ui,
    last_sensed: &mut LastSensedBtns,
    canvas_response: &egui::Response,
) -> (Vec<Event>, Option<egui::Pos2>) {
    let mut events = vec![];
    let mut btn_codes = LastSensedBtns::default();
    ui.input(|i| {
        for e in &i.events {
            if let egui::Event::PointerButton {
                pos,
                button,
                pressed: true,
                ..
            } = e
            {
                btn_codes.btn_codes.push(map_button(*button));
                btn_codes.press_pos = Some(*pos);
            }
        }
    });
    if !btn_codes.is_empty() {
        *last_sensed = btn_codes;
    }
    let left = last_sensed.btn_codes.contains(&KeyCode::MouseLeft);
    let right = last_sensed.btn_codes.contains(&KeyCode::MouseRight);
    let code = if left {
        Some(KeyCode::MouseLeft)
    } else if right {
        Some(KeyCode::MouseRight)
    } else {
        None
    };

    let mut press_pos = None;
    // a click is a press immediately followed by a release
    if let Some(code) = code
        && (canvas_response.clicked() || canvas_response.drag_started())
    {
        events.push(Event::Pressed(code));
        press_pos = last_sensed.press_pos;
    }
    if let Some(code) = code
        && canvas_response.dragged()
    {
        events.push(Event::Held(code));
    }
    if canvas_response.clicked()
        || canvas_response.secondary_clicked()
        || canvas_response.drag_stopped()
    {
        if let Some(code) = code {
            events.push(Event::Released(code));
        }
        *last_sensed = LastSensedBtns::default();
    }
    (events, press_pos)
}

#[test]
fn test_pos_on_canvas() {
    let rect = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(100.0, 50.0));
    let shape = ShapeI::new(100, 50);
    let p = pos_on_canvas(egui::pos2(15.0, 30.0), rect, shape);
    assert!(p.is_close_to((5.0, 10.0).into()));
    let outside = pos_on_canvas(egui::pos2(5.0, 20.0), rect, shape);
    assert!(outside.is_close_to((-5.0, 0.0).into()));
    // shrunk display
    let p = pos_on_canvas(egui::pos2(15.0, 30.0), rect, ShapeI::new(200, 100));
    assert!(p.is_close_to((10.0, 20.0).into()));
}

#[test]
fn test_map_button() {
    assert_eq!(map_button(egui::PointerButton::Primary), KeyCode::MouseLeft);
    assert_eq!(map_button(egui::PointerButton::Secondary), KeyCode::MouseRight);
    assert_eq!(map_button(egui::PointerButton::Middle), KeyCode::DontCare);
}
