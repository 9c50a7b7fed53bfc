use imglabel_domain::PtF;

macro_rules! action {
    ($name:ident, $action:ident) => {
        pub fn $name(&self, key_code: KeyCode) -> bool {
            self.events.iter().any(|a| match a {
                Event::$action(k) => k == &key_code,
                _ => false,
            })
        }
    };
}

/// Input of one frame in surface coordinates
#[derive(Debug, Clone, Default)]
pub struct Events {
    events: Vec<Event>,
    pub mouse_pos_on_canvas: Option<PtF>,
    /// Where the button of a press in this frame went down
    pub press_pos_on_canvas: Option<PtF>,
}

impl Events {
    pub fn mousepos_canvas(mut self, mouse_pos: Option<PtF>) -> Self {
        self.mouse_pos_on_canvas = mouse_pos;
        self
    }
    pub fn presspos_canvas(mut self, press_pos: Option<PtF>) -> Self {
        self.press_pos_on_canvas = press_pos;
        self
    }
    /// Position to start a manipulation from, falls back to the latest position
    pub fn press_pos(&self) -> Option<PtF> {
        self.press_pos_on_canvas.or(self.mouse_pos_on_canvas)
    }
    pub fn events(mut self, mut events: Vec<Event>) -> Self {
        self.events.append(&mut events);
        self
    }
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
    action!(pressed, Pressed);
    action!(held, Held);
    action!(released, Released);
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum KeyCode {
    MouseLeft,
    MouseRight,
    DontCare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Pressed(KeyCode),
    Released(KeyCode),
    Held(KeyCode),
}

#[test]
fn test_events() {
    let events = Events::default()
        .events(vec![
            Event::Pressed(KeyCode::MouseLeft),
            Event::Held(KeyCode::MouseLeft),
        ])
        .mousepos_canvas(Some((1.0, 2.0).into()));
    assert_eq!(events.press_pos(), Some((1.0, 2.0).into()));
    let events = events.presspos_canvas(Some((0.0, 1.0).into()));
    assert_eq!(events.press_pos(), Some((0.0, 1.0).into()));
    assert_eq!(events.mouse_pos_on_canvas, Some((1.0, 2.0).into()));
    assert!(events.pressed(KeyCode::MouseLeft));
    assert!(events.held(KeyCode::MouseLeft));
    assert!(!events.released(KeyCode::MouseLeft));
    assert!(!events.pressed(KeyCode::MouseRight));
    assert!(!events.is_empty());
    assert!(Events::default().is_empty());
}
