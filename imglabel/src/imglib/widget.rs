use crate::{
    args::ImageIdentity,
    canvas::AnnotationCanvas,
    color::Color,
    egui_mappers::{map_mouse_events, pos_on_canvas, LastSensedBtns},
    primitive::Primitive,
    report::ComponentHost,
    surface::Surface,
    Events,
};
use egui::{
    Color32, ColorImage, Context, CornerRadius, Pos2, Rect, Response, Sense, Stroke, StrokeKind,
    TextureHandle, TextureOptions, Ui, Vec2,
};
use image::RgbaImage;
use imglabel_domain::{axis_scales, canvas_to_pos, PtF, ShapeF, ShapeI};

pub const LABEL_ADD_BOX: &str = "create new box";
pub const LABEL_ADD_POINT: &str = "create new point";
pub const LABEL_REMOVE_SELECTED: &str = "remove selected box/point";
pub const LABEL_CLEAR_ALL: &str = "remove all boxes/points";

const SELECTED_STROKE_WIDTH: f32 = 2.0;
const HANDLE_SIZE: f32 = 6.0;

fn to_color32(color: Color) -> Color32 {
    let [r, g, b, a] = color.rgba;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn background_2_colorimage(im: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied([im.width() as usize, im.height() as usize], im.as_raw())
}

struct ScreenTransform {
    rect: Rect,
    shape_canvas: ShapeI,
}
impl ScreenTransform {
    fn shape_displayed(&self) -> ShapeF {
        ShapeF::new(f64::from(self.rect.width()), f64::from(self.rect.height()))
    }
    fn pos(&self, x: f64, y: f64) -> Pos2 {
        let p = canvas_to_pos(PtF { x, y }, self.shape_displayed(), self.shape_canvas);
        Pos2::new(self.rect.min.x + p.x as f32, self.rect.min.y + p.y as f32)
    }
    /// Radii scale with the width like the point size
    fn len(&self, l: f64) -> f32 {
        let (sx, _) = axis_scales(self.shape_canvas.into(), self.shape_displayed());
        (l * sx) as f32
    }
}

fn paint_primitive(painter: &egui::Painter, tf: &ScreenTransform, prim: &Primitive, selected: bool) {
    let stroke_width = match (prim, selected) {
        (Primitive::Box(b), false) => b.style.stroke_width as f32,
        (Primitive::Point(p), false) => p.style.stroke_width as f32,
        (_, true) => SELECTED_STROKE_WIDTH,
    };
    let stroke = Stroke::new(stroke_width, to_color32(prim.stroke_color()));
    match prim {
        Primitive::Box(_) => {
            let bb = prim.bounding_rect();
            let rect = Rect::from_min_max(
                tf.pos(bb.x, bb.y),
                tf.pos(bb.x + bb.w, bb.y + bb.h),
            );
            painter.rect_stroke(rect, CornerRadius::ZERO, stroke, StrokeKind::Inside);
            if selected {
                for corner in bb.points_iter() {
                    let handle = Rect::from_center_size(
                        tf.pos(corner.x, corner.y),
                        Vec2::splat(HANDLE_SIZE),
                    );
                    painter.rect_filled(handle, CornerRadius::ZERO, stroke.color);
                }
            }
        }
        Primitive::Point(p) => {
            let circle = p.circle();
            painter.circle(
                tf.pos(circle.center.x, circle.center.y),
                tf.len(circle.radius),
                to_color32(p.fill_color),
                stroke,
            );
        }
    }
}

fn paint_surface(painter: &egui::Painter, canvas_rect: Rect, surface: &Surface) {
    let tf = ScreenTransform {
        rect: canvas_rect,
        shape_canvas: surface.shape(),
    };
    for (idx, prim) in surface.objects().iter().enumerate() {
        paint_primitive(painter, &tf, prim, surface.selected() == Some(idx));
    }
}

/// egui state of a canvas that survives frames
#[derive(Default)]
pub struct CanvasView {
    texture: Option<TextureHandle>,
    texture_identity: Option<ImageIdentity>,
    last_sensed: LastSensedBtns,
}

impl CanvasView {
    fn update_texture<H: ComponentHost>(&mut self, ctx: &Context, canvas: &AnnotationCanvas<H>) {
        let identity = canvas.identity();
        if self.texture_identity != Some(identity) {
            self.texture = canvas.background().map(|bg| {
                ctx.load_texture("canvas", background_2_colorimage(bg), TextureOptions::NEAREST)
            });
            self.texture_identity = Some(identity);
        }
    }

    fn collect_events(&mut self, ui: &mut Ui, response: &Response, shape: ShapeI) -> Events {
        let mouse_pos = ui
            .input(|i| i.pointer.latest_pos())
            .map(|pos| pos_on_canvas(pos, response.rect, shape));
        let (mouse_events, press_pos) = map_mouse_events(ui, &mut self.last_sensed, response);
        let press_pos = press_pos.map(|pos| pos_on_canvas(pos, response.rect, shape));
        Events::default()
            .events(mouse_events)
            .mousepos_canvas(mouse_pos)
            .presspos_canvas(press_pos)
    }

    fn canvas_area<H: ComponentHost>(
        &mut self,
        ui: &mut Ui,
        canvas: &mut AnnotationCanvas<H>,
    ) -> Option<Response> {
        let shape = canvas.surface()?.shape();
        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(shape.w as f32, shape.h as f32), Sense::click_and_drag());
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            ui.painter()
                .image(texture.id(), rect, uv, Color32::WHITE);
        }
        let events = self.collect_events(ui, &response, shape);
        canvas.handle_events(&events);
        if let Some(surface) = canvas.surface() {
            paint_surface(&ui.painter_at(rect), rect, surface);
        }
        Some(response)
    }

    fn controls<H: ComponentHost>(ui: &mut Ui, canvas: &mut AnnotationCanvas<H>) {
        ui.horizontal(|ui| {
            if ui.button(LABEL_ADD_BOX).clicked() {
                canvas.add_box();
            }
            if ui.button(LABEL_ADD_POINT).clicked() {
                canvas.add_point();
            }
            if ui.button(LABEL_REMOVE_SELECTED).clicked() {
                canvas.remove_selected();
            }
            if ui.button(LABEL_CLEAR_ALL).clicked() {
                canvas.clear_all();
            }
        });
    }

    /// Draws the canvas with its controls below and processes this frame's input. Returns the
    /// response of the drawing area if there is a surface.
    pub fn show<H: ComponentHost>(
        &mut self,
        ui: &mut Ui,
        canvas: &mut AnnotationCanvas<H>,
    ) -> Option<Response> {
        canvas.poll_display_mode();
        self.update_texture(ui.ctx(), canvas);
        let visuals = canvas.display_mode().visuals();
        egui::Frame::new()
            .fill(visuals.panel_fill)
            .show(ui, |ui| {
                ui.style_mut().visuals = visuals;
                let response = self.canvas_area(ui, canvas);
                Self::controls(ui, canvas);
                response
            })
            .inner
    }
}

#[cfg(test)]
use crate::{report::QueuedHost, test_helpers::mount_queued};

/// Runs one frame with the given input at the given time and returns the canvas area
#[cfg(test)]
fn run_frame(
    ctx: &Context,
    view: &mut CanvasView,
    canvas: &mut AnnotationCanvas<QueuedHost>,
    events: Vec<egui::Event>,
    time: f64,
) -> Option<Rect> {
    let raw_input = egui::RawInput {
        screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))),
        time: Some(time),
        events,
        ..Default::default()
    };
    let mut canvas_rect = None;
    let _ = ctx.run_ui(raw_input, |ui| {
        egui::CentralPanel::default().show_inside(ui, |ui| {
            canvas_rect = view.show(ui, canvas).map(|r| r.rect);
        });
    });
    canvas_rect
}

#[cfg(test)]
fn drag_in_view(
    ctx: &Context,
    view: &mut CanvasView,
    canvas: &mut AnnotationCanvas<QueuedHost>,
    start: Pos2,
    offsets: &[f32],
    time: &mut f64,
) {
    let mut frame = |events| {
        *time += 1.0 / 60.0;
        run_frame(ctx, view, canvas, events, *time);
    };
    frame(vec![
        egui::Event::PointerMoved(start),
        egui::Event::PointerButton {
            pos: start,
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers: egui::Modifiers::NONE,
        },
    ]);
    for dx in offsets {
        frame(vec![egui::Event::PointerMoved(start + Vec2::new(*dx, 0.0))]);
    }
    let end = start + Vec2::new(offsets.last().copied().unwrap_or(0.0), 0.0);
    frame(vec![egui::Event::PointerButton {
        pos: end,
        button: egui::PointerButton::Primary,
        pressed: false,
        modifiers: egui::Modifiers::NONE,
    }]);
}

#[test]
fn test_headless_frame() {
    let (mut canvas, watcher) = mount_queued(64, 48);
    canvas.add_box();
    canvas.add_point();
    canvas.select(0);
    let mut view = CanvasView::default();
    egui::__run_test_ui(|ui| {
        let response = view.show(ui, &mut canvas).unwrap();
        assert_eq!(response.rect.size(), Vec2::new(64.0, 48.0));
    });
    assert!(view.texture.is_some());
    assert_eq!(view.texture_identity, Some(canvas.identity()));
    // painting never reports
    assert_eq!(canvas.host().reports().len(), 2);
    drop(watcher);
}

#[test]
fn test_colors() {
    assert_eq!(to_color32(Color::DEFAULT_BOX), Color32::RED);
    assert_eq!(to_color32(Color::TRANSPARENT), Color32::TRANSPARENT);
    let im = RgbaImage::from_raw(1, 1, vec![1, 2, 3, 255]).unwrap();
    let clr_im = background_2_colorimage(&im);
    assert_eq!(clr_im.size, [1, 1]);
    assert_eq!(clr_im.pixels[0], Color32::from_rgb(1, 2, 3));
}

#[test]
fn test_drag_starts_at_press_position() {
    let (mut canvas, watcher) = mount_queued(400, 300);
    canvas.add_box();
    // centered at 64, 49 on top of the box at 60, 45
    canvas.add_point();
    let ctx = Context::default();
    ctx.set_fonts(egui::FontDefinitions::empty());
    let mut view = CanvasView::default();
    let mut time = 0.0;
    let rect = run_frame(&ctx, &mut view, &mut canvas, vec![], time).unwrap();
    let offsets = [3.0, 7.0, 10.0, 15.0, 20.0];

    let n_reports = canvas.host().reports().len();
    let point_center = rect.min + Vec2::new(64.0, 49.0);
    drag_in_view(&ctx, &mut view, &mut canvas, point_center, &offsets, &mut time);
    assert_eq!(canvas.selected(), Some(1));
    assert_eq!(canvas.host().reports().len(), n_reports + 1);
    let report = canvas.host().last_report().unwrap();
    assert!((report.points[0].x - 84.0).abs() < 1e-6);
    assert!((report.points[0].y - 49.0).abs() < 1e-6);
    assert!((report.rects[0].left - 60.0).abs() < 1e-6);

    // the whole distance moves the box, not only the part after egui decided on a drag
    let box_inside = rect.min + Vec2::new(100.0, 75.0);
    drag_in_view(&ctx, &mut view, &mut canvas, box_inside, &offsets, &mut time);
    assert_eq!(canvas.selected(), Some(0));
    let report = canvas.host().last_report().unwrap();
    assert!((report.rects[0].left - 80.0).abs() < 1e-6);
    assert!((report.rects[0].top - 45.0).abs() < 1e-6);
    assert!((report.points[0].x - 84.0).abs() < 1e-6);
    drop(watcher);
}
