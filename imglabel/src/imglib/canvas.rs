use crate::{
    args::{CanvasArgs, ImageIdentity},
    color::Color,
    display_mode::{ColorSchemeSource, DisplayMode, Subscription},
    events::{Events, KeyCode},
    primitive::{BoxPrimitive, PointPrimitive, Primitive},
    render,
    report::{ComponentHost, GeometryReport},
    result::warn_or,
    surface::Surface,
};
use image::RgbaImage;
use imglabel_domain::{BbF, PtF};
use tracing::{debug, info, warn};

/// Height of the row of buttons below the canvas
pub const CONTROLS_HEIGHT: f32 = 40.0;
/// Counters wrap to 0 after reaching this value.
pub const MAX_INDEX: usize = 50;

/// Determines the stagger of newly created primitives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexCounter {
    value: usize,
}
impl IndexCounter {
    pub fn current(self) -> usize {
        self.value
    }
    /// Returns the value to be used and moves on.
    pub fn advance(&mut self) -> usize {
        let used = self.value;
        self.value = if used >= MAX_INDEX { 0 } else { used + 1 };
        used
    }
    pub fn reset(&mut self) {
        self.value = 0;
    }
}

fn parse_color(color: &str, default: Color) -> Color {
    warn_or(color.parse(), default)
}

/// Interactive canvas to annotate an image with boxes and points. Every change of the primitives
/// is reported to the host `H`.
pub struct AnnotationCanvas<H: ComponentHost> {
    host: H,
    args: CanvasArgs,
    identity: ImageIdentity,
    surface: Option<Surface>,
    box_color: Color,
    point_color: Color,
    box_counter: IndexCounter,
    point_counter: IndexCounter,
    display_mode: DisplayMode,
    subscription: Subscription,
}

impl<H: ComponentHost> AnnotationCanvas<H> {
    /// Never fails. Undecodable buffers lead to an empty background.
    pub fn mount(args: CanvasArgs, host: H, color_scheme: &dyn ColorSchemeSource) -> Self {
        let mut canvas = Self {
            host,
            identity: args.identity(),
            box_color: parse_color(&args.box_color, Color::DEFAULT_BOX),
            point_color: parse_color(&args.point_color, Color::DEFAULT_POINT),
            args,
            surface: None,
            box_counter: IndexCounter::default(),
            point_counter: IndexCounter::default(),
            display_mode: color_scheme.current(),
            subscription: color_scheme.subscribe(),
        };
        info!("mounting canvas in {} mode", canvas.display_mode);
        canvas.init_surface();
        canvas
    }

    fn init_surface(&mut self) {
        self.identity = self.args.identity();
        self.surface = match self.args.shape() {
            Ok(shape) => {
                let background = render::background_from_raw(shape, self.args.image_data.clone());
                let mut surface = Surface::new(shape, background);
                for rect in &self.args.rects {
                    let bb: BbF = (*rect).into();
                    surface.add(Primitive::Box(BoxPrimitive::from_bb(bb, self.box_color)));
                }
                let radius = PointPrimitive::default_radius(shape);
                for point in &self.args.points {
                    let center: PtF = (*point).into();
                    surface.add(Primitive::Point(PointPrimitive::centered(
                        center,
                        radius,
                        self.point_color,
                    )));
                }
                info!(
                    "initialized {}x{} surface with {} primitives",
                    shape.w,
                    shape.h,
                    surface.len()
                );
                Some(surface)
            }
            Err(e) => {
                warn!("cannot initialize surface, {e}");
                None
            }
        };
        if let Some(surface) = &self.surface {
            self.host
                .set_frame_height(surface.shape().h as f32 + CONTROLS_HEIGHT);
        }
    }

    /// Applies arguments of a re-render. The surface and thereby all primitives are recreated
    /// only if the dimensions or the image changed.
    pub fn set_args(&mut self, args: CanvasArgs) {
        self.box_color = parse_color(&args.box_color, self.box_color);
        self.point_color = parse_color(&args.point_color, self.point_color);
        let needs_init = args.identity() != self.identity;
        self.args = args;
        if needs_init {
            debug!("image or dimensions changed");
            self.init_surface();
        }
    }

    pub fn args(&self) -> &CanvasArgs {
        &self.args
    }
    pub fn identity(&self) -> ImageIdentity {
        self.identity
    }
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }
    pub fn background(&self) -> Option<&RgbaImage> {
        self.surface.as_ref().map(Surface::background)
    }
    pub fn host(&self) -> &H {
        &self.host
    }
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
    pub fn box_counter(&self) -> IndexCounter {
        self.box_counter
    }
    pub fn point_counter(&self) -> IndexCounter {
        self.point_counter
    }
    pub fn box_color(&self) -> Color {
        self.box_color
    }
    pub fn point_color(&self) -> Color {
        self.point_color
    }
    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn add_box(&mut self) {
        let Some(surface) = &mut self.surface else {
            warn!("no surface to add a box to");
            return;
        };
        let counter = self.box_counter.advance();
        let prim = BoxPrimitive::new_default(surface.shape(), counter, self.box_color);
        surface.add(Primitive::Box(prim));
        self.send_coordinates();
    }

    pub fn add_point(&mut self) {
        let Some(surface) = &mut self.surface else {
            warn!("no surface to add a point to");
            return;
        };
        let counter = self.point_counter.advance();
        let prim = PointPrimitive::new_default(surface.shape(), counter, self.point_color);
        surface.add(Primitive::Point(prim));
        self.send_coordinates();
    }

    /// Reports also if nothing was selected.
    pub fn remove_selected(&mut self) {
        if let Some(surface) = &mut self.surface {
            surface.remove_selected();
            surface.deselect();
        }
        self.send_coordinates();
    }

    pub fn clear_all(&mut self) {
        self.box_counter.reset();
        self.point_counter.reset();
        if let Some(surface) = &mut self.surface {
            surface.clear();
        }
        self.send_coordinates();
    }

    pub fn select(&mut self, idx: usize) {
        if let Some(surface) = &mut self.surface {
            surface.select(idx);
        }
    }
    /// Selects the topmost primitive at `p` like a click would, deselects if there is none.
    pub fn select_at(&mut self, p: PtF) -> Option<usize> {
        let surface = self.surface.as_mut()?;
        match surface.find_target(p) {
            Some(idx) => surface.select(idx),
            None => surface.deselect(),
        }
        surface.selected()
    }
    pub fn selected(&self) -> Option<usize> {
        self.surface.as_ref().and_then(Surface::selected)
    }

    /// Current geometry, nothing is sent.
    pub fn report(&self) -> GeometryReport {
        self.surface
            .as_ref()
            .map(|s| GeometryReport::from_objects(s.objects()))
            .unwrap_or_default()
    }

    /// Every change of the primitives ends up here.
    pub fn send_coordinates(&mut self) {
        let report = self.report();
        debug!(
            "sending {} rects and {} points",
            report.rects.len(),
            report.points.len()
        );
        self.host.set_component_value(&report);
    }

    fn on_object_modified(&mut self) {
        self.send_coordinates();
    }

    /// Feeds pointer input to the surface. Returns whether an object has been modified.
    pub fn handle_events(&mut self, events: &Events) -> bool {
        let (Some(surface), Some(pos)) = (&mut self.surface, events.mouse_pos_on_canvas) else {
            return false;
        };
        if events.pressed(KeyCode::MouseLeft) {
            surface.pointer_pressed(events.press_pos().unwrap_or(pos));
        }
        if events.held(KeyCode::MouseLeft) {
            surface.pointer_moved(pos);
        }
        let modified = events.released(KeyCode::MouseLeft) && surface.pointer_released(pos);
        if modified {
            self.on_object_modified();
        }
        modified
    }

    /// Applies the latest preference notification, if any. Returns whether the mode changed.
    pub fn poll_display_mode(&mut self) -> bool {
        match self.subscription.latest() {
            Some(mode) if mode != self.display_mode => {
                info!("switching to {mode} mode");
                self.display_mode = mode;
                true
            }
            _ => false,
        }
    }

    /// Background with all primitives drawn on top
    pub fn snapshot(&self) -> Option<RgbaImage> {
        self.surface
            .as_ref()
            .map(|s| render::render_annotated(s.background(), s.objects()))
    }
}

#[cfg(test)]
use crate::{display_mode::ColorSchemeWatcher, report::QueuedHost, test_helpers::make_args};

#[test]
fn test_counter_wraps() {
    let mut counter = IndexCounter::default();
    for i in 0..=MAX_INDEX {
        assert_eq!(counter.advance(), i);
    }
    assert_eq!(counter.current(), 0);
    assert_eq!(counter.advance(), 0);
    counter.reset();
    assert_eq!(counter.current(), 0);
}

#[test]
fn test_mount_requests_height() {
    let watcher = ColorSchemeWatcher::new(DisplayMode::Dark);
    let canvas = AnnotationCanvas::mount(make_args(400, 300), QueuedHost::default(), &watcher);
    assert_eq!(canvas.host().frame_heights(), &[300.0 + CONTROLS_HEIGHT]);
    assert!(canvas.host().reports().is_empty());
    assert_eq!(canvas.display_mode(), DisplayMode::Dark);
    assert!(canvas.report().is_empty());
}

#[test]
fn test_invalid_colors_fall_back() {
    let watcher = ColorSchemeWatcher::default();
    let mut args = make_args(10, 10);
    args.box_color = "not a color".to_string();
    let mut canvas = AnnotationCanvas::mount(args, QueuedHost::default(), &watcher);
    assert_eq!(canvas.box_color(), Color::DEFAULT_BOX);
    let mut args = make_args(10, 10);
    args.box_color = "green".to_string();
    canvas.set_args(args.clone());
    assert_eq!(canvas.box_color(), Color::rgb(0, 128, 0));
    args.box_color = "still not a color".to_string();
    canvas.set_args(args);
    // the previous color stays
    assert_eq!(canvas.box_color(), Color::rgb(0, 128, 0));
}

#[test]
fn test_zero_dimensions() {
    let watcher = ColorSchemeWatcher::default();
    let mut canvas = AnnotationCanvas::mount(make_args(0, 10), QueuedHost::default(), &watcher);
    assert!(canvas.surface().is_none());
    canvas.add_box();
    assert!(canvas.host().reports().is_empty());
    assert_eq!(canvas.box_counter().current(), 0);
    canvas.clear_all();
    assert_eq!(canvas.host().last_report(), Some(&GeometryReport::default()));
}

#[test]
fn test_remove_selected() {
    let watcher = ColorSchemeWatcher::default();
    let mut canvas = AnnotationCanvas::mount(make_args(400, 300), QueuedHost::default(), &watcher);
    canvas.add_box();
    canvas.add_point();
    canvas.select(0);
    canvas.remove_selected();
    assert_eq!(canvas.selected(), None);
    let report = canvas.host().last_report().unwrap();
    assert!(report.rects.is_empty());
    assert_eq!(report.points.len(), 1);
    assert_eq!(canvas.host().reports().len(), 3);
}
