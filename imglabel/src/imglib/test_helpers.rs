use crate::{
    args::CanvasArgs,
    canvas::AnnotationCanvas,
    display_mode::{ColorSchemeWatcher, DisplayMode},
    report::QueuedHost,
    tracing_setup::init_tracing_for_tests,
};
use imglabel_domain::ShapeI;

/// Deterministic opaque gradient
pub fn make_pixels(shape: ShapeI) -> Vec<u8> {
    let mut data = Vec::with_capacity(shape.n_rgba_bytes());
    for y in 0..shape.h {
        for x in 0..shape.w {
            data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
    }
    data
}

pub fn make_args(w: u32, h: u32) -> CanvasArgs {
    let shape = ShapeI::new(w, h);
    let data = if w > 0 && h > 0 {
        make_pixels(shape)
    } else {
        vec![]
    };
    CanvasArgs::new(shape, data, "red", "blue")
}

/// Canvas with a red box color and a blue point color in light mode
pub fn mount_queued(w: u32, h: u32) -> (AnnotationCanvas<QueuedHost>, ColorSchemeWatcher) {
    init_tracing_for_tests();
    let watcher = ColorSchemeWatcher::new(DisplayMode::Light);
    let canvas = AnnotationCanvas::mount(make_args(w, h), QueuedHost::default(), &watcher);
    (canvas, watcher)
}
