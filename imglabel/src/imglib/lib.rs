pub mod args;
pub mod canvas;
pub mod cfg;
pub mod color;
pub mod display_mode;
mod egui_mappers;
mod events;
pub mod file_util;
mod primitive;
pub mod render;
pub mod report;
pub mod result;
mod surface;
pub mod test_helpers;
pub mod tracing_setup;
pub mod util;
pub mod widget;
pub use args::{CanvasArgs, ImageIdentity};
pub use canvas::{AnnotationCanvas, IndexCounter, CONTROLS_HEIGHT, MAX_INDEX};
pub use color::Color;
pub use display_mode::{ColorSchemeSource, ColorSchemeWatcher, DisplayMode, Subscription};
pub use egui_mappers::{map_mouse_events, pos_on_canvas, LastSensedBtns};
pub use events::{Event, Events, KeyCode};
pub use imglabel_domain::{BbF, PtF, ShapeI};
pub use primitive::{BoxPrimitive, PointPrimitive, Primitive, PrimitiveStyle};
pub use report::{ComponentHost, GeometryReport, PointGeometry, QueuedHost, RectGeometry};
pub use surface::Surface;
pub use widget::CanvasView;
