use imglabel_domain::ShapeI;
use imglib::{
    AnnotationCanvas, CanvasArgs, ColorSchemeWatcher, DisplayMode, GeometryReport, PointGeometry,
    QueuedHost, RectGeometry,
};
use numpy::PyReadonlyArrayDyn;
use pyo3::{exceptions::PyValueError, prelude::*};

type PyRect = (f64, f64, f64, f64);
type PyPoint = (f64, f64);

fn to_json(report: &GeometryReport) -> PyResult<String> {
    serde_json::to_string(report).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn make_args(
    width: u32,
    height: u32,
    image_data: &PyReadonlyArrayDyn<'_, u8>,
    box_color: &str,
    point_color: &str,
    rects: Option<Vec<PyRect>>,
    points: Option<Vec<PyPoint>>,
) -> PyResult<CanvasArgs> {
    if width == 0 || height == 0 {
        return Err(PyValueError::new_err(format!(
            "canvas dimensions need to be positive, got {width}x{height}"
        )));
    }
    let data = image_data.as_array().iter().copied().collect::<Vec<_>>();
    let rects = rects
        .unwrap_or_default()
        .into_iter()
        .map(RectGeometry::from)
        .collect();
    let points = points
        .unwrap_or_default()
        .into_iter()
        .map(PointGeometry::from)
        .collect();
    Ok(
        CanvasArgs::new(ShapeI::new(width, height), data, box_color, point_color)
            .with_prior_geometry(rects, points),
    )
}

/// Headless annotation canvas. Pixel data is expected as RGBA bytes, e.g., an array of shape
/// `(height, width, 4)`. Prior boxes are given as `(left, top, width, height)`, prior points as
/// `(x, y)`.
#[pyclass(unsendable, name = "AnnotationCanvas")]
struct PyAnnotationCanvas {
    canvas: AnnotationCanvas<QueuedHost>,
    watcher: ColorSchemeWatcher,
}

#[pymethods]
impl PyAnnotationCanvas {
    #[new]
    #[pyo3(signature = (width, height, image_data, box_color="red", point_color="blue", rects=None, points=None))]
    fn new(
        width: u32,
        height: u32,
        image_data: PyReadonlyArrayDyn<'_, u8>,
        box_color: &str,
        point_color: &str,
        rects: Option<Vec<PyRect>>,
        points: Option<Vec<PyPoint>>,
    ) -> PyResult<Self> {
        let args = make_args(
            width,
            height,
            &image_data,
            box_color,
            point_color,
            rects,
            points,
        )?;
        let watcher = ColorSchemeWatcher::new(DisplayMode::Light);
        let canvas = AnnotationCanvas::mount(args, QueuedHost::default(), &watcher);
        Ok(Self { canvas, watcher })
    }
    /// Re-renders with new arguments. The surface is rebuilt only if the dimensions or the
    /// pixels changed, prior geometry applies to rebuilt surfaces.
    #[pyo3(signature = (width, height, image_data, box_color="red", point_color="blue", rects=None, points=None))]
    #[allow(clippy::too_many_arguments)]
    fn set_args(
        &mut self,
        width: u32,
        height: u32,
        image_data: PyReadonlyArrayDyn<'_, u8>,
        box_color: &str,
        point_color: &str,
        rects: Option<Vec<PyRect>>,
        points: Option<Vec<PyPoint>>,
    ) -> PyResult<()> {
        let args = make_args(
            width,
            height,
            &image_data,
            box_color,
            point_color,
            rects,
            points,
        )?;
        self.canvas.set_args(args);
        Ok(())
    }
    fn add_box(&mut self) {
        self.canvas.add_box();
    }
    fn add_point(&mut self) {
        self.canvas.add_point();
    }
    /// Index of the selected primitive or `None` if nothing is at `(x, y)`
    fn select_at(&mut self, x: f64, y: f64) -> Option<usize> {
        self.canvas.select_at((x, y).into())
    }
    fn remove_selected(&mut self) {
        self.canvas.remove_selected();
    }
    fn clear_all(&mut self) {
        self.canvas.clear_all();
    }
    /// Current geometry as JSON
    fn report(&self) -> PyResult<String> {
        to_json(&self.canvas.report())
    }
    /// All reports sent since the last call as JSON strings
    fn take_reports(&mut self) -> PyResult<Vec<String>> {
        self.canvas
            .host_mut()
            .take_reports()
            .iter()
            .map(to_json)
            .collect()
    }
    fn frame_height(&mut self) -> Option<f32> {
        self.canvas.host_mut().take_frame_height()
    }
    fn set_dark_mode(&mut self, dark: bool) {
        self.watcher.set(DisplayMode::from_is_dark(dark));
        self.canvas.poll_display_mode();
    }
    fn display_mode(&self) -> String {
        self.canvas.display_mode().to_string()
    }
}

#[pymodule]
fn imglabel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAnnotationCanvas>()?;
    Ok(())
}
