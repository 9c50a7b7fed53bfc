use crate::report::{PointGeometry, RectGeometry};
use image::DynamicImage;
use imglabel_domain::{lblerr, LblResult, ShapeI};
use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};

fn default_box_color() -> String {
    "red".to_string()
}
fn default_point_color() -> String {
    "blue".to_string()
}

/// Configuration the host passes on mount and on each re-render.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CanvasArgs {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// RGBA, one byte per channel, row major
    #[serde(default)]
    pub image_data: Vec<u8>,
    #[serde(default = "default_box_color")]
    pub box_color: String,
    #[serde(default = "default_point_color")]
    pub point_color: String,
    /// Previously reported boxes
    #[serde(default)]
    pub rects: Vec<RectGeometry>,
    /// Previously reported points
    #[serde(default)]
    pub points: Vec<PointGeometry>,
}

/// A new surface is needed iff this changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageIdentity {
    pub shape: ShapeI,
    pub fingerprint: u64,
}

impl CanvasArgs {
    pub fn new(shape: ShapeI, image_data: Vec<u8>, box_color: &str, point_color: &str) -> Self {
        Self {
            canvas_width: shape.w,
            canvas_height: shape.h,
            image_data,
            box_color: box_color.to_string(),
            point_color: point_color.to_string(),
            rects: vec![],
            points: vec![],
        }
    }
    pub fn from_image(im: &DynamicImage, box_color: &str, point_color: &str) -> Self {
        let im = im.to_rgba8();
        let shape = ShapeI::from_im(&im);
        Self::new(shape, im.into_raw(), box_color, point_color)
    }
    pub fn from_json(s: &str) -> LblResult<Self> {
        serde_json::from_str(s).map_err(|e| lblerr!("could not parse canvas args due to {:?}", e))
    }
    pub fn shape(&self) -> LblResult<ShapeI> {
        ShapeI::new_checked(self.canvas_width, self.canvas_height)
    }
    pub fn identity(&self) -> ImageIdentity {
        let mut hasher = DefaultHasher::new();
        self.image_data.hash(&mut hasher);
        ImageIdentity {
            shape: ShapeI::new(self.canvas_width, self.canvas_height),
            fingerprint: hasher.finish(),
        }
    }
    pub fn with_prior_geometry(
        mut self,
        rects: Vec<RectGeometry>,
        points: Vec<PointGeometry>,
    ) -> Self {
        self.rects = rects;
        self.points = points;
        self
    }
}

#[test]
fn test_from_json() {
    let s = r#"{
        "canvasWidth": 2,
        "canvasHeight": 1,
        "imageData": [1, 2, 3, 255, 4, 5, 6, 255],
        "boxColor": "red",
        "pointColor": "blue",
        "rects": [{"left": 0, "top": 0, "width": 1, "height": 1}],
        "points": [{"x": 1.5, "y": 0.5}]
    }"#;
    let args = CanvasArgs::from_json(s).unwrap();
    assert_eq!(args.shape().unwrap(), ShapeI::new(2, 1));
    assert_eq!(args.image_data.len(), 8);
    assert_eq!(args.rects.len(), 1);
    assert_eq!(args.points[0], PointGeometry { x: 1.5, y: 0.5 });
    let minimal = CanvasArgs::from_json(r#"{"canvasWidth": 3, "canvasHeight": 4}"#).unwrap();
    assert_eq!(minimal.box_color, "red");
    assert!(minimal.rects.is_empty());
    assert!(CanvasArgs::from_json(r#"{"canvasWidth": 3}"#).is_err());
    let zero = CanvasArgs::from_json(r#"{"canvasWidth": 0, "canvasHeight": 4}"#).unwrap();
    assert!(zero.shape().is_err());
}

#[test]
fn test_identity() {
    let shape = ShapeI::new(1, 1);
    let a = CanvasArgs::new(shape, vec![1, 2, 3, 4], "red", "blue");
    let mut b = a.clone();
    b.box_color = "green".to_string();
    assert_eq!(a.identity(), b.identity());
    b.image_data[0] = 0;
    assert_ne!(a.identity(), b.identity());
    let c = CanvasArgs::new(ShapeI::new(2, 1), vec![1, 2, 3, 4], "red", "blue");
    assert_ne!(a.identity(), c.identity());
}

#[test]
fn test_from_image() {
    let im = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        3,
        2,
        image::Rgb([10, 20, 30]),
    ));
    let args = CanvasArgs::from_image(&im, "red", "blue");
    assert_eq!(args.shape().unwrap(), ShapeI::new(3, 2));
    assert_eq!(&args.image_data[0..4], &[10, 20, 30, 255]);
    assert_eq!(args.image_data.len(), 24);
}
