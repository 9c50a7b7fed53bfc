use crate::primitive::Primitive;
use imglabel_domain::{BbF, PtF, TPtF};
use serde::{Deserialize, Serialize};
use std::mem;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct RectGeometry {
    pub left: TPtF,
    pub top: TPtF,
    pub width: TPtF,
    pub height: TPtF,
}
impl From<BbF> for RectGeometry {
    fn from(bb: BbF) -> Self {
        Self {
            left: bb.x,
            top: bb.y,
            width: bb.w,
            height: bb.h,
        }
    }
}
/// `(left, top, width, height)`
impl From<(TPtF, TPtF, TPtF, TPtF)> for RectGeometry {
    fn from((left, top, width, height): (TPtF, TPtF, TPtF, TPtF)) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}
impl From<RectGeometry> for BbF {
    fn from(r: RectGeometry) -> Self {
        BbF::from_arr(&[r.left, r.top, r.width, r.height])
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct PointGeometry {
    pub x: TPtF,
    pub y: TPtF,
}
impl From<PtF> for PointGeometry {
    fn from(p: PtF) -> Self {
        Self { x: p.x, y: p.y }
    }
}
impl From<(TPtF, TPtF)> for PointGeometry {
    fn from((x, y): (TPtF, TPtF)) -> Self {
        Self { x, y }
    }
}
impl From<PointGeometry> for PtF {
    fn from(p: PointGeometry) -> Self {
        PtF { x: p.x, y: p.y }
    }
}

/// The value the host receives after each change of the surface.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct GeometryReport {
    pub rects: Vec<RectGeometry>,
    pub points: Vec<PointGeometry>,
}
impl GeometryReport {
    /// Boxes are reported by their bounding rect, points by their center.
    pub fn from_objects(objects: &[Primitive]) -> Self {
        let rects = objects
            .iter()
            .filter(|prim| prim.is_box())
            .map(|prim| prim.bounding_rect().into())
            .collect();
        let points = objects
            .iter()
            .filter(|prim| prim.is_point())
            .map(|prim| prim.center_point().into())
            .collect();
        Self { rects, points }
    }
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty() && self.points.is_empty()
    }
}

/// Outbound channel from the canvas to the embedding application.
pub trait ComponentHost {
    fn set_component_value(&mut self, report: &GeometryReport);
    /// Asks the host to fit the frame around the widget.
    fn set_frame_height(&mut self, height: f32);
}

/// Host that collects everything it receives for polling by the embedding application.
#[derive(Clone, Debug, Default)]
pub struct QueuedHost {
    reports: Vec<GeometryReport>,
    frame_heights: Vec<f32>,
}
impl QueuedHost {
    pub fn reports(&self) -> &[GeometryReport] {
        &self.reports
    }
    pub fn last_report(&self) -> Option<&GeometryReport> {
        self.reports.last()
    }
    pub fn take_reports(&mut self) -> Vec<GeometryReport> {
        mem::take(&mut self.reports)
    }
    pub fn frame_heights(&self) -> &[f32] {
        &self.frame_heights
    }
    /// Only the latest request matters.
    pub fn take_frame_height(&mut self) -> Option<f32> {
        mem::take(&mut self.frame_heights).pop()
    }
}
impl ComponentHost for QueuedHost {
    fn set_component_value(&mut self, report: &GeometryReport) {
        self.reports.push(report.clone());
    }
    fn set_frame_height(&mut self, height: f32) {
        self.frame_heights.push(height);
    }
}

#[test]
fn test_report_json() {
    let report = GeometryReport {
        rects: vec![RectGeometry {
            left: 60.0,
            top: 45.0,
            width: 80.0,
            height: 60.0,
        }],
        points: vec![PointGeometry { x: 1.5, y: 2.0 }],
    };
    let s = serde_json::to_string(&report).unwrap();
    assert_eq!(
        s,
        r#"{"rects":[{"left":60.0,"top":45.0,"width":80.0,"height":60.0}],"points":[{"x":1.5,"y":2.0}]}"#
    );
    let parsed: GeometryReport = serde_json::from_str(&s).unwrap();
    assert_eq!(parsed, report);
    assert!(GeometryReport::default().is_empty());
}

#[test]
fn test_geometry_from_tuples() {
    let rect = RectGeometry::from((1.0, 2.0, 3.0, 4.0));
    assert_eq!(
        rect,
        RectGeometry {
            left: 1.0,
            top: 2.0,
            width: 3.0,
            height: 4.0
        }
    );
    assert_eq!(PointGeometry::from((5.0, 6.0)), PointGeometry { x: 5.0, y: 6.0 });
}

#[test]
fn test_queued_host() {
    let mut host = QueuedHost::default();
    host.set_frame_height(10.0);
    host.set_frame_height(20.0);
    assert_eq!(host.take_frame_height(), Some(20.0));
    assert_eq!(host.take_frame_height(), None);
    host.set_component_value(&GeometryReport::default());
    assert_eq!(host.reports().len(), 1);
    assert_eq!(host.take_reports().len(), 1);
    assert!(host.last_report().is_none());
}
