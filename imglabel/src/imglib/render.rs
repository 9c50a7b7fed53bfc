use crate::{color::Color, primitive::Primitive};
use image::{Rgba, RgbaImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut},
    rect::Rect,
};
use imglabel_domain::{BbI, ShapeI};
use tracing::warn;

/// Bit exact copy of the host's buffer. Buffers not matching the shape, including empty ones,
/// yield a transparent background.
pub fn background_from_raw(shape: ShapeI, data: Vec<u8>) -> RgbaImage {
    let n_bytes = data.len();
    if n_bytes != shape.n_rgba_bytes() {
        warn!(
            "pixel buffer has {n_bytes} bytes but {}x{} needs {}, using an empty background",
            shape.w,
            shape.h,
            shape.n_rgba_bytes()
        );
        return RgbaImage::new(shape.w, shape.h);
    }
    RgbaImage::from_raw(shape.w, shape.h, data).unwrap_or_else(|| {
        warn!("could not create background image, using an empty one");
        RgbaImage::new(shape.w, shape.h)
    })
}

fn to_pixel(color: Color) -> Rgba<u8> {
    Rgba(color.rgba)
}

fn draw_primitive(im: &mut RgbaImage, prim: &Primitive) {
    match prim {
        Primitive::Box(b) => {
            if b.stroke_color.is_transparent() {
                return;
            }
            let bb: BbI = prim.bounding_rect().into();
            let rect = Rect::at(bb.x as i32, bb.y as i32).of_size(bb.w.max(1), bb.h.max(1));
            draw_hollow_rect_mut(im, rect, to_pixel(b.stroke_color));
        }
        Primitive::Point(p) => {
            let circle = p.circle();
            let center = circle.center.round_signed();
            let radius = circle.radius.round() as i32;
            if !p.fill_color.is_transparent() {
                draw_filled_circle_mut(im, (center.x, center.y), radius, to_pixel(p.fill_color));
            }
            if !p.stroke_color.is_transparent() {
                draw_hollow_circle_mut(im, (center.x, center.y), radius, to_pixel(p.stroke_color));
            }
        }
    }
}

/// Background with all primitives drawn on top in list order
pub fn render_annotated(background: &RgbaImage, objects: &[Primitive]) -> RgbaImage {
    let mut im = background.clone();
    for prim in objects {
        draw_primitive(&mut im, prim);
    }
    im
}

#[cfg(test)]
use {
    crate::primitive::{BoxPrimitive, PointPrimitive},
    imglabel_domain::BbF,
};

#[test]
fn test_background_from_raw() {
    let shape = ShapeI::new(2, 1);
    let data = vec![1, 2, 3, 4, 5, 6, 7, 8];
    let im = background_from_raw(shape, data.clone());
    assert_eq!(im.as_raw(), &data);
    let empty = background_from_raw(shape, vec![]);
    assert_eq!(empty.dimensions(), (2, 1));
    assert!(empty.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    let too_long = background_from_raw(shape, vec![1; 12]);
    assert!(too_long.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn test_render_annotated() {
    let background = RgbaImage::new(20, 20);
    let objects = vec![
        Primitive::Box(BoxPrimitive::from_bb(
            BbF::from_arr(&[2.0, 2.0, 5.0, 5.0]),
            Color::DEFAULT_BOX,
        )),
        Primitive::Point(PointPrimitive::centered(
            (15.0, 15.0).into(),
            2.0,
            Color::DEFAULT_POINT,
        )),
    ];
    let im = render_annotated(&background, &objects);
    assert_eq!(im.get_pixel(2, 2).0, Color::DEFAULT_BOX.rgba);
    assert_eq!(im.get_pixel(6, 6).0, Color::DEFAULT_BOX.rgba);
    // boxes are not filled
    assert_eq!(im.get_pixel(4, 4).0, [0, 0, 0, 0]);
    assert_eq!(im.get_pixel(15, 15).0, Color::DEFAULT_POINT.rgba);
    assert_eq!(im.get_pixel(0, 19).0, [0, 0, 0, 0]);
    // the background is untouched
    assert_eq!(background.get_pixel(2, 2).0, [0, 0, 0, 0]);
}
