use super::*;

#[test]
fn over_opaque_src_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_transparent_src_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_transparent_dst_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_blends_half_transparent_src() {
    // red at alpha 128 over opaque blue
    let out = over([0, 0, 255, 255], [255, 0, 0, 128]);
    assert_eq!(out, [128, 0, 127, 255]);
}

#[test]
fn over_both_transparent_stays_transparent() {
    assert_eq!(over([0, 0, 0, 0], [9, 9, 9, 0]), [0, 0, 0, 0]);
}

#[test]
fn alpha_over_requires_matching_dimensions() {
    let bg = RgbaImage::new(4, 4);
    let fg = RgbaImage::new(4, 5);
    assert!(alpha_over(&bg, &fg).is_err());
}

#[test]
fn alpha_over_composites_per_pixel() {
    let bg = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
    let mut fg = RgbaImage::new(2, 2);
    fg.put_pixel(0, 0, Rgba([255, 0, 0, 255]));

    let out = alpha_over(&bg, &fg).unwrap();
    assert_eq!(out.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    assert_eq!(out.get_pixel(1, 1), &Rgba([0, 0, 255, 255]));
}
