//! Solid-color outline around the opaque region of an image.
//!
//! The alpha channel is dilated `border_size` times with a 3x3 max filter; the
//! pixels gained by dilation form the border mask. A layer painted with the
//! border color at the border mask's opacity is placed beneath the input
//! image.

use image::{imageops, GrayImage, Luma, Rgba, RgbaImage};

use crate::color::Color;
use crate::imageops_ext::{mask::alpha_channel, morphology::dilate};

/// Pixels that become opaque after `border_size` dilations of `alpha` but
/// were not opaque before: `max(dilate(alpha) - alpha, 0)`.
pub fn border_mask(alpha: &GrayImage, border_size: u32) -> GrayImage {
    let mut ring = dilate(alpha, border_size);
    ring.pixels_mut()
        .zip(alpha.pixels())
        .for_each(|(Luma([d]), Luma([a]))| *d = d.saturating_sub(*a));
    ring
}

/// Transparent layer holding `color` wherever `mask` is non-zero, with the
/// mask value as alpha.
pub fn border_layer(mask: &GrayImage, color: Color) -> RgbaImage {
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        match mask.get_pixel(x, y)[0] {
            0 => Rgba([0, 0, 0, 0]),
            alpha => color.with_alpha(alpha),
        }
    })
}

/// Returns a copy of `image` with an outline of `border_size` pixels drawn
/// around its foreground. A border size of zero returns the image unchanged.
pub fn add_outline(image: &RgbaImage, border_size: u32, color: Color) -> RgbaImage {
    if border_size == 0 {
        return image.clone();
    }

    let mask = border_mask(&alpha_channel(image), border_size);
    let ring_pixels = mask.pixels().filter(|p| p[0] > 0).count();
    tracing::debug!(border_size, %color, ring_pixels, "synthesized border mask");

    if ring_pixels == 0 {
        return image.clone();
    }

    let mut layer = border_layer(&mask, color);
    imageops::overlay(&mut layer, image, 0, 0);
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_color;

    const FOREGROUND: Rgba<u8> = Rgba([10, 20, 30, 255]);

    /// 10x10 transparent image with an opaque 2x2 block at (4..6, 4..6).
    fn centre_block() -> RgbaImage {
        let mut image = RgbaImage::new(10, 10);
        for y in 4..6 {
            for x in 4..6 {
                image.put_pixel(x, y, FOREGROUND);
            }
        }
        image
    }

    #[test]
    fn test_zero_border_is_identity() {
        let mut image = centre_block();
        image.put_pixel(0, 0, Rgba([5, 6, 7, 0]));
        assert_eq!(add_outline(&image, 0, Color::DEFAULT), image);
    }

    #[test]
    fn test_red_ring_around_block() {
        let out = add_outline(&centre_block(), 1, parse_color("red"));

        let mut ring = 0;
        for (x, y, pixel) in out.enumerate_pixels() {
            let in_block = (4..6).contains(&x) && (4..6).contains(&y);
            let in_ring = (3..7).contains(&x) && (3..7).contains(&y) && !in_block;
            if in_block {
                assert_eq!(*pixel, FOREGROUND, "block pixel ({x}, {y})");
            } else if in_ring {
                assert_eq!(*pixel, Rgba([255, 0, 0, 255]), "ring pixel ({x}, {y})");
                ring += 1;
            } else {
                assert_eq!(*pixel, Rgba([0, 0, 0, 0]), "outside pixel ({x}, {y})");
            }
        }
        assert_eq!(ring, 12);
    }

    #[test]
    fn test_foreground_preserved_for_thick_border() {
        let mut image = centre_block();
        image.put_pixel(3, 4, Rgba([200, 100, 0, 128]));
        let out = add_outline(&image, 3, parse_color("#00ff00"));

        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel[3] == 255 {
                assert_eq!(out.get_pixel(x, y), pixel);
            }
        }
        assert_eq!(out.get_pixel(1, 4), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_partial_alpha_foreground_over_ring() {
        // (3, 4) touches the opaque block, so the ring under it has alpha 255 - 128.
        let mut image = centre_block();
        image.put_pixel(3, 4, Rgba([0, 0, 150, 128]));

        let alpha = alpha_channel(&image);
        assert_eq!(border_mask(&alpha, 1).get_pixel(3, 4), &Luma([127]));

        let out = add_outline(&image, 1, parse_color("red"));
        // (0, 0, 150) at 128/255 over (255, 0, 0) at 127/255, source-over.
        assert_eq!(out.get_pixel(3, 4), &Rgba([84, 0, 100, 191]));
        // Next to the partial pixel only, so the ring takes its alpha.
        assert_eq!(out.get_pixel(2, 4), &Rgba([255, 0, 0, 128]));
        assert_eq!(out.get_pixel(4, 4), &FOREGROUND);
    }

    #[test]
    fn test_ring_is_outside_silhouette() {
        let alpha = alpha_channel(&centre_block());
        let mask = border_mask(&alpha, 2);

        for (m, a) in mask.pixels().zip(alpha.pixels()) {
            if a[0] == 255 {
                assert_eq!(m[0], 0);
            }
        }
        // Every transparent neighbour of the block is part of the ring.
        for (x, y) in [(3, 3), (6, 3), (3, 6), (6, 6), (3, 4), (5, 3)] {
            assert!(mask.get_pixel(x, y)[0] > 0, "({x}, {y}) not in ring");
        }
    }

    #[test]
    fn test_partial_alpha_edge() {
        let alpha = GrayImage::from_raw(3, 1, vec![0, 100, 0]).unwrap();
        let mask = border_mask(&alpha, 1);
        assert_eq!(mask.as_raw(), &vec![100, 0, 100]);

        let layer = border_layer(&mask, Color::rgb(1, 2, 3));
        assert_eq!(layer.get_pixel(0, 0), &Rgba([1, 2, 3, 100]));
        assert_eq!(layer.get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_transparent_image_unchanged() {
        let mut image = RgbaImage::new(6, 4);
        image.put_pixel(2, 2, Rgba([9, 9, 9, 0]));
        assert_eq!(add_outline(&image, 5, Color::DEFAULT), image);
    }

    #[test]
    fn test_border_larger_than_image() {
        let out = add_outline(&centre_block(), 50, Color::rgb(0, 0, 255));
        for (x, y, pixel) in out.enumerate_pixels() {
            if (4..6).contains(&x) && (4..6).contains(&y) {
                assert_eq!(*pixel, FOREGROUND);
            } else {
                assert_eq!(*pixel, Rgba([0, 0, 255, 255]));
            }
        }
    }

    #[test]
    fn test_second_pass_with_zero_border_is_noop() {
        let once = add_outline(&centre_block(), 2, Color::DEFAULT);
        assert_eq!(add_outline(&once, 0, Color::DEFAULT), once);
    }
}
