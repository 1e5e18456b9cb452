use image::{GenericImageView, GrayImage, ImageBuffer, Luma, Pixel, Primitive, Rgb, Rgba, RgbaImage};
use num_traits::AsPrimitive;

use crate::errors::{CutoutError, Result};
use crate::imageops_ext::get_max_value;

/// Attaches `mask` to `image` as its alpha channel.
///
/// With `premultiply` the color channels are scaled by the mask as well, which
/// is what compositing the image through the mask onto a transparent canvas
/// produces.
pub fn apply<I, M, SI, SM>(
    image: &I,
    mask: &M,
    premultiply: bool,
) -> Result<ImageBuffer<Rgba<SI>, Vec<SI>>>
where
    I: GenericImageView<Pixel = Rgb<SI>>,
    M: GenericImageView<Pixel = Luma<SM>>,
    Rgba<SI>: Pixel<Subpixel = SI>,
    SI: Primitive + 'static + AsPrimitive<f32>,
    SM: Primitive + 'static + AsPrimitive<f32>,
    f32: AsPrimitive<SI>,
{
    if image.dimensions() != mask.dimensions() {
        let (iw, ih) = image.dimensions();
        let (mw, mh) = mask.dimensions();
        return Err(CutoutError::validation(
            "mask",
            format!("size {mw}x{mh} does not match image size {iw}x{ih}"),
        ));
    }

    let sm_max: f32 = get_max_value::<SM>().as_();
    let si_max: f32 = get_max_value::<SI>().as_();

    let processed_pixels = image
        .pixels()
        .zip(mask.pixels())
        .flat_map(|((_, _, image_pixel), (_, _, mask_pixel))| {
            let Rgb([red, green, blue]) = image_pixel;
            let Luma([weight]) = mask_pixel;
            let weight = (weight.as_() / sm_max).clamp(0.0, 1.0);
            let alpha: SI = (weight * si_max).round().as_();

            if premultiply {
                let scale = |c: SI| -> SI { (c.as_() * weight).round().as_() };
                [scale(red), scale(green), scale(blue), alpha]
            } else {
                [red, green, blue, alpha]
            }
        })
        .collect::<Vec<SI>>();

    ImageBuffer::from_raw(image.width(), image.height(), processed_pixels).ok_or_else(|| {
        CutoutError::validation("mask", "processed pixels do not fill the image buffer")
    })
}

/// Alpha channel of `image` as a grayscale plane.
pub fn alpha_channel(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[3]])
    })
}
