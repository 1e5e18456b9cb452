use crate::errors::Result;
use image::{DynamicImage, RgbaImage};

/// A model that separates foreground from background.
///
/// The pipeline depends on this trait rather than on the ONNX session so it
/// can be driven by a mock in tests.
pub trait SegmentationModel: Send + Sync {
    /// Returns `img` as RGBA with the background made transparent.
    fn segment_image(&self, img: &DynamicImage) -> Result<RgbaImage>;
}

impl<M: SegmentationModel + ?Sized> SegmentationModel for Box<M> {
    fn segment_image(&self, img: &DynamicImage) -> Result<RgbaImage> {
        (**self).segment_image(img)
    }
}
