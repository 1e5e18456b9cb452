use std::path::Path;

use crate::{
    errors::{CutoutError, Result},
    imageops_ext::mask,
    traits::SegmentationModel,
};
use image::{imageops, imageops::FilterType, DynamicImage, ImageBuffer, Luma, RgbImage, RgbaImage};
use ndarray::prelude::*;
use nshare::AsNdarray3;
use ort::value::TensorRef;
use ort::{
    execution_providers::{CUDAExecutionProvider, TensorRTExecutionProvider},
    session::{builder::SessionBuilder, Session},
};
use parking_lot::Mutex;

/// Used when the model declares a dynamic spatial dimension.
pub const DEFAULT_INPUT_SIZE: u32 = 320;

const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// U²-Net style salient object segmentation backed by ONNX Runtime.
pub struct Model {
    pub image_size: u32,
    input_name: String,
    output_name: String,
    session: Mutex<Session>,
}

impl Model {
    pub fn new(model_path: &Path, device_id: i32) -> Result<Self> {
        let mut session = SessionBuilder::new()
            .map_err(|e| model_error("session builder initialization", e))?
            .with_execution_providers([
                TensorRTExecutionProvider::default()
                    .with_device_id(device_id)
                    .build(),
                CUDAExecutionProvider::default()
                    .with_device_id(device_id)
                    .build(),
            ])
            .map_err(|e| model_error("execution provider registration", e))?
            .with_memory_pattern(true)
            .map_err(|e| model_error("memory pattern configuration", e))?
            .commit_from_file(model_path)
            .map_err(|e| model_error(format!("loading model {}", model_path.display()), e))?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| CutoutError::validation("model", "declares no inputs"))?;
        let input_name = input.name.clone();
        let image_size = input
            .input_type
            .tensor_shape()
            .and_then(|shape| shape.get(2).copied())
            .filter(|&dim| dim > 0)
            .map_or(DEFAULT_INPUT_SIZE, |dim| dim as u32);
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| CutoutError::validation("model", "declares no outputs"))?;

        tracing::info!(
            model = %model_path.display(),
            input = %input_name,
            output = %output_name,
            image_size,
            "model loaded"
        );

        // initialize model
        let data = Array4::<f32>::zeros((1, 3, image_size as usize, image_size as usize));
        session
            .run(ort::inputs![input_name.as_str() => TensorRef::from_array_view(&data)
                .map_err(|e| model_error("warm-up tensor creation", e))?])
            .map_err(|e| model_error("warm-up run", e))?;

        Ok(Self {
            image_size,
            input_name,
            output_name,
            session: Mutex::new(session),
        })
    }

    /// Raw tensor inference (NCHW in, NCHW mask out).
    pub fn predict(&self, tensor: ArrayView4<f32>) -> Result<Array4<f32>> {
        let tensor = tensor.as_standard_layout();
        let mut binding = self.session.lock();
        let outputs = binding.run(
            ort::inputs![self.input_name.as_str() => TensorRef::from_array_view(&tensor)?],
        )?;
        Ok(outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()?
            .into_dimensionality::<Ix4>()?
            .to_owned())
    }
}

impl SegmentationModel for Model {
    fn segment_image(&self, img: &DynamicImage) -> Result<RgbaImage> {
        let rgb_img = img.to_rgb8();
        let tensor = preprocess(&rgb_img, self.image_size);
        let prediction = self.predict(tensor.view())?;
        let mask = postprocess_mask(prediction, rgb_img.width(), rgb_img.height())?;
        mask::apply(&rgb_img, &mask, true)
    }
}

/// Resizes to `image_size`², scales by the brightest channel value and applies
/// ImageNet mean/std normalization. Output is NCHW with a batch of one.
pub fn preprocess(image: &RgbImage, image_size: u32) -> Array4<f32> {
    let image = imageops::resize(image, image_size, image_size, FilterType::Lanczos3);
    let max = image.as_raw().iter().copied().max().map_or(0.0, f32::from).max(1e-6);

    let mut tensor = image
        .as_ndarray3()
        .mapv(|v| f32::from(v) / max)
        .insert_axis(Axis(0));
    for (channel, mut plane) in tensor.axis_iter_mut(Axis(1)).enumerate() {
        plane.mapv_inplace(|v| (v - MEAN[channel]) / STD[channel]);
    }
    tensor
}

/// Min-max normalizes the first channel of the prediction and resizes it back
/// to the source image size.
pub fn postprocess_mask(
    prediction: Array4<f32>,
    width: u32,
    height: u32,
) -> Result<ImageBuffer<Luma<f32>, Vec<f32>>> {
    let (batch, channels, mask_height, mask_width) = prediction.dim();
    if batch == 0 || channels == 0 {
        return Err(CutoutError::validation(
            "model output",
            format!("has empty batch or channel axis: {:?}", prediction.shape()),
        ));
    }
    let plane = prediction.slice(s![0, 0, .., ..]);

    let (lo, hi) = plane
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    let normalized = plane.mapv(|v| if range > 0.0 { (v - lo) / range } else { 0.0 });

    let mask: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_raw(
        mask_width as u32,
        mask_height as u32,
        normalized.as_standard_layout().iter().copied().collect(),
    )
    .ok_or_else(|| CutoutError::validation("model output", "mask has unexpected shape"))?;

    let mask = imageops::resize(&mask, width, height, FilterType::Lanczos3);
    Ok(ImageBuffer::from_fn(width, height, |x, y| {
        let Luma([v]) = *mask.get_pixel(x, y);
        Luma([v.clamp(0.0, 1.0)])
    }))
}

fn model_error(operation: impl Into<String>, source: impl std::fmt::Display) -> CutoutError {
    CutoutError::Model {
        operation: operation.into(),
        source: source.to_string().into(),
    }
}
