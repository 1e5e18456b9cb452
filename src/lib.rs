pub mod color;
pub mod config;
pub mod errors;
pub mod imageops_ext;
pub mod logging;
pub mod model;
pub mod pdf;
pub mod traits;

use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};

pub use color::{parse_color, Color};
pub use config::{MergePdfConfig, RemoveBgConfig};
pub use errors::{CutoutError, Result};
pub use imageops_ext::add_outline;
pub use model::Model;
pub use pdf::{merge_documents, MergeSummary, PdfMerger};
pub use traits::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub border: u32,
    pub border_color: String,
}

impl RemovalSummary {
    /// Human-readable line reported on success.
    pub fn status_line(&self) -> String {
        if self.border > 0 {
            format!(
                "✅ Background removed with {}px {} border: {}",
                self.border,
                self.border_color,
                self.output.display()
            )
        } else {
            format!("✅ Background removed: {}", self.output.display())
        }
    }
}

/// Single-image pipeline: decode, segment, outline, encode as PNG.
pub struct BackgroundRemover<M: SegmentationModel> {
    model: M,
    config: RemoveBgConfig,
}

impl<M: SegmentationModel> BackgroundRemover<M> {
    pub const fn new(model: M, config: RemoveBgConfig) -> Self {
        Self { model, config }
    }

    pub fn process(&self) -> Result<RemovalSummary> {
        let input = &self.config.input;
        let output = &self.config.output;

        let img = image::open(input).map_err(|e| CutoutError::ImageProcessing {
            path: input.display().to_string(),
            operation: "image decode".to_string(),
            source: Box::new(e),
        })?;
        tracing::info!(
            input = %input.display(),
            width = img.width(),
            height = img.height(),
            "image loaded"
        );

        let result = self.render(&img).map_err(|e| CutoutError::ImageProcessing {
            path: input.display().to_string(),
            operation: "background removal".to_string(),
            source: Box::new(e),
        })?;

        save_png(&result, output)?;
        tracing::info!(output = %output.display(), "image saved");

        Ok(RemovalSummary {
            output: output.clone(),
            width: result.width(),
            height: result.height(),
            border: self.config.border,
            border_color: self.config.border_color.clone(),
        })
    }

    /// Segments `img` and draws the configured outline.
    pub fn render(&self, img: &image::DynamicImage) -> Result<RgbaImage> {
        let cutout = self.model.segment_image(img)?;
        Ok(add_outline(
            &cutout,
            self.config.border,
            self.config.resolved_border_color(),
        ))
    }
}

/// Writes `image` as PNG regardless of the extension of `path`.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| CutoutError::ImageProcessing {
            path: path.display().to_string(),
            operation: "png encode".to_string(),
            source: Box::new(e),
        })
}

impl BackgroundRemover<Model> {
    pub fn with_onnx_model(config: RemoveBgConfig) -> Result<Self> {
        let model = Model::new(&config.model_path, config.device_id)?;
        Ok(Self::new(model, config))
    }
}
