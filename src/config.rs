use clap::Parser;
use std::path::PathBuf;

use crate::color::{parse_color, Color};

/// Remove the background from an image and optionally outline the subject.
#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct RemoveBgConfig {
    /// Input image file
    pub input: PathBuf,

    /// Output image file (always written as PNG)
    pub output: PathBuf,

    /// Border size in pixels around the subject (0 = no border)
    #[arg(long, default_value_t = 0)]
    pub border: u32,

    /// Border color: a name (white, red, ...), #RRGGBB or rgb(r,g,b)
    #[arg(long, default_value = "white")]
    pub border_color: String,

    /// Segmentation model in ONNX format
    #[arg(short, long, default_value = "models/u2net.onnx")]
    pub model_path: PathBuf,

    #[arg(short, long, default_value_t = 0)]
    pub device_id: i32,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl RemoveBgConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            border: 0,
            border_color: "white".to_string(),
            model_path: PathBuf::from("models/u2net.onnx"),
            device_id: 0,
            verbose: 0,
        }
    }

    pub fn with_border(mut self, border: u32, color: impl Into<String>) -> Self {
        self.border = border;
        self.border_color = color.into();
        self
    }

    pub fn resolved_border_color(&self) -> Color {
        parse_color(&self.border_color)
    }
}

/// Concatenate the pages of several PDF files into one.
#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct MergePdfConfig {
    /// Output PDF file
    pub output: PathBuf,

    /// Input PDF files, merged in the order given
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
