use std::process::ExitCode;

use anyhow::{ensure, Context, Result};
use clap::Parser;

use cutout_rs::{logging::init_tracing, MergePdfConfig, MergeSummary, PdfMerger};

fn main() -> ExitCode {
    let config = MergePdfConfig::parse();
    if let Err(e) = init_tracing(config.verbose) {
        eprintln!("Warning: {e:#}");
    }

    match run(&config) {
        Ok(summary) => {
            println!(
                "✅ Merged {} PDFs into {}",
                summary.documents,
                summary.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(config: &MergePdfConfig) -> Result<MergeSummary> {
    for input in &config.inputs {
        ensure!(input.exists(), "Input PDF does not exist: {}", input.display());
    }

    PdfMerger::new()
        .with_progress(true)
        .merge_files(&config.inputs, &config.output)
        .with_context(|| format!("Failed to merge into {}", config.output.display()))
}
