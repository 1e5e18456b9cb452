use std::{
    io::{self, Write},
    process::ExitCode,
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cutout_rs::{logging::init_tracing, BackgroundRemover, RemovalSummary, RemoveBgConfig};

const FAILURE_LINE: &str = "❌ Failed to remove background";

fn main() -> ExitCode {
    let config = RemoveBgConfig::parse();
    if let Err(e) = init_tracing(config.verbose) {
        eprintln!("Warning: {e:#}");
    }

    let result = run(config);
    let code = report(&result, &mut io::stdout().lock(), &mut io::stderr().lock());
    ExitCode::from(code)
}

/// Prints the status line for `result` and returns the process exit status.
fn report(result: &Result<RemovalSummary>, out: &mut impl Write, err: &mut impl Write) -> u8 {
    match result {
        Ok(summary) => {
            let _ = writeln!(out, "{}", summary.status_line());
            0
        }
        Err(e) => {
            let _ = writeln!(err, "Error: {e:#}");
            let _ = writeln!(err, "{FAILURE_LINE}");
            1
        }
    }
}

fn run(config: RemoveBgConfig) -> Result<RemovalSummary> {
    ensure!(
        config.input.exists(),
        "Input image does not exist: {}",
        config.input.display()
    );
    ensure!(
        config.model_path.exists(),
        "Model path does not exist: {}",
        config.model_path.display()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("loading model");

    let result = BackgroundRemover::with_onnx_model(config)
        .context("Failed to load model")
        .and_then(|remover| {
            spinner.set_message("removing background");
            remover.process().context("Failed to process image")
        });
    spinner.finish_and_clear();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_input_reports_failure() {
        let config = RemoveBgConfig::new("does/not/exist.png", "out.png");
        let result = run(config);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert_eq!(report(&result, &mut out, &mut err), 1);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            concat!(
                "Error: Input image does not exist: does/not/exist.png\n",
                "❌ Failed to remove background\n"
            )
        );
    }

    #[test]
    fn test_success_prints_status_line() {
        let result = Ok(RemovalSummary {
            output: PathBuf::from("out.png"),
            width: 2,
            height: 2,
            border: 3,
            border_color: "red".to_string(),
        });

        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert_eq!(report(&result, &mut out, &mut err), 0);
        assert!(err.is_empty());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "✅ Background removed with 3px red border: out.png\n"
        );
    }
}
