//! Command implementations

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::AppConfig;
use crate::app::{AppContainer, DefaultAppContainer, InspectRequest, OutputFormat};
use crate::cli::args::{InspectArgs, ParseArgs};

fn output_format(json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    }
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, config: &AppConfig) -> Result<()> {
    info!("Input: {}", args.input.display());

    let container = DefaultAppContainer::new(config);
    let request = InspectRequest::with_format(&args.input, output_format(args.json));
    let response = container
        .inspect_interactor()
        .execute(request)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    print!("{}", response.summary);
    if !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Execute the parse command
pub fn parse(args: ParseArgs, config: &AppConfig) -> Result<()> {
    let (source, text) = read_report(&args.report)?;
    info!("Report: {} ({} bytes)", source, text.len());

    let container = DefaultAppContainer::new(config);
    let response = container
        .inspect_interactor()
        .execute_captured(&source, &text, output_format(args.json))
        .with_context(|| format!("Failed to parse report {}", source))?;

    print!("{}", response.summary);
    if !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn read_report(path: &Path) -> Result<(String, String)> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read report from standard input")?;
        return Ok(("<stdin>".to_string(), text));
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read report file {}", path.display()))?;
    Ok((
        path.display().to_string(),
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}
