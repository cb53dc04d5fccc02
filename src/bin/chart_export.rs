use std::path::PathBuf;
use std::process::ExitCode;

use chart_export::pipeline::{export_document, load_document};
use chart_export::telemetry::init_default_tracing;
use chart_export::{ExportConfig, ExportError, Language, validate_document};
use clap::Parser;

const BANNER_WIDTH: usize = 60;

const EXIT_FAILURE: u8 = 1;
const EXIT_RENDER_FAILURE: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "chart-export",
    version,
    about = "Export a chart-data JSON file to an Excel workbook and a PDF report"
)]
struct Cli {
    /// Chart-data JSON document.
    input: PathBuf,
    #[arg(long, help = "Directory for the generated files [default: current directory]")]
    output_dir: Option<PathBuf>,
    #[arg(long, value_enum, help = "Language of labels inside the generated files")]
    lang: Option<Language>,
    #[arg(long, help = "JSON file with page sizes, style and label overrides")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = init_default_tracing();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            match &err {
                ExportError::Validation(inner) if inner.is_no_data() => {
                    eprintln!("warning: {inner}");
                }
                _ => eprintln!("error: {err}"),
            }
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, ExportError> {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("{rule}");
    println!("Chart data export tool");
    println!("{rule}");

    let config = build_config(cli)?;

    println!("\nLoading data file: {}", cli.input.display());
    let raw = load_document(&cli.input)?;

    println!("Validating data structure...");
    let document = validate_document(&raw)?;
    println!("Found {} chart(s)", document.len());

    let report = export_document(&document, &cli.input, &config);
    for artifact in report.artifacts() {
        match &artifact.error {
            None => println!("Generated: {}", artifact.path.display()),
            Some(err) => println!("Export failed for {}: {err}", artifact.path.display()),
        }
    }

    println!("\n{rule}");
    println!("Export finished");
    println!("{rule}");
    println!("\nGenerated files:");
    if report.workbook.produced() {
        println!("  Excel: {}", report.workbook.path.display());
    }
    if report.document.produced() {
        println!("  PDF: {}", report.document.path.display());
    }
    println!();

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_RENDER_FAILURE))
    }
}

fn build_config(cli: &Cli) -> Result<ExportConfig, ExportError> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::from_json_file(path)?,
        None => ExportConfig::new(),
    };
    if let Some(language) = cli.lang {
        config = config.with_language(language);
    }
    if let Some(output_dir) = &cli.output_dir {
        config = config.with_output_dir(output_dir);
    }
    config.validate()?;
    Ok(config)
}
