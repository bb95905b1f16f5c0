//! Process command - consolidate a single picking list.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use pickr_core::{
    duplicate_groups, extract_from_pdf, packing_tail, ManifestParser, ParseResult,
    PickingListParser, PickrConfig, TokenizerMode,
};

use super::{load_config, render};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Tokenizer mode (default: from config)
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Write the packing section pages to this PDF
    #[arg(long)]
    packing_out: Option<PathBuf>,

    /// List legacy codes that were merged
    #[arg(long)]
    show_duplicates: bool,

    /// Show extraction statistics
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

/// How order-section text is cut into candidate lines.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ModeArg {
    /// One candidate per text line
    Line,
    /// Candidates cut at record tails, for wrapped descriptions
    Segment,
    /// Line mode, then segment mode when nothing matched
    Auto,
}

impl From<ModeArg> for TokenizerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Line => TokenizerMode::Line,
            ModeArg::Segment => TokenizerMode::Segment,
            ModeArg::Auto => TokenizerMode::Auto,
        }
    }
}

impl OutputFormat {
    /// File extension used for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// A parsed document together with the bytes it came from.
pub struct Processed {
    pub result: ParseResult,
    /// Original PDF bytes, absent for text input.
    pub pdf_data: Option<Vec<u8>>,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(mode) = args.mode {
        config.extraction.mode = mode.into();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    let processed = process_file(&args.input, &config, Some(&pb))?;
    pb.finish_and_clear();

    let result = &processed.result;
    for warning in &result.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    if let Some(packing_path) = &args.packing_out {
        write_packing(&processed, packing_path)?;
    }

    let output = format_result(result, args.format, &config)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_duplicates {
        println!();
        print!("{}", render::format_duplicates(&duplicate_groups(&result.records)));
    }

    if args.stats {
        println!();
        print!("{}", render::format_stats(result));
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read and parse one input file.
pub fn process_file(
    path: &Path,
    config: &PickrConfig,
    pb: Option<&ProgressBar>,
) -> anyhow::Result<Processed> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            step(pb, 10, "Loading PDF...");
            let data = fs::read(path)?;

            step(pb, 40, "Extracting picking lines...");
            let result = extract_from_pdf(&data, config)?;

            step(pb, 100, "Done");
            Ok(Processed {
                result,
                pdf_data: Some(data),
            })
        }
        "txt" => {
            step(pb, 30, "Reading text...");
            let text = fs::read_to_string(path)?;

            step(pb, 70, "Extracting picking lines...");
            let result = PickingListParser::from_config(config).parse_text(&text)?;

            step(pb, 100, "Done");
            Ok(Processed {
                result,
                pdf_data: None,
            })
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Write the pages from the packing boundary onward as a separate PDF.
pub fn write_packing(processed: &Processed, path: &Path) -> anyhow::Result<()> {
    let Some(data) = &processed.pdf_data else {
        anyhow::bail!("--packing-out needs a PDF input");
    };
    let Some(start) = processed.result.packing_start else {
        eprintln!(
            "{} Packing section not found, {} not written",
            style("!").yellow(),
            path.display()
        );
        return Ok(());
    };

    let tail = packing_tail(data, start)?;
    fs::write(path, tail)?;
    println!(
        "{} Packing section ({} pages) written to {}",
        style("✓").green(),
        processed.result.packing_page_count(),
        path.display()
    );
    Ok(())
}

pub fn format_result(
    result: &ParseResult,
    format: OutputFormat,
    config: &PickrConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => render::format_json(result),
        OutputFormat::Csv => render::format_csv(result),
        OutputFormat::Text => Ok(render::format_text(result, &config.output)),
    }
}

fn step(pb: Option<&ProgressBar>, position: u64, message: &'static str) {
    if let Some(pb) = pb {
        pb.set_message(message);
        pb.set_position(position);
    }
}
