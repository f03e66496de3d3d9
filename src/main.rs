// TextLens CLI: run the analysis pipeline over a file or inline text and
// print the combined result, colored or as JSON.
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use textlens::config::NlpConfig;
use textlens::model::ModelRegistry;
use textlens::processor::{NlpProcessor, NlpRequest, NlpResult};

#[derive(Parser)]
#[command(name = "TextLens", about = "Local text analysis — summarization, sentiment, entities, language")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Analyze {
        /// File to analyze (txt, md, csv, json or pdf)
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Inline text to analyze
        #[arg(short, long)]
        text: Option<String>,
        /// Comma-separated operations to run
        #[arg(short, long, default_value = "summarize,sentiment,entities,language")]
        ops: String,
        /// Maximum summary length in characters
        #[arg(short, long)]
        max_length: Option<usize>,
        /// Optional JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit the combined result as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn read_text_file(path: &Path) -> Result<String> {
    let mut content = String::new();
    let mut file = File::open(path)?;
    file.read_to_string(&mut content)?;
    Ok(content)
}

fn read_file_content(path: &Path) -> Result<String> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    match ext {
        "txt" | "md" | "csv" | "json" => read_text_file(path),
        "pdf" => pdf_extract::extract_text(path)
            .map_err(|e| anyhow!("PDF extraction failed: {}", e)),
        _ => Err(anyhow!("Unsupported file format: {}", ext)),
    }
}

fn parse_operations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|op| op.trim().to_string())
        .filter(|op| !op.is_empty())
        .collect()
}

fn run_analyze(
    file: Option<PathBuf>,
    text: Option<String>,
    ops: String,
    max_length: Option<usize>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => NlpConfig::load(&path)?,
        None => NlpConfig::default(),
    };
    let text = match (file, text) {
        (Some(path), _) => read_file_content(&path)?,
        (None, Some(text)) => text,
        (None, None) => return Err(anyhow!("provide --file or --text")),
    };

    let models = ModelRegistry::initialize(&config);
    let processor = NlpProcessor::new(config, models);
    let request = NlpRequest {
        text,
        operations: parse_operations(&ops),
        max_summary_length: max_length,
    };
    let result = processor.process(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    } else {
        print_result(&result)
    }
}

fn print_result(result: &NlpResult) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    if let Some(summary) = &result.summary {
        heading(&mut stdout, "Summary")?;
        writeln!(stdout, "{}", summary)?;
    }
    if let Some(sentiment) = &result.sentiment {
        heading(&mut stdout, "Sentiment")?;
        writeln!(
            stdout,
            "{} (score {:.2}, confidence {:.2})",
            sentiment.label, sentiment.score, sentiment.confidence
        )?;
    }
    if let Some(entities) = &result.entities {
        heading(&mut stdout, "Entities")?;
        if entities.is_empty() {
            writeln!(stdout, "(none found)")?;
        }
        for entity in entities {
            writeln!(stdout, "{} [{}] {:.2}", entity.text, entity.label, entity.confidence)?;
        }
    }
    if let Some(language) = &result.language {
        heading(&mut stdout, "Language")?;
        writeln!(stdout, "{} (confidence {:.2})", language.code, language.confidence)?;
    }
    for failure in &result.failures {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(stdout, "{} failed: {}", failure.operation, failure.message)?;
        stdout.reset()?;
    }
    Ok(())
}

fn heading(out: &mut StandardStream, title: &str) -> Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(out, "== {} ==", title)?;
    out.reset()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { file, text, ops, max_length, config, json } => {
            run_analyze(file, text, ops, max_length, config, json)
        }
    }
}
