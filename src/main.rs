// SPDX-License-Identifier: MIT
//! `cubits` command-line tool for creating and reading `.cub` documents

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cubits::{Config, Document, DocumentCodec, DocumentMetadata, DOCUMENT_EXTENSION};

#[derive(Parser)]
#[command(name = "cubits")]
#[command(about = "Encode and decode CUBITs (.cub) text documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a plain text file into a .cub document
    Encode {
        /// Plain text input file
        input: PathBuf,
        /// Output .cub file (default: input with a .cub extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Decode a .cub document back to plain text
    Decode {
        /// Input .cub file
        input: PathBuf,
        /// Output text file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show metadata and statistics of a .cub document
    Info {
        /// Input .cub file
        input: PathBuf,
    },
    /// Create an empty untitled document
    New {
        /// Output .cub file
        output: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
}

fn main() -> Result<()> {
    let config = Config::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let codec = DocumentCodec::with_config(&config);
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            title,
            author,
            description,
            tags,
        } => {
            let mut metadata = DocumentMetadata::generated();
            metadata.title = title;
            metadata.author = author;
            metadata.description = description;
            if let Some(tags) = tags {
                metadata.set_tags_from_csv(&tags);
            }
            let output = output.unwrap_or_else(|| input.with_extension(DOCUMENT_EXTENSION));
            encode_file(codec, &input, &output, metadata)?
        }
        Commands::Decode { input, output } => decode_file(codec, &input, output.as_deref())?,
        Commands::Info { input } => show_info(codec, &input)?,
        Commands::New { output, title } => {
            let mut doc = Document::with_codec(codec);
            if let Some(title) = title {
                doc.metadata_mut().title = Some(title);
            }
            doc.save_to(&output)
                .with_context(|| format!("Failed to write {:?}", output))?;
        }
    }

    Ok(())
}

fn encode_file(
    codec: DocumentCodec,
    input: &Path,
    output: &Path,
    metadata: DocumentMetadata,
) -> Result<()> {
    let text =
        fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;

    let mut doc = Document::with_codec(codec);
    doc.set_text(text);
    *doc.metadata_mut() = metadata;
    doc.save_to(output)
        .with_context(|| format!("Failed to encode {:?} into {:?}", input, output))?;

    info!("Encoded {} characters", doc.stats().characters);
    Ok(())
}

fn decode_file(codec: DocumentCodec, input: &Path, output: Option<&Path>) -> Result<()> {
    let doc = Document::open_with(codec, input)
        .with_context(|| format!("Failed to load {:?}", input))?;

    match output {
        Some(path) => {
            fs::write(path, doc.text()).with_context(|| format!("Failed to write {:?}", path))?
        }
        None => print!("{}", doc.text()),
    }
    Ok(())
}

fn show_info(codec: DocumentCodec, input: &Path) -> Result<()> {
    let doc = Document::open_with(codec, input)
        .with_context(|| format!("Failed to load {:?}", input))?;
    let stats = doc.stats();

    println!("{}", doc.title_line());
    println!("{}", serde_json::to_string_pretty(doc.metadata())?);
    println!("Characters: {}", stats.characters);
    println!("Words: {}", stats.words);
    println!("Lines: {}", stats.lines);
    println!("Text size (bytes): {}", stats.text_bytes);
    println!("Metadata size (bytes): {}", stats.metadata_bytes);
    Ok(())
}
