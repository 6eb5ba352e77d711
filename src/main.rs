use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use legal_chunker::{
    collect_sources, read_source, split_points, write_jsonl, ChunkerConfig, LegalChunker, Manifest,
};

/// Split hierarchical legal texts into bounded, ancestry-tagged chunks.
#[derive(Parser, Debug)]
#[command(name = "legal-chunker", version, about)]
struct Cli {
    /// Log filter, overrides RUST_LOG (e.g. "info", "legal_chunker=debug").
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chunk documents and write them as JSON lines.
    Chunk(ChunkArgs),
    /// Print the structural units found in documents.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct ChunkArgs {
    /// Files or directories to chunk.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Write chunks here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also write a JSON run manifest.
    #[arg(long)]
    manifest: Option<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Files or directories to inspect.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,
}

/// Chunker settings; flags override the config file.
#[derive(Args, Debug)]
struct SettingsArgs {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum characters before a chunk may close.
    #[arg(long)]
    min_chunk_size: Option<usize>,

    /// Maximum characters per merged chunk.
    #[arg(long)]
    max_chunk_size: Option<usize>,

    /// Words repeated at the start of the next chunk.
    #[arg(long)]
    overlap_words: Option<usize>,

    /// Assemble units on all cores.
    #[arg(long)]
    parallel: bool,
}

impl SettingsArgs {
    fn resolve(&self) -> Result<ChunkerConfig> {
        let mut config = match &self.config {
            Some(path) => ChunkerConfig::load(path)?,
            None => ChunkerConfig::default(),
        };

        if let Some(min) = self.min_chunk_size {
            config.min_chunk_size = min;
        }
        if let Some(max) = self.max_chunk_size {
            config.max_chunk_size = max;
        }
        if let Some(overlap) = self.overlap_words {
            config.overlap_words = overlap;
        }
        config.parallel |= self.parallel;

        config.validate().context("Invalid chunker settings")?;
        Ok(config)
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Command::Chunk(args) => run_chunk(args),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_chunk(args: ChunkArgs) -> Result<()> {
    let start_time = Instant::now();
    let chunker = LegalChunker::new(args.settings.resolve()?)?;

    let sources = collect_sources(&args.paths, chunker.registry())
        .context("Failed to collect input documents")?;
    info!(documents = sources.len(), "Chunking documents");

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).context(format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut manifest = Manifest::new(chunker.config());
    let mut failed = 0usize;

    for path in &sources {
        let source = path.to_string_lossy();
        let document = read_source(path).and_then(|bytes| chunker.chunk_bytes(&source, &bytes));

        match document {
            Ok(document) => {
                write_jsonl(&mut out, &document.chunks)
                    .context(format!("Failed to write chunks of {}", source))?;
                manifest.record(&document);
            }
            Err(e) => {
                warn!(source = %source, error = %e, "Skipping document");
                failed += 1;
            }
        }
    }
    out.flush().context("Failed to flush chunk output")?;

    if let Some(path) = &args.manifest {
        manifest.write_to_file(path)?;
    }

    eprintln!(
        "✓ {} chunks from {} documents ({} skipped) [{:.2}s]",
        manifest.stats.chunk_count,
        manifest.stats.source_count,
        failed,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let chunker = LegalChunker::new(args.settings.resolve()?)?;
    let sources = collect_sources(&args.paths, chunker.registry())
        .context("Failed to collect input documents")?;

    for path in &sources {
        let source = path.to_string_lossy();
        let bytes = read_source(path)?;
        let parsed = chunker
            .parse_bytes(&source, &bytes)
            .context(format!("Failed to parse {}", source))?;

        println!(
            "{} [{}] - {} units, {} warnings, {} lines",
            source,
            parsed.metadata.format,
            parsed.extraction.units.len(),
            parsed.extraction.warnings.len(),
            parsed.metadata.line_count
        );

        for (idx, unit) in parsed.extraction.units.iter().enumerate() {
            let path = match unit.part {
                Some(part) => format!("paragraph {}", part),
                None => {
                    let lines: Vec<&str> = unit.heading_lines().collect();
                    if lines.is_empty() {
                        "(preamble)".to_string()
                    } else {
                        lines.join(" / ")
                    }
                }
            };
            println!(
                "  {:>4}. {} - {} chars, {} points",
                idx + 1,
                path,
                unit.text.chars().count(),
                split_points(&unit.text).len()
            );
        }

        for warning in &parsed.extraction.warnings {
            println!("  ! {}", warning);
        }
    }

    Ok(())
}
