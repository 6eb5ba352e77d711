use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::assembler::Chunk;
use crate::config::ChunkerConfig;
use crate::parser::DocumentFormat;
use crate::pipeline::ChunkedDocument;

/// Write chunks as JSON lines, one object per line.
pub fn write_jsonl<W: Write>(mut writer: W, chunks: &[Chunk]) -> Result<()> {
    for chunk in chunks {
        serde_json::to_writer(&mut writer, chunk).context("Failed to serialize chunk")?;
        writer.write_all(b"\n").context("Failed to write chunk")?;
    }
    Ok(())
}

/// Read back chunks written by [`write_jsonl`], skipping blank lines
pub fn read_jsonl(raw: &str) -> Result<Vec<Chunk>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).context(format!("Invalid chunk on line {}", idx + 1))
        })
        .collect()
}

/// Summary of one chunking run
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub created_at: String,
    pub generator: String,
    pub config: ChunkerConfig,
    pub stats: ManifestStats,
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ManifestStats {
    pub source_count: u32,
    pub unit_count: u64,
    pub chunk_count: u64,
    pub oversized_count: u64,
    pub warning_count: u64,
    pub total_size_bytes: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceEntry {
    pub source: String,
    pub format: DocumentFormat,
    pub sha256: String,
    pub size_bytes: u64,
    pub units: usize,
    pub chunks: usize,
    pub oversized: usize,
    pub warnings: usize,
}

impl Manifest {
    pub fn new(config: &ChunkerConfig) -> Self {
        Self {
            version: "1.0.0".to_string(),
            created_at: Utc::now().to_rfc3339(),
            generator: format!("legal-chunker v{}", env!("CARGO_PKG_VERSION")),
            config: config.clone(),
            stats: ManifestStats::default(),
            sources: Vec::new(),
        }
    }

    /// Record one chunked document
    pub fn record(&mut self, document: &ChunkedDocument) {
        let oversized = document.chunks.iter().filter(|c| c.length_exceeded).count();

        self.stats.source_count += 1;
        self.stats.unit_count += document.unit_count as u64;
        self.stats.chunk_count += document.chunks.len() as u64;
        self.stats.oversized_count += oversized as u64;
        self.stats.warning_count += document.warning_count as u64;
        self.stats.total_size_bytes += document.metadata.size_bytes as u64;

        self.sources.push(SourceEntry {
            source: document.metadata.source.clone(),
            format: document.metadata.format,
            sha256: document.metadata.sha256.clone(),
            size_bytes: document.metadata.size_bytes as u64,
            units: document.unit_count,
            chunks: document.chunks.len(),
            oversized,
            warnings: document.warning_count,
        });
    }

    /// Write the manifest as pretty-printed JSON
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .context(format!("Failed to create manifest file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).context("Failed to serialize manifest")?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .context("Failed to write manifest")?;
        Ok(())
    }
}
