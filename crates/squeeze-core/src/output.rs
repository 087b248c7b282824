//! Machine-readable run reports in JSON or JSON Lines.
//!
//! JSON Lines records are streamed as each job finishes; JSON output is a
//! single document written once the run is complete.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::{JobRecord, RunSummary};

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON document: `{"jobs": [...], "summary": {...}}`
    Json,
    /// One job record per line
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct RunDocument<'a> {
    jobs: &'a [JobRecord],
    summary: RunSummary,
}

/// Writes job records as they complete.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    pending: Vec<JobRecord>,
}

impl<W: Write> ReportWriter<W> {
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            pending: Vec::new(),
        }
    }

    /// Record one finished job.
    pub fn record(&mut self, record: &JobRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
                writeln!(self.writer)?;
                self.writer.flush()
            }
            OutputFormat::Json => {
                self.pending.push(record.clone());
                Ok(())
            }
        }
    }

    /// Write anything still buffered and flush. Returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == OutputFormat::Json {
            let doc = RunDocument {
                jobs: &self.pending,
                summary: RunSummary::from_records(&self.pending),
            };
            if self.pretty {
                serde_json::to_writer_pretty(&mut self.writer, &doc).map_err(io::Error::other)?;
            } else {
                serde_json::to_writer(&mut self.writer, &doc).map_err(io::Error::other)?;
            }
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
