// file: src/exporter/json.rs
// description: json export of a finished report run
// reference: writes serde_json documents named by label and timestamp

use crate::error::{PipelineError, Result};
use crate::models::{DocumentSummary, Report, SpecExtraction};
use crate::pipeline::PipelineStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedReport<'a> {
    pub exported_at: String,
    pub label: &'a str,
    pub report: &'a str,
    pub summaries: &'a [DocumentSummary],
    pub specs: &'a SpecExtraction,
    pub stats: &'a PipelineStats,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| PipelineError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    pub fn export(&self, report: &Report, label: &str, pretty: bool) -> Result<PathBuf> {
        self.export_at(report, label, pretty, Utc::now())
    }

    fn export_at(
        &self,
        report: &Report,
        label: &str,
        pretty: bool,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let exported = ExportedReport {
            exported_at: now.to_rfc3339(),
            label,
            report: &report.text,
            summaries: &report.summaries,
            specs: &report.specs,
            stats: &report.stats,
        };

        let body = if pretty {
            serde_json::to_string_pretty(&exported)?
        } else {
            serde_json::to_string(&exported)?
        };

        let path = self.output_dir.join(format!(
            "{}-{}.json",
            slugify(label),
            now.format("%Y%m%dT%H%M%S")
        ));
        fs::write(&path, body).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;

        info!("Report exported to {}", path.display());
        Ok(path)
    }
}

fn slugify(label: &str) -> String {
    let slug = label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "report".to_string()
    } else {
        slug
    }
}
