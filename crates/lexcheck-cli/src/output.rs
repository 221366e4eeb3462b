//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::{DateTime, SecondsFormat};
use colored::*;
use lexcheck_domain::{ExtractionSummary, StatuteRecord, VerificationStatus};
use lexcheck_extractor::{ExtractionResult, ReverifyOutcome, VerificationOutcome};
use lexcheck_janitor::SweepMetrics;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format statute records.
    pub fn format_statutes(&self, records: &[StatuteRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_statutes_json(records),
            OutputFormat::Table => self.format_statutes_table(records),
            OutputFormat::Quiet => self.format_statutes_quiet(records),
        }
    }

    /// Format a single statute record with its excerpt.
    pub fn format_statute(&self, record: &StatuteRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&statute_json(record))?),
            OutputFormat::Quiet => self.format_statutes_quiet(std::slice::from_ref(record)),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["ID", &record.id.to_string()]);
                builder.push_record(["Document", &record.document_id.to_string()]);
                builder.push_record(["Reference", &record.reference]);
                builder.push_record(["Jurisdiction", record.jurisdiction.as_str()]);
                builder.push_record(["Found as", &record.display_text]);
                builder.push_record(["Status", &self.status(record.status)]);
                builder.push_record(["Verified", &optional_time(record.verified_at)]);
                builder.push_record([
                    "Source",
                    record.source_database.as_deref().unwrap_or("-"),
                ]);
                builder.push_record(["Last failure", record.last_error.as_deref().unwrap_or("-")]);
                builder.push_record(["Excerpt", &record.excerpt]);

                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format the result of an extraction pass.
    pub fn format_extraction(&self, result: &ExtractionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "pass_id": result.metadata.pass_id.to_string(),
                    "document_id": result.metadata.document_id.value(),
                    "summary": summary_json(&result.summary),
                    "statutes": result.records.iter().map(statute_json).collect::<Vec<_>>(),
                    "failures": result.failures.iter().map(|f| f.reason.clone()).collect::<Vec<_>>(),
                    "processing_time_ms": result.metadata.processing_time_ms,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => self.format_statutes_quiet(&result.records),
            OutputFormat::Table => {
                let mut output = self.format_statutes_table(&result.records)?;
                output.push('\n');
                output.push_str(&self.summary(&result.summary));
                for failure in &result.failures {
                    output.push('\n');
                    output.push_str(&self.warning(&failure.reason));
                }
                Ok(output)
            }
        }
    }

    /// Format the outcome of a re-verification.
    pub fn format_reverify(&self, outcome: &ReverifyOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let label = match outcome.outcome {
                    VerificationOutcome::Verified => "verified",
                    VerificationOutcome::Failed(_) => "failed",
                    VerificationOutcome::Discarded => "discarded",
                };
                let value = serde_json::json!({
                    "outcome": label,
                    "message": outcome.message(),
                    "statute": outcome.record.as_ref().map(statute_json),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(outcome
                .record
                .as_ref()
                .map(|r| r.status.as_str().to_string())
                .unwrap_or_default()),
            OutputFormat::Table => Ok(match outcome.outcome {
                VerificationOutcome::Verified => self.success(&outcome.message()),
                VerificationOutcome::Failed(_) => self.warning(&outcome.message()),
                VerificationOutcome::Discarded => self.info(&outcome.message()),
            }),
        }
    }

    /// Format accumulated sweep metrics.
    pub fn format_metrics(&self, metrics: &SweepMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "sweep_count": metrics.sweep_count,
                    "checked": metrics.checked,
                    "current": metrics.current,
                    "outdated": metrics.outdated,
                    "unresolved": metrics.unresolved,
                    "discarded": metrics.discarded,
                    "would_check": metrics.would_check,
                    "total_runtime_ms": metrics.total_runtime_ms,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(metrics.checked.to_string()),
            OutputFormat::Table => Ok(metrics.summary()),
        }
    }

    /// Format statutes as JSON.
    fn format_statutes_json(&self, records: &[StatuteRecord]) -> Result<String> {
        let values: Vec<serde_json::Value> = records.iter().map(statute_json).collect();
        Ok(serde_json::to_string_pretty(&values)?)
    }

    /// Format statutes as a table.
    fn format_statutes_table(&self, records: &[StatuteRecord]) -> Result<String> {
        if records.is_empty() {
            return Ok(self.colorize("No statute references found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Document", "Reference", "Jurisdiction", "Status", "Verified"]);

        for record in records {
            builder.push_record([
                record.id.to_string().as_str(),
                record.document_id.to_string().as_str(),
                &record.reference,
                record.jurisdiction.as_str(),
                &self.status(record.status),
                &optional_time(record.verified_at),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format statutes in quiet mode (IDs only).
    fn format_statutes_quiet(&self, records: &[StatuteRecord]) -> Result<String> {
        let ids: Vec<String> = records.iter().map(|r| r.id.to_string()).collect();
        Ok(ids.join("\n"))
    }

    /// One-line summary of a pass or batch.
    pub fn summary(&self, summary: &ExtractionSummary) -> String {
        if summary.outdated > 0 {
            self.warning(&summary.describe())
        } else {
            self.success(&summary.describe())
        }
    }

    /// Colored status label.
    fn status(&self, status: VerificationStatus) -> String {
        let color = match status {
            VerificationStatus::Current => "green",
            VerificationStatus::Outdated => "red",
            VerificationStatus::Unresolved => "yellow",
            VerificationStatus::Unverified => "cyan",
        };
        self.colorize(status.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Render unix seconds as an RFC 3339 UTC timestamp.
pub fn format_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn optional_time(secs: Option<u64>) -> String {
    secs.map(format_time).unwrap_or_else(|| "-".to_string())
}

fn statute_json(record: &StatuteRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id.value(),
        "document_id": record.document_id.value(),
        "reference": record.reference,
        "jurisdiction": record.jurisdiction.as_str(),
        "display_text": record.display_text,
        "excerpt": record.excerpt,
        "status": record.status.as_str(),
        "is_current": record.is_current,
        "verified_at": record.verified_at.map(format_time),
        "source_database": record.source_database,
        "last_checked_at": record.last_checked_at.map(format_time),
        "last_error": record.last_error,
        "created_at": format_time(record.created_at),
    })
}

fn summary_json(summary: &ExtractionSummary) -> serde_json::Value {
    serde_json::json!({
        "total": summary.total,
        "current": summary.current,
        "outdated": summary.outdated,
        "unresolved": summary.unresolved,
        "unverified": summary.unverified,
        "created": summary.created,
        "verified": summary.verified,
        "skipped_fresh": summary.skipped_fresh,
        "discarded": summary.discarded,
    })
}
