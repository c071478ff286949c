//! Report document assembly.

use crate::error::{MinutierError, Result};
use std::path::{Path, PathBuf};

/// Trait for persisting the final meeting report.
///
/// This trait allows swapping implementations (file formats vs mock).
pub trait ReportWriter: Send + Sync {
    /// Write a report for the given source name and return its path.
    ///
    /// # Arguments
    /// * `stem` - Base name of the input recording, used to derive the file name
    /// * `transcript` - Full speaker-labeled transcript
    /// * `summary` - Generated meeting summary
    fn write(&self, stem: &str, transcript: &str, summary: &str) -> Result<PathBuf>;
}

/// Writes the report as a Markdown document into an output directory.
///
/// The layout mirrors the delivered report: the detailed transcript first,
/// then the meeting summary.
pub struct MarkdownReportWriter {
    output_dir: PathBuf,
}

impl MarkdownReportWriter {
    /// Create a writer targeting `output_dir` (created on demand).
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory reports are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ReportWriter for MarkdownReportWriter {
    fn write(&self, stem: &str, transcript: &str, summary: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| MinutierError::Report {
            message: format!(
                "cannot create output directory {}: {}",
                self.output_dir.display(),
                e
            ),
        })?;

        let path = self.output_dir.join(format!("{stem}.report.md"));
        let content = format!(
            "# Detailed transcript\n\n{}\n\n---\n\n# Meeting summary\n\n{}\n",
            transcript, summary
        );
        std::fs::write(&path, content).map_err(|e| MinutierError::Report {
            message: format!("cannot write report {}: {}", path.display(), e),
        })?;
        Ok(path)
    }
}

/// Mock report writer for testing
#[derive(Debug, Clone)]
pub struct MockReportWriter {
    path: PathBuf,
    should_fail: bool,
}

impl MockReportWriter {
    /// Create a new mock writer returning a fixed path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            should_fail: false,
        }
    }

    /// Configure the mock to fail on write
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl ReportWriter for MockReportWriter {
    fn write(&self, _stem: &str, _transcript: &str, _summary: &str) -> Result<PathBuf> {
        if self.should_fail {
            Err(MinutierError::Report {
                message: "mock report failure".to_string(),
            })
        } else {
            Ok(self.path.clone())
        }
    }
}
