//! Per-pipeline error guards and the end-of-run summary
//!
//! Each pipeline runs behind its own guard: a failure is printed with an
//! `Error:` prefix, stops that pipeline, and is kept in the summary. The
//! next pipeline still runs.

use crate::config::Config;
use crate::survey::{survey_materials, SurveyReport};
use crate::textures::{extract_textures, CopyMode, TextureReport};
use crate::Error;
use std::fmt;

/// Result of one guarded pipeline
#[derive(Debug)]
pub enum PipelineOutcome<T> {
    Completed(T),
    Failed(Error),
}

impl<T> PipelineOutcome<T> {
    fn guard(name: &str, result: crate::Result<T>) -> Self {
        match result {
            Ok(report) => PipelineOutcome::Completed(report),
            Err(err) => {
                tracing::debug!("{} pipeline stopped", name);
                eprintln!("Error: {}", err);
                PipelineOutcome::Failed(err)
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed(_))
    }

    pub fn report(&self) -> Option<&T> {
        match self {
            PipelineOutcome::Completed(report) => Some(report),
            PipelineOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            PipelineOutcome::Completed(_) => None,
            PipelineOutcome::Failed(err) => Some(err),
        }
    }
}

/// Outcomes of the pipelines that ran
#[derive(Debug, Default)]
pub struct RunSummary {
    pub textures: Option<PipelineOutcome<TextureReport>>,
    pub materials: Option<PipelineOutcome<SurveyReport>>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run texture extraction behind its guard and record the outcome
    pub fn run_textures(&mut self, config: &Config, mode: CopyMode) -> &PipelineOutcome<TextureReport> {
        let outcome = PipelineOutcome::guard("Texture extraction", extract_textures(config, mode));
        self.textures.insert(outcome)
    }

    /// Run the material survey behind its guard and record the outcome
    pub fn run_materials(&mut self, config: &Config) -> &PipelineOutcome<SurveyReport> {
        let outcome = PipelineOutcome::guard("Material survey", survey_materials(config));
        self.materials.insert(outcome)
    }

    /// True when every pipeline that ran completed
    pub fn is_success(&self) -> bool {
        self.textures.as_ref().map_or(true, PipelineOutcome::is_completed)
            && self.materials.as_ref().map_or(true, PipelineOutcome::is_completed)
    }

    pub fn failures(&self) -> Vec<&Error> {
        let textures = self.textures.as_ref().and_then(PipelineOutcome::error);
        let materials = self.materials.as_ref().and_then(PipelineOutcome::error);
        textures.into_iter().chain(materials).collect()
    }
}

/// Texture extraction followed by the material survey
pub fn run_all(config: &Config, mode: CopyMode) -> RunSummary {
    let mut summary = RunSummary::new();
    summary.run_textures(config, mode);
    summary.run_materials(config);
    summary
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.textures {
            Some(PipelineOutcome::Completed(report)) => {
                writeln!(
                    f,
                    "Textures: {} models, {} materials, {} swatches, {} files copied",
                    report.models,
                    report.materials.len(),
                    report.swatches.len(),
                    report.total_copied()
                )?;
                if !report.collisions.is_empty() {
                    writeln!(
                        f,
                        "  {} copies overwritten by same-named files",
                        report.collisions.len()
                    )?;
                }
            }
            Some(PipelineOutcome::Failed(err)) => writeln!(f, "Textures: failed ({})", err)?,
            None => {}
        }

        match &self.materials {
            Some(PipelineOutcome::Completed(report)) => {
                let written = report
                    .written
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "nothing written".to_string());
                writeln!(
                    f,
                    "Materials: {} models, {} with materials, {}",
                    report.models,
                    report.survey.len(),
                    written
                )?;
            }
            Some(PipelineOutcome::Failed(err)) => writeln!(f, "Materials: failed ({})", err)?,
            None => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn io_error() -> Error {
        Error::Read {
            path: PathBuf::from("/missing.modelbin"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
    }

    #[test]
    fn test_guard_keeps_error() {
        let outcome: PipelineOutcome<()> = PipelineOutcome::guard("Test", Err(io_error()));
        assert!(!outcome.is_completed());
        assert!(outcome.report().is_none());
        assert!(outcome
            .error()
            .unwrap()
            .to_string()
            .contains("/missing.modelbin"));
    }

    #[test]
    fn test_summary_success_and_failures() {
        let mut summary = RunSummary::new();
        assert!(summary.is_success());

        summary.materials = Some(PipelineOutcome::Completed(SurveyReport::default()));
        assert!(summary.is_success());

        summary.textures = Some(PipelineOutcome::Failed(io_error()));
        assert!(!summary.is_success());
        assert_eq!(summary.failures().len(), 1);

        let text = summary.to_string();
        assert!(text.starts_with("Textures: failed (Failed to read /missing.modelbin"));
        assert!(text.contains("Materials: 0 models, 0 with materials, nothing written"));
    }
}
