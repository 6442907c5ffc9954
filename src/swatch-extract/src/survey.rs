//! Material survey pipeline
//!
//! Lists the material references of every model descriptor and writes them
//! out as JSON:
//!
//! ```json
//! {
//!   "body/body.modelbin": [
//!     "_library\\materials\\paint\\gloss.materialbin",
//!     "_library\\materials\\rubber.materialbin"
//!   ]
//! }
//! ```
//!
//! Keys follow discovery order. Values keep every occurrence in the order it
//! appears in the file, duplicates included. Models without any material
//! reference are left out.

use crate::config::Config;
use crate::discovery::{discover, DiscoveredFile};
use crate::reference::{extract_references, material_relative_path, ReferenceKind};
use crate::{read_text, Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const NO_MODELS: &str = "No modelbin files found.";

/// Model descriptor path → material references
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialSurvey {
    pub entries: IndexMap<String, Vec<String>>,
}

impl MaterialSurvey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect material references from each model in order
    pub fn from_models(models: &[DiscoveredFile]) -> Result<Self> {
        let mut survey = Self::new();

        for model in models {
            let text = read_text(&model.path)?;
            for reference in extract_references(&text, ReferenceKind::Material) {
                survey.add(&model.relative, material_relative_path(reference));
            }
        }

        Ok(survey)
    }

    /// Append one material reference for a model
    pub fn add(&mut self, model: &str, material: &str) {
        self.entries
            .entry(model.to_string())
            .or_default()
            .push(material.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn materials_for(&self, model: &str) -> Option<&[String]> {
        self.entries.get(model).map(Vec::as_slice)
    }

    /// Write as 2-space indented JSON, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a survey previously written by [`MaterialSurvey::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Outcome of a survey run
#[derive(Debug, Clone, Default)]
pub struct SurveyReport {
    /// Model descriptors scanned
    pub models: usize,
    pub survey: MaterialSurvey,
    /// Report file, if one was written
    pub written: Option<PathBuf>,
    /// Status lines printed to stdout, in order
    pub status: Vec<String>,
}

/// Run the material survey pipeline.
///
/// Nothing is written when no model references a material.
pub fn survey_materials(config: &Config) -> Result<SurveyReport> {
    tracing::info!("Surveying materials under {}", config.work_dir.display());

    let models = discover(&config.work_dir, &config.model_pattern)?;
    let survey = MaterialSurvey::from_models(&models)?;

    let mut status = Vec::new();
    let written = if survey.is_empty() {
        crate::announce(&mut status, NO_MODELS);
        None
    } else {
        survey.save(&config.report_path)?;
        tracing::debug!(
            "Wrote {} model entries to {}",
            survey.len(),
            config.report_path.display()
        );
        crate::announce(
            &mut status,
            &format!(
                "Modelbins and their materials written to {}",
                config.report_name()
            ),
        );
        Some(config.report_path.clone())
    };

    Ok(SurveyReport {
        models: models.len(),
        survey,
        written,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_order_and_duplicates() {
        let mut survey = MaterialSurvey::new();
        survey.add("b.modelbin", "_library/materials/x.materialbin");
        survey.add("a.modelbin", "_library/materials/y.materialbin");
        survey.add("b.modelbin", "_library/materials/x.materialbin");

        let keys: Vec<_> = survey.entries.keys().cloned().collect();
        assert_eq!(keys, vec!["b.modelbin", "a.modelbin"]);
        assert_eq!(
            survey.materials_for("b.modelbin").unwrap(),
            &[
                "_library/materials/x.materialbin".to_string(),
                "_library/materials/x.materialbin".to_string(),
            ]
        );
    }

    #[test]
    fn test_save_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("materials.json");

        let mut survey = MaterialSurvey::new();
        survey.add("car.modelbin", "_library\\materials\\m.materialbin");
        survey.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"car.modelbin\": [\n    \"_library\\\\materials\\\\m.materialbin\"\n  ]\n}"
        );
    }

    #[test]
    fn test_save_load_preserves_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("materials.json");

        let mut survey = MaterialSurvey::new();
        survey.add("z.modelbin", "_library/materials/1.materialbin");
        survey.add("a.modelbin", "_library/materials/2.materialbin");
        survey.add("a.modelbin", "_library/materials/1.materialbin");
        survey.save(&path).unwrap();

        let loaded = MaterialSurvey::load(&path).unwrap();
        assert_eq!(loaded, survey);
        // IndexMap equality ignores order
        let keys: Vec<_> = loaded.entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z.modelbin", "a.modelbin"]);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("materials.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            MaterialSurvey::load(&path).unwrap_err(),
            Error::Json { .. }
        ));
    }
}
