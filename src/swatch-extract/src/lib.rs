//! swatch-extract - texture and material reference collection for car assets
//!
//! Model descriptors (`.modelbin`) and materials (`.materialbin`) are opaque
//! binary blobs, but they embed logical asset paths as plain text:
//!
//! ```text
//! Game:\Media\cars\_library\materials\paint\carbon.materialbin
//! Game:\Media\cars\_library\textures\paint\carbon_nrm.swatchbin
//! ```
//!
//! This crate scans for those paths and runs two pipelines over them:
//!
//! - [`textures::extract_textures`] follows model → material → swatch
//!   references (plus direct model → swatch references) and copies every
//!   referenced swatch into one flat output directory.
//! - [`survey::survey_materials`] records which materials each model uses and
//!   writes the mapping as a JSON report.
//!
//! [`summary::run_all`] runs both in order, each behind its own error guard.

pub mod config;
pub mod discovery;
pub mod reference;
pub mod summary;
pub mod survey;
pub mod textures;

use std::path::PathBuf;

pub use config::Config;
pub use discovery::{discover, DiscoveredFile};
pub use reference::{
    extract_references, material_relative_path, resolve_material, resolve_swatch, ReferenceKind,
};
pub use summary::{run_all, PipelineOutcome, RunSummary};
pub use survey::{survey_materials, MaterialSurvey, SurveyReport};
pub use textures::{extract_textures, Collision, CopiedFile, CopyMode, TextureReport};

/// Errors from discovery, reading, copying and report writing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to walk {root}: {source}")]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read a descriptor as text, replacing invalid UTF-8 sequences.
///
/// The files are binary; only the embedded ASCII paths matter.
pub(crate) fn read_text(path: &std::path::Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Print a status line to stdout and keep it for the pipeline report.
pub(crate) fn announce(status: &mut Vec<String>, line: &str) {
    println!("{}", line);
    status.push(line.to_string());
}
