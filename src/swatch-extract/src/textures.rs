//! Texture extraction pipeline
//!
//! Resolves every swatch referenced by the model descriptors, either through
//! their materials or directly, and copies them into one flat directory
//! together with any loose swatches from the textures directory.
//!
//! Copies are named by file name only. Two different sources with the same
//! file name overwrite each other and the later copy wins; such cases are
//! recorded in [`TextureReport::collisions`].

use crate::config::Config;
use crate::discovery::{discover, DiscoveredFile};
use crate::reference::{extract_references, resolve_material, resolve_swatch, ReferenceKind};
use crate::{read_text, Error, Result};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const NO_RESOLVED_SWATCHES: &str = "No unique swatchbin filenames found in materialbin files.";
pub const NO_LOOSE_SWATCHES: &str = "No swatchbin files found in textures directory.";
pub const FINISHED: &str = "Finished";

/// Whether files are actually copied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    #[default]
    Copy,
    /// Print what would be copied and leave the output directory alone
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A destination written by more than one distinct source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub destination: PathBuf,
    /// Source whose copy was overwritten
    pub overwritten: PathBuf,
    /// Source that now occupies the destination
    pub winner: PathBuf,
}

/// Outcome of a texture extraction run
///
/// In [`CopyMode::List`] the copy lists hold the copies that would have been
/// made.
#[derive(Debug, Clone, Default)]
pub struct TextureReport {
    /// Model descriptors scanned
    pub models: usize,
    /// Unique material files, each read once, in first-seen order
    pub materials: Vec<PathBuf>,
    /// Unique swatch files resolved from materials and models
    pub swatches: Vec<PathBuf>,
    /// Copies of resolved swatches
    pub copied: Vec<CopiedFile>,
    /// Copies of loose swatches from the textures directory
    pub loose_copied: Vec<CopiedFile>,
    pub collisions: Vec<Collision>,
    /// Status lines printed to stdout, in order
    pub status: Vec<String>,
}

impl TextureReport {
    pub fn total_copied(&self) -> usize {
        self.copied.len() + self.loose_copied.len()
    }
}

/// Run the texture extraction pipeline.
///
/// Stops at the first read, copy or discovery failure; files copied before
/// that point stay in the output directory.
pub fn extract_textures(config: &Config, mode: CopyMode) -> Result<TextureReport> {
    tracing::info!("Extracting textures into {}", config.output_dir.display());

    let models = discover(&config.work_dir, &config.model_pattern)?;
    let materials = collect_materials(&models, &config.parent_dir)?;

    let mut swatches = IndexSet::new();
    for material in &materials {
        let text = read_text(material)?;
        collect_swatches(&text, &config.parent_dir, &mut swatches);
    }
    for model in &models {
        let text = read_text(&model.path)?;
        collect_swatches(&text, &config.parent_dir, &mut swatches);
    }

    tracing::info!(
        "{} models, {} unique materials, {} unique swatches",
        models.len(),
        materials.len(),
        swatches.len()
    );

    let mut copier = Copier::new(&config.output_dir, mode);

    let mut status = Vec::new();
    let mut copied = Vec::with_capacity(swatches.len());
    if swatches.is_empty() {
        crate::announce(&mut status, NO_RESOLVED_SWATCHES);
    } else {
        copier.ensure_output_dir()?;
        for swatch in &swatches {
            copied.push(copier.copy(swatch)?);
        }
    }

    let loose = discover(&config.textures_dir, &config.swatch_pattern)?;
    let mut loose_copied = Vec::with_capacity(loose.len());
    if loose.is_empty() {
        crate::announce(&mut status, NO_LOOSE_SWATCHES);
    } else {
        copier.ensure_output_dir()?;
        for texture in &loose {
            loose_copied.push(copier.copy(&texture.path)?);
        }
        crate::announce(&mut status, FINISHED);
    }

    Ok(TextureReport {
        models: models.len(),
        materials: materials.into_iter().collect(),
        swatches: swatches.into_iter().collect(),
        copied,
        loose_copied,
        collisions: copier.collisions,
        status,
    })
}

/// Unique material files referenced by `models`, in first-seen order
fn collect_materials(models: &[DiscoveredFile], parent_dir: &Path) -> Result<IndexSet<PathBuf>> {
    let mut materials = IndexSet::new();

    for model in models {
        let text = read_text(&model.path)?;
        for reference in extract_references(&text, ReferenceKind::Material) {
            materials.insert(resolve_material(parent_dir, reference));
        }
    }

    Ok(materials)
}

fn collect_swatches(text: &str, parent_dir: &Path, swatches: &mut IndexSet<PathBuf>) {
    for reference in extract_references(text, ReferenceKind::Swatch) {
        swatches.insert(resolve_swatch(parent_dir, reference));
    }
}

/// Copies files into a flat directory by file name, tracking overwrites
struct Copier<'a> {
    output_dir: &'a Path,
    mode: CopyMode,
    written: HashMap<PathBuf, PathBuf>,
    collisions: Vec<Collision>,
}

impl<'a> Copier<'a> {
    fn new(output_dir: &'a Path, mode: CopyMode) -> Self {
        Self {
            output_dir,
            mode,
            written: HashMap::new(),
            collisions: Vec::new(),
        }
    }

    fn ensure_output_dir(&self) -> Result<()> {
        if self.mode == CopyMode::List {
            return Ok(());
        }
        fs::create_dir_all(self.output_dir).map_err(|source| Error::CreateDir {
            path: self.output_dir.to_path_buf(),
            source,
        })
    }

    fn copy(&mut self, source: &Path) -> Result<CopiedFile> {
        let destination = match source.file_name() {
            Some(name) => self.output_dir.join(name),
            None => {
                return Err(Error::Copy {
                    from: source.to_path_buf(),
                    to: self.output_dir.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "source has no file name",
                    ),
                })
            }
        };

        match self.mode {
            CopyMode::Copy => {
                fs::copy(source, &destination).map_err(|e| Error::Copy {
                    from: source.to_path_buf(),
                    to: destination.clone(),
                    source: e,
                })?;
                tracing::debug!("Copied {} -> {}", source.display(), destination.display());
            }
            CopyMode::List => println!("  {}", source.display()),
        }

        if let Some(previous) = self
            .written
            .insert(destination.clone(), source.to_path_buf())
        {
            if previous.as_path() != source {
                tracing::debug!(
                    "{} overwritten: {} replaced {}",
                    destination.display(),
                    source.display(),
                    previous.display()
                );
                self.collisions.push(Collision {
                    destination: destination.clone(),
                    overwritten: previous,
                    winner: source.to_path_buf(),
                });
            }
        }

        Ok(CopiedFile {
            source: source.to_path_buf(),
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collect_swatches_dedups() {
        let text = "Game:\\Media\\cars\\_library\\textures\\a.swatchbin \
                    Game:/Media/cars/_library/textures/a.swatchbin \
                    Game:\\Media\\cars\\_library\\textures\\b.swatchbin";
        let mut swatches = IndexSet::new();
        collect_swatches(text, Path::new("/p"), &mut swatches);

        let swatches: Vec<_> = swatches.into_iter().collect();
        assert_eq!(
            swatches,
            vec![
                PathBuf::from("/p/_library/textures/a.swatchbin"),
                PathBuf::from("/p/_library/textures/b.swatchbin"),
            ]
        );
    }

    #[test]
    fn test_copier_records_collision() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let first = root.join("a/tex.swatchbin");
        let second = root.join("b/tex.swatchbin");
        write(&first, b"first");
        write(&second, b"second");

        let out = root.join("out");
        let mut copier = Copier::new(&out, CopyMode::Copy);
        copier.ensure_output_dir().unwrap();
        copier.copy(&first).unwrap();
        copier.copy(&second).unwrap();
        // Same source again is not a collision
        copier.copy(&second).unwrap();

        assert_eq!(fs::read(out.join("tex.swatchbin")).unwrap(), b"second");
        assert_eq!(
            copier.collisions,
            vec![Collision {
                destination: out.join("tex.swatchbin"),
                overwritten: first,
                winner: second,
            }]
        );
    }

    #[test]
    fn test_copier_list_mode_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("tex.swatchbin");
        write(&source, b"data");

        let out = temp_dir.path().join("out");
        let mut copier = Copier::new(&out, CopyMode::List);
        copier.ensure_output_dir().unwrap();
        let copied = copier.copy(&source).unwrap();

        assert_eq!(copied.destination, out.join("tex.swatchbin"));
        assert!(!out.exists());
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let mut copier = Copier::new(&out, CopyMode::Copy);
        copier.ensure_output_dir().unwrap();

        let err = copier.copy(&temp_dir.path().join("missing.swatchbin")).unwrap_err();
        assert!(matches!(err, Error::Copy { .. }));
    }
}
