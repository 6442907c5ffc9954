//! Path configuration for both pipelines
//!
//! The tool expects to live one level below the directory that the
//! `Game:\Media\cars` logical root maps to:
//!
//! ```text
//! <parent>/
//!   _library/materials/...      material files
//!   _library/textures/...       swatch files
//!   <tool>/
//!     swatch-extract            executable
//!     textures/                 loose swatches, copied as-is
//!     ExtractedTextures/        output
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name of the flat output directory, created next to the tool.
pub const OUTPUT_DIR_NAME: &str = "ExtractedTextures";

/// Name of the loose textures directory next to the tool.
pub const TEXTURES_DIR_NAME: &str = "textures";

/// File name of the material survey report, written to the working directory.
pub const REPORT_FILE_NAME: &str = "materials.json";

/// Glob for model descriptors, relative to the working directory.
pub const MODEL_PATTERN: &str = "**/*.modelbin";

/// Glob for swatch files, relative to the textures directory.
pub const SWATCH_PATTERN: &str = "**/*.swatchbin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root scanned for model descriptors; report keys are relative to it
    pub work_dir: PathBuf,
    /// Directory the `Game:\Media\cars` prefix resolves to
    pub parent_dir: PathBuf,
    /// Flat directory receiving every copied swatch
    pub output_dir: PathBuf,
    /// Directory of loose swatches copied alongside the resolved ones
    pub textures_dir: PathBuf,
    /// Material survey JSON destination
    pub report_path: PathBuf,
    pub model_pattern: String,
    pub swatch_pattern: String,
}

impl Config {
    /// Build the standard layout around a tool directory.
    pub fn for_tool_dir(tool_dir: &Path, work_dir: &Path) -> Self {
        Config {
            work_dir: work_dir.to_path_buf(),
            parent_dir: tool_dir.join(".."),
            output_dir: tool_dir.join(OUTPUT_DIR_NAME),
            textures_dir: tool_dir.join(TEXTURES_DIR_NAME),
            report_path: work_dir.join(REPORT_FILE_NAME),
            model_pattern: MODEL_PATTERN.to_string(),
            swatch_pattern: SWATCH_PATTERN.to_string(),
        }
    }

    /// Resolve the layout from the running executable and the current directory.
    ///
    /// `tool_dir` overrides the executable's directory when given.
    pub fn detect(tool_dir: Option<&Path>) -> Result<Self> {
        let work_dir = std::env::current_dir().context("Failed to get current directory")?;

        let tool_dir = match tool_dir {
            Some(dir) => dir.to_path_buf(),
            None => {
                let exe = std::env::current_exe().context("Failed to get current executable path")?;
                exe.parent()
                    .context("Executable path has no parent directory")?
                    .to_path_buf()
            }
        };

        Ok(Self::for_tool_dir(&tool_dir, &work_dir))
    }

    /// Report file name for console messages
    pub fn report_name(&self) -> String {
        self.report_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| REPORT_FILE_NAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_tool_dir_layout() {
        let config = Config::for_tool_dir(Path::new("/game/cars/tool"), Path::new("/work"));

        assert_eq!(config.work_dir, PathBuf::from("/work"));
        assert_eq!(config.parent_dir, PathBuf::from("/game/cars/tool/.."));
        assert_eq!(
            config.output_dir,
            PathBuf::from("/game/cars/tool/ExtractedTextures")
        );
        assert_eq!(config.textures_dir, PathBuf::from("/game/cars/tool/textures"));
        assert_eq!(config.report_path, PathBuf::from("/work/materials.json"));
        assert_eq!(config.model_pattern, "**/*.modelbin");
        assert_eq!(config.swatch_pattern, "**/*.swatchbin");
    }

    #[test]
    fn test_detect_with_override() {
        let config = Config::detect(Some(Path::new("/opt/tool"))).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/opt/tool/ExtractedTextures"));
        assert_eq!(config.report_path, std::env::current_dir().unwrap().join("materials.json"));
    }

    #[test]
    fn test_report_name() {
        let mut config = Config::for_tool_dir(Path::new("/t"), Path::new("/w"));
        assert_eq!(config.report_name(), "materials.json");

        config.report_path = PathBuf::from("/w/out/survey.json");
        assert_eq!(config.report_name(), "survey.json");
    }
}
