//! CLI argument definitions for swatch-extract

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "swatch-extract")]
#[command(about = "Collect swatchbin textures referenced by modelbin files and survey their materials")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory the tool lives in (default: the executable's directory)
    ///
    /// Material and swatch references resolve against its parent; output goes
    /// to <tool-dir>/ExtractedTextures and loose swatches are read from
    /// <tool-dir>/textures.
    #[arg(long, global = true)]
    pub tool_dir: Option<PathBuf>,

    /// List the swatches that would be copied without copying (dry run)
    #[arg(short, long, global = true)]
    pub list: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run texture extraction, then the material survey (default)
    All,
    /// Copy every referenced swatchbin into ExtractedTextures
    Textures,
    /// Write the model → materials mapping to materials.json
    Materials,
}
