//! Embedded asset path extraction
//!
//! Both reference kinds share one pattern shape and differ only by library
//! subfolder and file suffix:
//!
//! `Game:<sep>Media<sep>cars<sep>_library<sep><folder><sep>...<suffix>`
//!
//! where `<sep>` is either `/` or `\`. The span between the folder and the
//! suffix is non-greedy and never crosses a line terminator, so each match
//! ends at the first suffix that follows on the same line.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Marker at the start of every embedded logical path
pub const ROOT_MARKER: &str = "Game:";

static MATERIAL_PATTERN: Lazy<Regex> = Lazy::new(|| build_pattern(ReferenceKind::Material));
static SWATCH_PATTERN: Lazy<Regex> = Lazy::new(|| build_pattern(ReferenceKind::Swatch));

/// Kind of embedded reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `_library/materials/**.materialbin`
    Material,
    /// `_library/textures/**.swatchbin`
    Swatch,
}

impl ReferenceKind {
    /// Subfolder of `_library` holding this kind
    pub fn library_folder(self) -> &'static str {
        match self {
            ReferenceKind::Material => "materials",
            ReferenceKind::Swatch => "textures",
        }
    }

    /// File extension without the dot
    pub fn suffix(self) -> &'static str {
        match self {
            ReferenceKind::Material => "materialbin",
            ReferenceKind::Swatch => "swatchbin",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            ReferenceKind::Material => &MATERIAL_PATTERN,
            ReferenceKind::Swatch => &SWATCH_PATTERN,
        }
    }
}

fn build_pattern(kind: ReferenceKind) -> Regex {
    let sep = r"[/\\]";
    // Name span stops at line terminators: \n, \r, U+2028, U+2029
    let name = r"[^\n\r\x{2028}\x{2029}]+?";
    let pattern = format!(
        r"{marker}{sep}Media{sep}cars{sep}_library{sep}{folder}{sep}{name}\.{suffix}",
        marker = regex::escape(ROOT_MARKER),
        folder = regex::escape(kind.library_folder()),
        suffix = regex::escape(kind.suffix()),
    );
    // Built from escaped literals only
    Regex::new(&pattern).unwrap()
}

/// All references of `kind` in `text`, in order of appearance.
///
/// Repeated occurrences are returned repeatedly.
pub fn extract_references(text: &str, kind: ReferenceKind) -> Vec<&str> {
    kind.pattern().find_iter(text).map(|m| m.as_str()).collect()
}

fn is_sep(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Remainder after `Game:<sep>Media<sep>cars`, starting at the next separator.
fn strip_cars_root(reference: &str) -> Option<&str> {
    let rest = reference.strip_prefix(ROOT_MARKER)?;
    let rest = rest.strip_prefix(is_sep)?.strip_prefix("Media")?;
    rest.strip_prefix(is_sep)?.strip_prefix("cars")
}

/// Push each `/` or `\` separated segment of `relative` onto `base`.
fn join_segments(base: &Path, relative: &str) -> PathBuf {
    relative
        .split(is_sep)
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// Library-relative form of a material reference.
///
/// `Game:\Media\cars\_library\materials\x.materialbin` becomes
/// `_library\materials\x.materialbin`; separators are left as written.
/// Input without the cars root is returned unchanged.
pub fn material_relative_path(reference: &str) -> &str {
    strip_cars_root(reference)
        .and_then(|rest| rest.strip_prefix(is_sep))
        .unwrap_or(reference)
}

/// On-disk location of a material reference under `parent_dir`
pub fn resolve_material(parent_dir: &Path, reference: &str) -> PathBuf {
    join_segments(parent_dir, material_relative_path(reference))
}

/// On-disk location of a swatch reference: the cars root is replaced by
/// `parent_dir`.
pub fn resolve_swatch(parent_dir: &Path, reference: &str) -> PathBuf {
    join_segments(parent_dir, strip_cars_root(reference).unwrap_or(reference))
}
