//! Output targets
//!
//! A rendered form either replaces a file, goes to stdout, or is inserted
//! between two marker lines of an existing file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{FormError, OutputError};

/// Marker comment looked for in insert mode unless configured otherwise
pub const DEFAULT_TAG: &str = "<!-- j2f -->";

/// Where a rendered form goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    /// Replace the whole file
    Overwrite(PathBuf),
    /// Replace the block between the first two lines containing `tag`
    Insert { path: PathBuf, tag: String },
}

impl OutputTarget {
    /// Build a target from CLI-style arguments; `-` means stdout
    pub fn from_args(out: &Path, insert: bool, tag: &str) -> Self {
        if insert {
            Self::Insert {
                path: out.to_path_buf(),
                tag: tag.to_string(),
            }
        } else if out == Path::new("-") {
            Self::Stdout
        } else {
            Self::Overwrite(out.to_path_buf())
        }
    }

    /// Write `fragment`. In insert mode the file is left untouched unless both
    /// markers are found.
    pub fn write(&self, fragment: &str) -> Result<(), FormError> {
        match self {
            Self::Stdout => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", fragment).map_err(|e| FormError::io("<stdout>", e))
            }
            Self::Overwrite(path) => {
                fs::write(path, fragment).map_err(|e| FormError::io(path, e))?;
                tracing::info!(path = %path.display(), bytes = fragment.len(), "wrote form");
                Ok(())
            }
            Self::Insert { path, tag } => {
                let existing = fs::read_to_string(path).map_err(|e| FormError::io(path, e))?;
                let updated = insert_between_markers(&existing, tag, fragment)?;
                fs::write(path, updated).map_err(|e| FormError::io(path, e))?;
                tracing::info!(path = %path.display(), tag = %tag, "inserted form");
                Ok(())
            }
        }
    }
}

/// Replace the lines between the first two lines containing `tag`.
///
/// Everything up to and including the first marker line is kept, then the
/// fragment followed by a newline, then everything from the second marker
/// line onward.
pub fn insert_between_markers(existing: &str, tag: &str, fragment: &str) -> Result<String, OutputError> {
    let lines: Vec<&str> = existing.split_inclusive('\n').collect();

    let mut markers = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(tag))
        .map(|(i, _)| i);
    let start = markers
        .next()
        .ok_or_else(|| OutputError::MissingStartTag { tag: tag.to_string() })?;
    let end = markers
        .next()
        .ok_or_else(|| OutputError::MissingEndTag { tag: tag.to_string() })?;

    let mut out = String::with_capacity(existing.len() + fragment.len() + 1);
    for line in &lines[..=start] {
        out.push_str(line);
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(fragment);
    out.push('\n');
    for line in &lines[end..] {
        out.push_str(line);
    }
    Ok(out)
}
