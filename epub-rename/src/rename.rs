//! Candidate discovery and in-place renaming

use anyhow::{Context, Result};
use log::{debug, error, info};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ExtractError;
use crate::filename;
use crate::metadata::MetadataExtractor;

/// Settings for a rename run
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Extension of candidate files, without the dot
    pub extension: String,
    /// Stop words to drop from titles, `None` leaves titles untouched
    pub stopwords: Option<Vec<String>>,
    /// Compute destinations without touching the filesystem
    pub dry_run: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            extension: "epub".to_string(),
            stopwords: None,
            dry_run: false,
        }
    }
}

/// Why a file was left alone
#[derive(Debug)]
pub enum SkipReason {
    Extract(ExtractError),
    MissingTitle,
    AlreadyNamed,
    DestinationExists(PathBuf),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract(e) => write!(f, "{}", e),
            Self::MissingTitle => write!(f, "no title in metadata"),
            Self::AlreadyNamed => write!(f, "already named"),
            Self::DestinationExists(path) => write!(f, "{} already exists", path.display()),
        }
    }
}

#[derive(Debug)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    Skipped(SkipReason),
}

/// Counts for a finished run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub renamed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Find all candidate files under `dir`, recursively, in sorted order.
///
/// Symlinks are not followed. Entries that cannot be read are skipped.
pub fn find_epub_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    files
}

/// Check if a path ends in `extension` (case-insensitive)
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Rename a single file from its metadata
pub fn process_file(
    extractor: &dyn MetadataExtractor,
    file_path: &Path,
    options: &RenameOptions,
) -> Result<RenameOutcome> {
    let metadata = match extractor.extract(file_path) {
        Ok(metadata) => metadata,
        Err(e) => return Ok(RenameOutcome::Skipped(SkipReason::Extract(e))),
    };

    let Some(title) = metadata.title.as_deref() else {
        return Ok(RenameOutcome::Skipped(SkipReason::MissingTitle));
    };
    let Some(author) = metadata.first_author() else {
        return Ok(RenameOutcome::Skipped(SkipReason::Extract(ExtractError::NoAuthor {
            path: file_path.to_path_buf(),
        })));
    };

    let title = match &options.stopwords {
        Some(stopwords) => filename::strip_stopwords(title, stopwords),
        None => title.to_string(),
    };

    let extension = file_path
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or(&options.extension);
    let new_filename = filename::sanitize(&title, author, extension);

    let current_filename = file_path.file_name().and_then(OsStr::to_str);
    if current_filename == Some(new_filename.as_str()) {
        return Ok(RenameOutcome::Skipped(SkipReason::AlreadyNamed));
    }

    let parent = file_path.parent().unwrap_or(Path::new("."));
    let new_path = parent.join(&new_filename);

    if new_path.exists() {
        return Ok(RenameOutcome::Skipped(SkipReason::DestinationExists(new_path)));
    }

    if !options.dry_run {
        std::fs::rename(file_path, &new_path).context("Failed to rename file")?;
    }

    Ok(RenameOutcome::Renamed {
        from: file_path.to_path_buf(),
        to: new_path,
    })
}

/// Rename every candidate under `dir`. Per-file failures never stop the run.
pub fn run(
    dir: &Path,
    extractor: &dyn MetadataExtractor,
    options: &RenameOptions,
) -> Result<BatchSummary> {
    let files = find_epub_files(dir, &options.extension);
    info!(
        "Found {} .{} file(s) in {} (extractor: {})",
        files.len(),
        options.extension,
        dir.display(),
        extractor.name()
    );

    let mut summary = BatchSummary::default();

    for file_path in &files {
        let original_name = display_name(file_path);

        match process_file(extractor, file_path, options) {
            Ok(RenameOutcome::Renamed { from, to }) => {
                println!("\"{}\" ==> \"{}\"", display_name(&from), display_name(&to));
                summary.renamed += 1;
            }
            Ok(RenameOutcome::Skipped(reason)) => {
                debug!("Skipping \"{}\": {}", original_name, reason);
                summary.skipped += 1;
            }
            Err(e) => {
                error!("Error processing \"{}\": {:#}", original_name, e);
                summary.errors += 1;
            }
        }
    }

    Ok(summary)
}

fn display_name(path: &Path) -> &str {
    path.file_name().and_then(OsStr::to_str).unwrap_or("unknown")
}
