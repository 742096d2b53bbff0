// Legacy extraction through the epub crate

use epub::doc::EpubDoc;
use std::fs::File;
use std::path::Path;

use super::{Metadata, MetadataExtractor};
use crate::error::{ExtractError, Result};

/// Takes the first title and the first creator the `epub` crate reports.
/// No author-page fallback.
pub struct LegacyExtractor;

impl MetadataExtractor for LegacyExtractor {
    fn extract(&self, path: &Path) -> Result<Metadata> {
        let file = File::open(path)?;
        if zip::ZipArchive::new(file).is_err() {
            return Err(ExtractError::NotAContainer {
                path: path.to_path_buf(),
            });
        }

        let doc = EpubDoc::new(path).map_err(|e| ExtractError::unavailable(path, e.to_string()))?;

        let title = doc
            .mdata("title")
            .map(|m| m.value.trim().to_string())
            .filter(|t| !t.is_empty());
        let authors = doc
            .mdata("creator")
            .map(|m| m.value.trim().to_string())
            .filter(|a| !a.is_empty())
            .into_iter()
            .collect();

        Ok(Metadata { title, authors })
    }

    fn name(&self) -> &'static str {
        "legacy"
    }
}
