//! EPUB metadata extraction
//!
//! Two extractors live behind [`MetadataExtractor`]:
//! - `direct`: reads `container.xml` and the package descriptor straight
//!   out of the zip, with an author-page fallback
//! - `legacy`: the simpler path built on the `epub` crate

mod author_page;
mod legacy;
mod opf;

pub use legacy::LegacyExtractor;
pub use opf::DirectExtractor;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error;

/// Title and authors found in an EPUB
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    /// Unique, in the order they were found
    pub authors: Vec<String>,
}

impl Metadata {
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}

/// Trait for metadata extractors
pub trait MetadataExtractor {
    /// Read title and authors from the container at `path`
    fn extract(&self, path: &Path) -> error::Result<Metadata>;

    /// Get the extractor name for display
    fn name(&self) -> &'static str;
}

/// Supported extractor types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    #[default]
    Direct,
    Legacy,
}

impl ExtractorKind {
    /// Parse extractor kind from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "legacy" => Ok(Self::Legacy),
            _ => bail!("Unknown extractor: {}", s),
        }
    }
}

/// Create an extractor instance
pub fn get_extractor(kind: ExtractorKind) -> Box<dyn MetadataExtractor> {
    match kind {
        ExtractorKind::Direct => Box::new(DirectExtractor),
        ExtractorKind::Legacy => Box::new(LegacyExtractor),
    }
}

/// Drop repeated entries, keeping the first occurrence
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders for small EPUB archives used across tests

    use std::io::Write;
    use std::path::{Path, PathBuf};
    use zip::write::SimpleFileOptions;

    pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

    /// Wrap `<metadata>` children into a package descriptor
    pub fn opf(metadata_children: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="id">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    {metadata_children}
  </metadata>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine>
    <itemref idref="ch1"/>
  </spine>
</package>"#
        )
    }

    /// Write a zip at `dir/name` holding the given `(path, contents)` entries
    pub fn write_archive(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (entry, contents) in entries {
            writer.start_file(*entry, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    /// Write a minimal EPUB whose descriptor carries `metadata_children`
    pub fn write_epub(dir: &Path, name: &str, metadata_children: &str) -> PathBuf {
        let opf = opf(metadata_children);
        write_archive(
            dir,
            name,
            &[
                ("mimetype", "application/epub+zip"),
                ("META-INF/container.xml", CONTAINER_XML),
                ("OEBPS/content.opf", &opf),
                (
                    "OEBPS/ch1.xhtml",
                    "<html xmlns=\"http://www.w3.org/1999/xhtml\"><body><p>Hi</p></body></html>",
                ),
            ],
        )
    }
}
