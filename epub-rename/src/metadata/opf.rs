// Direct extraction from the zip container and its package descriptor

use log::debug;
use roxmltree::{Document, Node, ParsingOptions};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;
use zip::result::{ZipError, ZipResult};

use super::{Metadata, MetadataExtractor, author_page, dedup_preserving_order};
use crate::error::{ExtractError, Result};

/// Pointer file giving the location of the package descriptor
const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Rendered author page some publishers ship instead of creator tags
const AUTHOR_PAGE_PATH: &str = "OEBPS/pr02.html";

/// Reads metadata straight out of the archive
pub struct DirectExtractor;

impl MetadataExtractor for DirectExtractor {
    fn extract(&self, path: &Path) -> Result<Metadata> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| {
            debug!("{} is not a zip archive: {}", path.display(), e);
            ExtractError::NotAContainer {
                path: path.to_path_buf(),
            }
        })?;

        let container = read_entry(&mut archive, CONTAINER_PATH)
            .map_err(|e| ExtractError::unavailable(path, e.to_string()))?
            .ok_or_else(|| ExtractError::unavailable(path, format!("missing {}", CONTAINER_PATH)))?;
        let opf_path = rootfile_path(&container)
            .map_err(|reason| ExtractError::unavailable(path, reason))?;

        let opf = read_entry(&mut archive, &opf_path)
            .map_err(|e| ExtractError::unavailable(path, e.to_string()))?
            .ok_or_else(|| ExtractError::unavailable(path, format!("missing {}", opf_path)))?;
        let opf_doc = parse_xml(&opf)
            .map_err(|e| ExtractError::unavailable(path, format!("{}: {}", opf_path, e)))?;

        let title = discover_title(&opf_doc);
        let mut authors = discover_creators(&opf_doc);

        if authors.is_empty() {
            authors = match read_entry(&mut archive, AUTHOR_PAGE_PATH) {
                Ok(Some(html)) => author_page::find_authors(&html).unwrap_or_else(|e| {
                    debug!("Ignoring unparsable {} in {}: {}", AUTHOR_PAGE_PATH, path.display(), e);
                    Vec::new()
                }),
                Ok(None) => Vec::new(),
                Err(e) => {
                    debug!("Cannot read {} in {}: {}", AUTHOR_PAGE_PATH, path.display(), e);
                    Vec::new()
                }
            };
        }

        Ok(Metadata {
            title,
            authors: dedup_preserving_order(authors),
        })
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Read a text entry, `None` when the archive has no such entry
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> ZipResult<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut content = Vec::new();
    entry.read_to_end(&mut content)?;
    let text = String::from_utf8_lossy(&content);
    Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
}

pub(super) fn parse_xml(text: &str) -> std::result::Result<Document<'_>, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options)
}

/// Locate the package descriptor named by the first `rootfile` element
fn rootfile_path(container: &str) -> std::result::Result<String, String> {
    let doc = parse_xml(container).map_err(|e| format!("{}: {}", CONTAINER_PATH, e))?;
    let rootfile = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "rootfile")
        .ok_or_else(|| format!("no rootfile element in {}", CONTAINER_PATH))?;
    rootfile
        .attribute("full-path")
        .map(str::to_string)
        .ok_or_else(|| format!("rootfile in {} has no full-path", CONTAINER_PATH))
}

/// Element name exactly as written in the source, prefix included
fn qualified_name<'a>(doc: &'a Document, node: Node) -> &'a str {
    let raw = &doc.input_text()[node.range()];
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    let end = raw
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(raw.len());
    &raw[..end]
}

fn elements_named<'a, 'input>(
    doc: &'a Document<'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    doc.descendants()
        .filter(move |n| n.is_element() && qualified_name(doc, *n) == name)
}

/// Trimmed text of an element whose first child is a text node
fn leading_text(node: Node) -> Option<String> {
    let text = node.first_child().filter(Node::is_text)?.text()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn first_text(doc: &Document, name: &str) -> Option<String> {
    elements_named(doc, name).next().and_then(leading_text)
}

fn all_texts(doc: &Document, name: &str) -> Vec<String> {
    elements_named(doc, name).filter_map(leading_text).collect()
}

fn discover_title(doc: &Document) -> Option<String> {
    first_text(doc, "title").or_else(|| first_text(doc, "dc:title"))
}

/// Bare `creator` tags, or `dc:creator` only when there are none
fn discover_creators(doc: &Document) -> Vec<String> {
    let creators = all_texts(doc, "creator");
    if creators.is_empty() {
        all_texts(doc, "dc:creator")
    } else {
        creators
    }
}
