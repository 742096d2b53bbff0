// Author lookup in a rendered author page
//
// Some publishers leave the creator tags empty and print the authors on a
// credits page instead: a bold "Author" label followed by one paragraph
// per name, ending at the next span.

use roxmltree::Node;

use super::opf::parse_xml;

const AUTHOR_LABELS: &[&str] = &["Author", "Authors"];

/// Scan an XHTML author page for the names listed under the author label
pub(super) fn find_authors(html: &str) -> Result<Vec<String>, roxmltree::Error> {
    let doc = parse_xml(html)?;
    let mut authors = Vec::new();
    let mut in_author_section = false;

    // descendants() walks depth-first, pre-order, in document order
    for node in doc.root_element().descendants().filter(Node::is_element) {
        if !in_author_section {
            in_author_section = is_author_label(node);
            continue;
        }

        match node.tag_name().name() {
            "span" => break,
            "p" => {
                let text = node
                    .first_child()
                    .filter(Node::is_text)
                    .and_then(|t| t.text())
                    .map(str::trim);
                if let Some(text) = text.filter(|t| !t.is_empty()) {
                    authors.push(text.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(authors)
}

/// A bold element whose only child is the text "Author" or "Authors"
fn is_author_label(node: Node) -> bool {
    if !matches!(node.tag_name().name(), "strong" | "b") {
        return false;
    }

    let mut children = node.children();
    match (children.next(), children.next()) {
        (Some(only), None) => only
            .text()
            .filter(|_| only.is_text())
            .is_some_and(|text| AUTHOR_LABELS.contains(&text)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <html xmlns=\"http://www.w3.org/1999/xhtml\"><head><title>Credits</title></head>\
             <body>{}</body></html>",
            body
        )
    }

    #[test]
    fn test_single_author_until_span() {
        let html = page("<strong>Author</strong><p>Jane Doe</p><span>...</span><p>Late Entry</p>");
        assert_eq!(find_authors(&html).unwrap(), vec!["Jane Doe"]);
    }

    #[test]
    fn test_multiple_authors() {
        let html = page(
            "<div><p><strong>Authors</strong></p><p> Jane Doe </p><p>John Roe</p></div>\
             <div><span>Technical Editor</span><p>Someone Else</p></div>",
        );
        assert_eq!(find_authors(&html).unwrap(), vec!["Jane Doe", "John Roe"]);
    }

    #[test]
    fn test_bold_label() {
        let html = page("<b>Author</b><p>Jane Doe</p>");
        assert_eq!(find_authors(&html).unwrap(), vec!["Jane Doe"]);
    }

    #[test]
    fn test_paragraphs_before_label_ignored() {
        let html = page("<p>Cover Designer</p><strong>Author</strong><p>Jane Doe</p>");
        assert_eq!(find_authors(&html).unwrap(), vec!["Jane Doe"]);
    }

    #[test]
    fn test_label_must_be_sole_text_child() {
        let html = page("<strong>Author:</strong><p>Jane Doe</p>");
        assert!(find_authors(&html).unwrap().is_empty());

        let html = page("<strong>Author<em>s</em></strong><p>Jane Doe</p>");
        assert!(find_authors(&html).unwrap().is_empty());
    }

    #[test]
    fn test_paragraph_starting_with_element_skipped() {
        let html = page(
            "<strong>Author</strong><p><a href=\"#\">Linked</a></p><p>   </p><p>Jane Doe</p>",
        );
        assert_eq!(find_authors(&html).unwrap(), vec!["Jane Doe"]);
    }

    #[test]
    fn test_no_label() {
        let html = page("<p>Jane Doe</p><span>x</span>");
        assert!(find_authors(&html).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_page_is_error() {
        assert!(find_authors("<html><body><p>unclosed").is_err());
    }
}
