//! Individual label-matching strategies
//!
//! Each strategy looks for the value of one label in a parsed page and reports
//! a match, no match, or a document shape it could not work with.

use regex::RegexBuilder;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Inline elements that carry a field caption
const LABEL_SELECTOR: &str = "span, label";

/// Elements that carry a field value when it is not the caption's sibling
const PARAGRAPH_SELECTOR: &str = "p";

/// Elements whose text is source code or inert markup, not page text
const NON_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// The document did not have the shape a strategy needs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed document: {0}")]
pub struct Malformed(pub String);

/// `Ok(Some(_))` on a match, `Ok(None)` when nothing matched
pub type StrategyResult = Result<Option<String>, Malformed>;

/// One step of the fallback chain
#[derive(Clone, Copy)]
pub struct Strategy {
    /// Name used in logs
    pub name: &'static str,
    /// Looks up `label` in the document
    pub run: fn(&Html, &str) -> StrategyResult,
}

/// Exact caption element, then its next sibling element
pub const EXACT_SIBLING: Strategy = Strategy {
    name: "exact_sibling",
    run: exact_sibling,
};

/// Exact caption element, then the first paragraph under its parent
pub const LABEL_PARENT_PARAGRAPH: Strategy = Strategy {
    name: "label_parent_paragraph",
    run: label_parent_paragraph,
};

/// First text node containing the label, then the first paragraph under its parent
pub const SUBSTRING_PARENT_PARAGRAPH: Strategy = Strategy {
    name: "substring_parent_paragraph",
    run: substring_parent_paragraph,
};

/// Case-insensitive pattern over the whole page flattened to text
pub const FLATTENED_TEXT: Strategy = Strategy {
    name: "flattened_text",
    run: flattened_text,
};

/// Text content of an element, each text node trimmed, joined without separator
pub fn stripped_text(element: &ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Every visible text node of the document, one per line
///
/// Text inside `script`, `style`, `noscript` and `template` is left out.
pub fn flatten(document: &Html) -> String {
    document
        .tree
        .root()
        .descendants()
        .filter(|node| {
            node.ancestors()
                .find_map(ElementRef::wrap)
                .map_or(true, |el| !NON_TEXT_ELEMENTS.contains(&el.value().name()))
        })
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect::<Vec<&str>>()
        .join("\n")
}

fn selector(css: &str) -> Result<Selector, Malformed> {
    Selector::parse(css).map_err(|e| Malformed(format!("selector {css:?}: {e:?}")))
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First `span`/`label` whose stripped text equals `label` exactly
fn find_label_element<'a>(
    document: &'a Html,
    label: &str,
) -> Result<Option<ElementRef<'a>>, Malformed> {
    let captions = selector(LABEL_SELECTOR)?;
    Ok(document
        .select(&captions)
        .find(|el| stripped_text(el) == label))
}

/// First paragraph below `scope` with non-empty text
fn first_paragraph_text(scope: &ElementRef<'_>) -> StrategyResult {
    let paragraphs = selector(PARAGRAPH_SELECTOR)?;
    Ok(scope
        .select(&paragraphs)
        .map(|p| stripped_text(&p))
        .find(|text| !text.is_empty()))
}

fn exact_sibling(document: &Html, label: &str) -> StrategyResult {
    let Some(caption) = find_label_element(document, label)? else {
        return Ok(None);
    };

    Ok(caption
        .next_siblings()
        .find_map(ElementRef::wrap)
        .map(|sibling| stripped_text(&sibling))
        .and_then(non_empty))
}

fn label_parent_paragraph(document: &Html, label: &str) -> StrategyResult {
    let Some(caption) = find_label_element(document, label)? else {
        return Ok(None);
    };

    let parent = caption
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or_else(|| Malformed(format!("caption {label:?} has no parent element")))?;
    first_paragraph_text(&parent)
}

fn substring_parent_paragraph(document: &Html, label: &str) -> StrategyResult {
    let text_node = document.tree.root().descendants().find(|node| {
        node.value()
            .as_text()
            .is_some_and(|text| text.contains(label))
    });
    let Some(text_node) = text_node else {
        return Ok(None);
    };

    let parent = text_node
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or_else(|| Malformed(format!("text containing {label:?} has no parent element")))?;
    first_paragraph_text(&parent)
}

fn flattened_text(document: &Html, label: &str) -> StrategyResult {
    let pattern = format!(r"{}[:\s\-]*([^\n]{{2,200}})", regex::escape(label));
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Malformed(format!("pattern for {label:?}: {e}")))?;

    let text = flatten(document);
    Ok(re
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .and_then(non_empty))
}
