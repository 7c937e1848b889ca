//! Label extraction from record pages
//!
//! Record pages are not annotated and their markup differs between record
//! types, so a label's value is looked up through an ordered list of
//! strategies. The first strategy that produces a non-empty value wins; a
//! strategy that trips over the document shape is logged and skipped.

pub mod strategies;

pub use strategies::{Malformed, Strategy, StrategyResult};

use scraper::Html;
use tracing::debug;

use crate::data::FieldMap;
use strategies::{EXACT_SIBLING, FLATTENED_TEXT, LABEL_PARENT_PARAGRAPH, SUBSTRING_PARENT_PARAGRAPH};

/// Strategies in priority order, most precise first
pub const STRATEGIES: [Strategy; 4] = [
    EXACT_SIBLING,
    LABEL_PARENT_PARAGRAPH,
    SUBSTRING_PARENT_PARAGRAPH,
    FLATTENED_TEXT,
];

/// Finds the value for `label` using the default strategy order
///
/// Never fails: returns `None` when no strategy yields a non-empty value.
pub fn extract_by_label(document: &Html, label: &str) -> Option<String> {
    extract_with(&STRATEGIES, document, label)
}

/// Finds the value for `label` trying `strategies` in order
pub fn extract_with(strategies: &[Strategy], document: &Html, label: &str) -> Option<String> {
    for strategy in strategies {
        match (strategy.run)(document, label) {
            Ok(Some(value)) => {
                debug!(label, strategy = strategy.name, "label resolved");
                return Some(value);
            }
            Ok(None) => {}
            Err(e) => {
                debug!(label, strategy = strategy.name, error = %e, "strategy skipped");
            }
        }
    }
    None
}

/// Runs the extractor for every label, keeping label order
pub fn extract_fields(document: &Html, labels: &[&'static str]) -> FieldMap {
    let mut fields = FieldMap::empty(labels);
    for &label in labels {
        fields.insert(label, extract_by_label(document, label));
    }
    fields
}
