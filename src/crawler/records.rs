//! Movement record extraction

use crate::crawler::types::MovementRecord;
use crate::html::{self, Document, Locator};
use crate::Result;

/// Id of the movement table body
pub const MOVEMENTS_ID: &str = "j_id134:processoEvento:tb";

/// Extracts the movements listed on one page, in document order
///
/// Only `span` elements with an `id` carry movement text; the others are
/// layout. A page without the movement table yields no records.
pub fn extract_records(doc: &Document) -> Result<Vec<MovementRecord>> {
    let container = Locator::id(MOVEMENTS_ID)?;
    let spans = Locator::tag("span")?;

    Ok(html::find_all(doc, &container, &spans)
        .into_iter()
        .filter(|span| html::attr(*span, "id").is_some())
        .map(html::text)
        .collect())
}
