//! Case-insensitive linear search over keyed items.

use crate::engine::{EngineError, Keyed};

/// First item whose search attribute matched, with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a, T> {
    pub index: usize,
    pub item: &'a T,
}

/// Scan `items` in order and return the first whose `attribute`
/// equals `target`, ignoring case.
///
/// Returns `Ok(None)` when nothing matches, including for an empty
/// slice. Items after the first match are never inspected.
pub fn linear_search<'a, T: Keyed>(
    items: &'a [T],
    attribute: &str,
    target: &str,
) -> Result<Option<SearchHit<'a, T>>, EngineError> {
    let needle = target.to_lowercase();

    for (index, item) in items.iter().enumerate() {
        let name = item.text_key(attribute)?;
        if name.to_lowercase() == needle {
            return Ok(Some(SearchHit { index, item }));
        }
    }

    Ok(None)
}
