use crate::html::{self, Document, Locator};
use crate::{Result, TrackerError};

/// Id of the hidden JSF view-state input
pub const VIEW_STATE_ID: &str = "javax.faces.ViewState";

/// Class of the slider label showing the last page number
pub const MAX_PAGE_CLASS: &str = "rich-inslider-right-num";

/// Reads the view-state token from the hidden input
///
/// A missing field is fatal: pagination cannot be driven without it.
pub fn extract_view_state(doc: &Document) -> Result<String> {
    let locator = Locator::id(VIEW_STATE_ID)?;
    let node = html::find_first(doc, &locator)
        .ok_or_else(|| TrackerError::not_found("view-state field"))?;

    html::attr(node, "value")
        .map(str::to_string)
        .ok_or_else(|| TrackerError::not_found("view-state value"))
}

/// Reads the total number of movement pages from the pagination slider
pub fn extract_max_page(doc: &Document) -> Result<u32> {
    let node = html::find_by_class(doc, MAX_PAGE_CLASS)?
        .ok_or_else(|| TrackerError::not_found("pagination count"))?;

    let value = html::text(node);
    value.parse::<u32>().map_err(|_| TrackerError::Parse {
        element: "pagination count".to_string(),
        value,
    })
}
