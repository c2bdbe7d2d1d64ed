//! Form builder
//!
//! The portal runs on JSF/RichFaces and rejects any submission that does not
//! carry its full field set, even fields that are logically empty. The field
//! names and constant values below mirror the portal's forms verbatim.

use crate::session::{CrawlSession, VIEW_STATE_ID};
use crate::{Result, TrackerError};

/// Ordered list of form fields, submitted in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(Vec<(String, String)>);

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Value of the first field named `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Search form field receiving the lawsuit code
pub const SEARCH_CODE_FIELD: &str =
    "fPP:numProcesso-inputNumeroProcessoDecoration:numProcesso-inputNumeroProcesso";

/// Constant search form fields, in the order the portal's own page submits them
const SEARCH_FORM_CONSTANTS: &[(&str, &str)] = &[
    ("mascaraProcessoReferenciaRadio", "on"),
    ("fPP:j_id150:processoReferenciaInput", ""),
    ("fPP:dnp:nomeParte", ""),
    ("fPP:j_id168:nomeSocial", ""),
    ("fPP:j_id177:alcunha", ""),
    ("fPP:j_id186:nomeAdv", ""),
    ("fPP:j_id195:classeProcessualProcessoHidden", ""),
    ("tipoMascaraDocumento", "on"),
    ("fPP:dpDec:documentoParte", ""),
    ("fPP:Decoration:numeroOAB", ""),
    ("fPP:Decoration:j_id230", ""),
    (
        "fPP:Decoration:estadoComboOAB:org.jboss.seam.ui.NoSelectionConverter.noSelectionValue",
        "",
    ),
    ("fPP", "fPP"),
    ("autoScroll", ""),
    (VIEW_STATE_ID, "j_id1"),
    ("fPP:j_id236", "fPP:j_id236"),
    ("AJAXREQUEST", "_viewRoot"),
    ("AJAX:EVENTS_COUNT", "1"),
];

/// Slider field carrying the requested page number
pub const PAGE_NUMBER_FIELD: &str = "j_id134:j_id531:j_id532";

/// AJAX region of the movement table
pub const PAGINATION_AJAX_REQUEST: &str = "j_id134:j_id458";

/// Builds the search form for a lawsuit code
pub fn build_search_form(code: &str) -> FieldSet {
    let mut fields = FieldSet::new();
    fields.push(SEARCH_CODE_FIELD, code);
    for (name, value) in SEARCH_FORM_CONSTANTS {
        fields.push(*name, *value);
    }
    fields
}

/// Builds a pagination form carrying the session's view-state token
///
/// With `target_page`, the form fires the slider's page-change event, which
/// moves the server-side cursor. Without it, the form only re-requests the
/// currently rendered page, which is how the page content is actually obtained
/// after a page change.
pub fn build_pagination_form(session: &CrawlSession, target_page: Option<u32>) -> Result<FieldSet> {
    let view_state = session.view_state().ok_or(TrackerError::MissingViewState)?;

    let mut fields = FieldSet::new();
    fields.push(VIEW_STATE_ID, view_state);

    if let Some(page) = target_page {
        fields.push("AJAXREQUEST", PAGINATION_AJAX_REQUEST);
        fields.push("AJAX:EVENTS_COUNT", "1");
        fields.push(PAGE_NUMBER_FIELD, page.to_string());
        fields.push("j_id134:j_id531", "j_id134:j_id531");
        fields.push("autoScroll", "");
        fields.push("j_id134:j_id531:j_id533", "j_id134:j_id531:j_id533");
    }

    Ok(fields)
}
