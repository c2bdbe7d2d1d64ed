//! HTML locator
//!
//! Thin declarative layer over `scraper`: a [`Locator`] wraps a compiled CSS
//! selector, and the free functions evaluate it against a parsed document.
//! Absence is reported as `None` or an empty list, never as an error; callers
//! decide whether a missing node is fatal.
//!
//! The portal's element ids contain `:` and `.` (JSF naming containers), so id
//! locators are built as attribute selectors rather than `#id` shorthand.

use crate::{Result, TrackerError};
use scraper::{ElementRef, Html, Selector};
use std::fmt;

pub use scraper::Html as Document;

/// A compiled, reusable node locator
#[derive(Clone)]
pub struct Locator {
    expr: String,
    selector: Selector,
}

impl Locator {
    /// Compiles a raw CSS selector expression
    pub fn parse(expr: &str) -> Result<Self> {
        let selector = Selector::parse(expr).map_err(|e| TrackerError::InvalidLocator {
            expr: expr.to_string(),
            message: format!("{:?}", e),
        })?;

        Ok(Self {
            expr: expr.to_string(),
            selector,
        })
    }

    /// Locates the element whose `id` attribute equals `id` exactly
    pub fn id(id: &str) -> Result<Self> {
        Self::parse(&format!("[id=\"{}\"]", escape(id)))
    }

    /// Locates elements carrying `class_name` among their classes
    pub fn class(class_name: &str) -> Result<Self> {
        Self::parse(&format!("[class~=\"{}\"]", escape(class_name)))
    }

    /// Locates elements by tag name
    pub fn tag(tag: &str) -> Result<Self> {
        Self::parse(tag)
    }

    /// The selector expression this locator was built from
    pub fn expr(&self) -> &str {
        &self.expr
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Locator").field(&self.expr).finish()
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parses a full HTML document
pub fn parse(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Returns the first node matching `locator`, in document order
pub fn find_first<'a>(doc: &'a Html, locator: &Locator) -> Option<ElementRef<'a>> {
    doc.select(&locator.selector).next()
}

/// Returns every `tag` element inside the first node matching `locator`
///
/// An absent container yields an empty list.
pub fn find_all<'a>(doc: &'a Html, locator: &Locator, tag: &Locator) -> Vec<ElementRef<'a>> {
    match find_first(doc, locator) {
        Some(container) => find_within(container, tag),
        None => Vec::new(),
    }
}

/// Returns every descendant of `node` matching `locator`, in document order
pub fn find_within<'a>(node: ElementRef<'a>, locator: &Locator) -> Vec<ElementRef<'a>> {
    node.select(&locator.selector).collect()
}

/// Returns the first descendant of `node` matching `locator`
pub fn find_first_within<'a>(node: ElementRef<'a>, locator: &Locator) -> Option<ElementRef<'a>> {
    node.select(&locator.selector).next()
}

/// Returns the first node carrying the CSS class `class_name`
pub fn find_by_class<'a>(doc: &'a Html, class_name: &str) -> Result<Option<ElementRef<'a>>> {
    let locator = Locator::class(class_name)?;
    Ok(find_first(doc, &locator))
}

/// Reads an attribute value
pub fn attr<'a>(node: ElementRef<'a>, name: &str) -> Option<&'a str> {
    node.value().attr(name)
}

/// Reads the node's text content with whitespace runs collapsed to single spaces
pub fn text(node: ElementRef<'_>) -> String {
    node.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
