use std::fmt;

/// A single docket event, as displayed by the portal
pub type MovementRecord = String;

/// The lawsuit a crawl looks up
///
/// The code is opaque: it is forwarded to the search form without validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTarget {
    code: String,
}

impl SearchTarget {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// The movements of one lawsuit, in page order then document order
///
/// Duplicates are kept as the portal lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    target: SearchTarget,
    records: Vec<MovementRecord>,
}

impl CrawlResult {
    pub(crate) fn new(target: SearchTarget, records: Vec<MovementRecord>) -> Self {
        Self { target, records }
    }

    /// Result of a search that matched no lawsuit
    pub(crate) fn empty(target: SearchTarget) -> Self {
        Self::new(target, Vec::new())
    }

    pub fn code(&self) -> &str {
        self.target.code()
    }

    pub fn records(&self) -> &[MovementRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Splits command-line arguments into lawsuit codes
///
/// Each argument may hold several codes separated by spaces or commas.
pub fn parse_codes<I, S>(args: I) -> Vec<SearchTarget>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .flat_map(|arg| {
            arg.as_ref()
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|code| !code.is_empty())
                .map(SearchTarget::new)
                .collect::<Vec<_>>()
        })
        .collect()
}
