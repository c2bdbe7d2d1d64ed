/// Crawl state definitions for one lawsuit code
///
/// A crawl moves strictly forward through these states; `Failed` is
/// reachable from any non-terminal state.
use std::fmt;

/// Represents the current state of a lawsuit crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Nothing requested yet
    Init,

    /// Landing page fetched, cookies captured, search endpoint known
    SessionEstablished,

    /// Search form submitted
    SearchSubmitted,

    /// Lawsuit page opened
    LawsuitOpened,

    /// Records of pages `1..=n` have been collected
    Paginating(u32),

    // ===== Terminal States =====
    /// All pages collected, or the search matched nothing
    Done,

    /// A transport or extraction failure aborted the crawl
    Failed,
}

impl CrawlState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if the crawl is still in progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: &CrawlState) -> bool {
        use CrawlState::*;

        match (self, next) {
            (from, Failed) => from.is_active(),
            (Init, SessionEstablished) => true,
            (SessionEstablished, SearchSubmitted) => true,
            // Zero search results end the crawl here
            (SearchSubmitted, LawsuitOpened) | (SearchSubmitted, Done) => true,
            (LawsuitOpened, Paginating(1)) => true,
            (Paginating(n), Paginating(m)) => *m == n + 1,
            (Paginating(_), Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::SessionEstablished => write!(f, "session_established"),
            Self::SearchSubmitted => write!(f, "search_submitted"),
            Self::LawsuitOpened => write!(f, "lawsuit_opened"),
            Self::Paginating(page) => write!(f, "paginating({})", page),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
