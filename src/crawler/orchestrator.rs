//! Crawl orchestrator
//!
//! Drives one lawsuit code through the portal's form flow:
//!
//! 1. GET the landing page, capture cookies, find the search form action
//! 2. POST the search form
//! 3. Follow the first result link found in the result table
//! 4. Read the view-state token, the page count and the page 1 movements
//! 5. For every further page, POST the page-change event, then POST a render
//!    request to the same lawsuit URL and read that page's movements
//!
//! The page-change response is only an AJAX acknowledgment; the movements of
//! the new page come from the render request that follows it.
//!
//! Parsed documents never live across an `.await`: every response is parsed
//! and reduced to owned data inside a synchronous block.

use crate::config::PortalConfig;
use crate::crawler::link::{find_result_links, resolve_link, LinkExtractor, OnclickPattern};
use crate::crawler::records::extract_records;
use crate::crawler::state::CrawlState;
use crate::crawler::types::{CrawlResult, MovementRecord, SearchTarget};
use crate::form::{build_pagination_form, build_search_form};
use crate::html::{self, Locator};
use crate::session::{extract_max_page, extract_view_state, CrawlSession, VIEW_STATE_ID};
use crate::transport::{Response, Transport};
use crate::{CrawlError, Result, TrackerError};
use url::Url;

/// Id of the search form on the landing page
pub const SEARCH_FORM_ID: &str = "fPP";

/// What the lawsuit page yields before any pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedLawsuit {
    /// Number of movement pages the portal reports
    pub max_page: u32,
    /// Movements already present on page 1
    pub records: Vec<MovementRecord>,
}

/// Tracks and validates the state of one crawl
#[derive(Debug)]
struct StateMachine<'a> {
    code: &'a str,
    state: CrawlState,
}

impl<'a> StateMachine<'a> {
    fn new(code: &'a str) -> Self {
        Self {
            code,
            state: CrawlState::Init,
        }
    }

    fn advance(&mut self, next: CrawlState) -> Result<()> {
        if !self.state.can_transition_to(&next) {
            return Err(TrackerError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::debug!(code = self.code, from = %self.state, to = %next, "State transition");
        self.state = next;
        Ok(())
    }

    /// Moves to `Failed`, returning the state the crawl failed in
    fn fail(&mut self) -> CrawlState {
        let stage = self.state;
        tracing::debug!(code = self.code, from = %stage, "State transition to failed");
        self.state = CrawlState::Failed;
        stage
    }
}

/// Crawls lawsuits through a [`Transport`]
pub struct Crawler<T: Transport> {
    transport: T,
    base_url: Url,
    link_extractor: Box<dyn LinkExtractor>,
}

impl<T: Transport> Crawler<T> {
    /// Creates a crawler for the portal at `base_url` with the default link pattern
    pub fn new(transport: T, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            link_extractor: Box::new(OnclickPattern::default()),
        }
    }

    /// Creates a crawler from the portal section of the configuration
    pub fn from_config(transport: T, portal: &PortalConfig) -> Result<Self> {
        let base_url = Url::parse(&portal.base_url)?;
        let extractor = OnclickPattern::new(&portal.link_pattern)?;
        Ok(Self::new(transport, base_url).with_link_extractor(Box::new(extractor)))
    }

    /// Replaces the strategy used to pull lawsuit links out of result rows
    pub fn with_link_extractor(mut self, extractor: Box<dyn LinkExtractor>) -> Self {
        self.link_extractor = extractor;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs a complete crawl for one lawsuit code with a fresh session
    ///
    /// A search that matches nothing completes with no records. Any transport
    /// or extraction failure aborts the crawl and discards the records
    /// collected so far.
    pub async fn crawl(&self, target: &SearchTarget) -> std::result::Result<CrawlResult, CrawlError> {
        let mut session = CrawlSession::new();
        let mut machine = StateMachine::new(target.code());

        match self.drive(target, &mut session, &mut machine).await {
            Ok(result) => {
                tracing::info!(
                    code = target.code(),
                    records = result.records().len(),
                    "Crawl completed"
                );
                Ok(result)
            }
            Err(source) => {
                let stage = machine.fail();
                tracing::error!(code = target.code(), %stage, "Crawl failed: {}", source);
                Err(CrawlError {
                    code: target.code().to_string(),
                    stage,
                    source,
                })
            }
        }
    }

    async fn drive(
        &self,
        target: &SearchTarget,
        session: &mut CrawlSession,
        machine: &mut StateMachine<'_>,
    ) -> Result<CrawlResult> {
        let search_url = self.establish_session(session).await?;
        machine.advance(CrawlState::SessionEstablished)?;

        let lawsuit_url = self.submit_search(session, &search_url, target).await?;
        machine.advance(CrawlState::SearchSubmitted)?;

        let Some(lawsuit_url) = lawsuit_url else {
            tracing::info!(code = target.code(), "Search returned no lawsuit");
            machine.advance(CrawlState::Done)?;
            return Ok(CrawlResult::empty(target.clone()));
        };

        let opened = self.open_lawsuit(session, &lawsuit_url).await?;
        machine.advance(CrawlState::LawsuitOpened)?;

        let mut records = opened.records;
        machine.advance(CrawlState::Paginating(1))?;

        for page in 2..=opened.max_page {
            let page_records = self.fetch_page(session, &lawsuit_url, page).await?;
            tracing::debug!(
                code = target.code(),
                page,
                records = page_records.len(),
                "Page collected"
            );
            records.extend(page_records);
            machine.advance(CrawlState::Paginating(page))?;
        }

        machine.advance(CrawlState::Done)?;
        Ok(CrawlResult::new(target.clone(), records))
    }

    /// Fetches the landing page and returns the search endpoint
    ///
    /// Cookies are captured from the first response that sets any; later
    /// calls within the same session leave them untouched.
    pub async fn establish_session(&self, session: &mut CrawlSession) -> Result<Url> {
        let response = self.transport.get(&self.base_url, session).await?;
        let response = ensure_ok(&self.base_url, response)?;

        if session.capture_cookies(&response.headers) {
            tracing::debug!(cookies = session.cookies().len(), "Session cookies captured");
        }

        let action = {
            let doc = html::parse(&response.body);
            let form = html::find_first(&doc, &Locator::id(SEARCH_FORM_ID)?)
                .ok_or_else(|| TrackerError::not_found("search form"))?;
            html::attr(form, "action")
                .map(str::to_string)
                .ok_or_else(|| TrackerError::not_found("search form action"))?
        };

        resolve_link(&self.base_url, &action)
    }

    /// Submits the search and returns the first matching lawsuit's URL, if any
    pub async fn submit_search(
        &self,
        session: &mut CrawlSession,
        search_url: &Url,
        target: &SearchTarget,
    ) -> Result<Option<Url>> {
        tracing::info!(code = target.code(), "Retrieving lawsuit information");

        let form = build_search_form(target.code());
        let response = self.transport.post_form(search_url, &form, session).await?;
        let response = ensure_ok(search_url, response)?;

        let links = {
            let doc = html::parse(&response.body);
            find_result_links(&doc, self.link_extractor.as_ref())?
        };

        if links.len() > 1 {
            tracing::warn!(
                code = target.code(),
                matches = links.len(),
                "Search matched several lawsuits, following the first"
            );
        }

        links
            .first()
            .map(|link| resolve_link(&self.base_url, link))
            .transpose()
    }

    /// Opens the lawsuit page, storing its view-state token in the session
    pub async fn open_lawsuit(
        &self,
        session: &mut CrawlSession,
        lawsuit_url: &Url,
    ) -> Result<OpenedLawsuit> {
        let response = self.transport.get(lawsuit_url, session).await?;
        let response = ensure_ok(lawsuit_url, response)?;

        let (view_state, max_page, records) = {
            let doc = html::parse(&response.body);
            (
                extract_view_state(&doc)?,
                extract_max_page(&doc)?,
                extract_records(&doc)?,
            )
        };

        tracing::info!(session_id = %view_state, max_page, "Lawsuit opened");
        session.set_view_state(view_state);

        Ok(OpenedLawsuit { max_page, records })
    }

    /// Moves the server cursor to `page` and returns that page's movements
    ///
    /// Two exchanges: the page-change event, then the render request that
    /// returns the page content. If the rendered page carries a new view-state
    /// token, the session adopts it for later pages.
    pub async fn fetch_page(
        &self,
        session: &mut CrawlSession,
        lawsuit_url: &Url,
        page: u32,
    ) -> Result<Vec<MovementRecord>> {
        let change = build_pagination_form(session, Some(page))?;
        let response = self.transport.post_form(lawsuit_url, &change, session).await?;
        ensure_ok(lawsuit_url, response)?;

        let render = build_pagination_form(session, None)?;
        let response = self.transport.post_form(lawsuit_url, &render, session).await?;
        let response = ensure_ok(lawsuit_url, response)?;

        let (view_state, records) = {
            let doc = html::parse(&response.body);
            let view_state = html::find_first(&doc, &Locator::id(VIEW_STATE_ID)?)
                .and_then(|node| html::attr(node, "value"))
                .map(str::to_string);
            (view_state, extract_records(&doc)?)
        };

        if let Some(token) = view_state {
            if session.set_view_state(token) {
                tracing::debug!(page, "View-state token superseded");
            }
        }

        Ok(records)
    }
}

/// Surfaces any status other than 200 as a transport error
fn ensure_ok(url: &Url, response: Response) -> Result<Response> {
    if response.is_ok() {
        Ok(response)
    } else {
        Err(TrackerError::Transport {
            url: url.to_string(),
            status: response.status,
        })
    }
}
