//! Incremental pagination over the search endpoint.
//!
//! [`Pager`] is a small state machine. It never performs I/O itself: every
//! transition returns the [`PageRequest`] (if any) that the caller must run,
//! and the caller feeds the outcome back through [`Pager::resolve`].
//!
//! At most one request is outstanding at a time. Each request carries the
//! pager's generation, which changes whenever the query key does, so a
//! response that arrives after the user changed the query is dropped instead
//! of being mixed into the new result set.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::api::{Issue, JqlSearchRequest};
use crate::query::{QueryKey, QueryState};

/// Number of issues requested per page.
pub const PAGE_SIZE: u32 = 25;

/// A fully-specified fetch key: one page of one query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    /// One-based page number.
    pub page: u32,
    pub query: QueryKey,
}

impl PageKey {
    /// Zero-based offset of the first issue on this page.
    pub fn start_at(&self) -> u32 {
        self.page.saturating_sub(1) * PAGE_SIZE
    }

    /// Build the wire request for this page.
    pub fn search_request(&self) -> JqlSearchRequest {
        JqlSearchRequest {
            project: self.query.project.clone(),
            filter: self.query.filter.clone(),
            sort_field: self.query.sort_field.clone(),
            sort_asc: self.query.sort_ascending,
            advanced: self.query.advanced,
            search: self.query.search.clone(),
            start_at: self.start_at(),
            max_results: PAGE_SIZE,
            is_forge: false,
            workspace_id: String::new(),
        }
    }
}

/// Fetch key for a page of the given query; `None` until a project is chosen.
pub fn fetch_key(page: u32, query: &QueryState) -> Option<PageKey> {
    query.key().map(|query| PageKey { page, query })
}

/// One resolved page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// One-based page number.
    pub number: u32,
    pub issues: Vec<Issue>,
    /// The request that produced this page.
    pub request: JqlSearchRequest,
}

/// A failed page fetch, reduced to a displayable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    message: String,
    retryable: bool,
}

impl FetchError {
    /// A failure worth retrying with load-more.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    /// A failure that will repeat until the configuration or query changes.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            retryable: false,
            ..Self::new(message)
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A page fetch the caller should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Pager generation the request belongs to.
    pub generation: u64,
    pub key: PageKey,
}

/// The outcome of a [`PageRequest`].
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub generation: u64,
    pub page: u32,
    pub result: Result<Page, FetchError>,
}

impl PageResponse {
    /// Pair a fetch result with the request that produced it.
    pub fn for_request(request: &PageRequest, result: Result<Page, FetchError>) -> Self {
        Self {
            generation: request.generation,
            page: request.key.page,
            result,
        }
    }
}

/// Where the pager currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Page 1 of the current key is in flight.
    LoadingFirst,
    /// A page past the loaded ones is in flight.
    LoadingMore,
    /// Already-loaded pages are being fetched again.
    Revalidating,
    /// The last fetch failed; loaded pages are kept.
    Error,
}

/// Accumulated pages for the current query key.
#[derive(Debug, Default)]
pub struct Pager {
    key: Option<QueryKey>,
    generation: u64,
    pages: Vec<Page>,
    phase: FetchPhase,
    /// Page number of the outstanding request.
    in_flight: Option<u32>,
    error: Option<FetchError>,
    /// Loaded page whose re-fetch failed; load-more resumes from here.
    revalidate_from: Option<u32>,
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new query key.
    ///
    /// A different key discards everything accumulated so far and requests
    /// page 1. The same key is a no-op.
    pub fn set_key(&mut self, key: Option<QueryKey>) -> Option<PageRequest> {
        if self.key == key {
            return None;
        }

        self.generation += 1;
        self.pages.clear();
        self.error = None;
        self.in_flight = None;
        self.revalidate_from = None;
        self.key = key;

        debug!(
            generation = self.generation,
            has_key = self.key.is_some(),
            "Query key changed, resetting pages"
        );

        if self.key.is_some() {
            self.phase = FetchPhase::LoadingFirst;
            self.request(1)
        } else {
            self.phase = FetchPhase::Idle;
            None
        }
    }

    /// Request the next page.
    ///
    /// Does nothing while a request is outstanding or once the end of the
    /// list has been reached. After a failure this retries the failed page,
    /// including a loaded page whose revalidation failed.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        self.key.as_ref()?;

        if let Some(page) = self.in_flight {
            trace!(page, "Ignoring load more, request already in flight");
            return None;
        }
        if let Some(page) = self.revalidate_from.take() {
            debug!(page, "Resuming revalidation");
            self.phase = FetchPhase::Revalidating;
            self.error = None;
            return self.request(page);
        }
        if self.is_reaching_end() {
            trace!("Ignoring load more, end of list reached");
            return None;
        }

        let next = self.pages.len() as u32 + 1;
        self.phase = if self.pages.is_empty() {
            FetchPhase::LoadingFirst
        } else {
            FetchPhase::LoadingMore
        };
        self.error = None;
        self.request(next)
    }

    /// Re-fetch the loaded pages in order, replacing each one in place.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        self.key.as_ref()?;

        if self.in_flight.is_some() {
            trace!("Ignoring refresh, request already in flight");
            return None;
        }
        if self.pages.is_empty() {
            return self.load_more();
        }

        debug!(pages = self.pages.len(), "Revalidating loaded pages");
        self.phase = FetchPhase::Revalidating;
        self.error = None;
        self.revalidate_from = None;
        self.request(1)
    }

    /// Apply the outcome of a request and return the follow-up request, if any.
    pub fn resolve(&mut self, response: PageResponse) -> Option<PageRequest> {
        if response.generation != self.generation || self.in_flight != Some(response.page) {
            debug!(
                generation = response.generation,
                current = self.generation,
                page = response.page,
                "Discarding stale page response"
            );
            return None;
        }
        self.in_flight = None;

        match response.result {
            Ok(page) => self.accept(response.page, page),
            Err(error) => {
                warn!(page = response.page, error = %error, "Page fetch failed");
                if self.phase == FetchPhase::Revalidating {
                    self.revalidate_from = Some(response.page);
                }
                self.error = Some(error);
                self.phase = FetchPhase::Error;
                None
            }
        }
    }

    fn accept(&mut self, number: u32, page: Page) -> Option<PageRequest> {
        let index = (number - 1) as usize;
        let short = page.issues.len() < PAGE_SIZE as usize;
        debug!(page = number, issues = page.issues.len(), "Page resolved");

        if self.phase == FetchPhase::Revalidating {
            if index < self.pages.len() {
                self.pages[index] = page;
            }
            if short {
                // Pages after a short page can no longer be reached.
                self.pages.truncate(index + 1);
            } else if index + 1 < self.pages.len() {
                return self.request(number + 1);
            }
        } else {
            debug_assert_eq!(index, self.pages.len());
            self.pages.push(page);
        }

        self.phase = FetchPhase::Idle;
        None
    }

    fn request(&mut self, page: u32) -> Option<PageRequest> {
        let query = self.key.clone()?;
        self.in_flight = Some(page);
        trace!(page, generation = self.generation, "Requesting page");
        Some(PageRequest {
            generation: self.generation,
            key: PageKey { page, query },
        })
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of page slots requested so far, resolved or not.
    pub fn requested_pages(&self) -> usize {
        self.pages.len() + usize::from(self.is_loading_more())
    }

    /// All accumulated issues in page order.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.pages.iter().flat_map(|p| p.issues.iter())
    }

    pub fn issue_count(&self) -> usize {
        self.pages.iter().map(|p| p.issues.len()).sum()
    }

    pub fn issue(&self, index: usize) -> Option<&Issue> {
        self.issues().nth(index)
    }

    /// The most recent failure, cleared by the next request.
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// First page of the current key is in flight and nothing has arrived yet.
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::LoadingFirst
    }

    /// A request for a not-yet-loaded page is in flight.
    pub fn is_loading_more(&self) -> bool {
        matches!(
            self.phase,
            FetchPhase::LoadingFirst | FetchPhase::LoadingMore
        )
    }

    /// The first page came back empty, or there is no project to search.
    pub fn is_empty(&self) -> bool {
        match self.pages.first() {
            Some(page) => page.issues.is_empty(),
            None => self.key.is_none(),
        }
    }

    /// No further pages exist.
    pub fn is_reaching_end(&self) -> bool {
        self.is_empty()
            || self
                .pages
                .last()
                .is_some_and(|p| p.issues.len() < PAGE_SIZE as usize)
    }

    /// Loaded pages are being re-fetched; no new page slot is pending.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some() && self.pages.len() == self.requested_pages()
    }
}
