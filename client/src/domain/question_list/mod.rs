//! Paginated, searchable question list.
//!
//! The controller owns four inputs: the live search text, the committed
//! (debounced) query, the sort mode, and the current page. Keystrokes only
//! re-arm the debounce timer. When the timer fires the live text becomes the
//! committed query and the list returns to page 1. Whenever the committed
//! query, sort, or page differs from what was last requested, a fetch is
//! spawned.
//!
//! Fetches are never cancelled or deduplicated. `loading` stays raised while
//! any of them is outstanding, and [`StaleResponsePolicy`] decides whether a
//! response that resolves after a newer request was issued is applied.
//!
//! Every mutating method must run inside a Tokio runtime because it may
//! spawn a fetch or a timer.

mod view;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pagination::{Page, PageNumber, PageSize, PaginationState};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::ports::{QuestionRepository, QuestionRepositoryError};
use super::store_errors::from_question_store;
use super::{Error, Question, QuestionListQuery, QuestionSort, SearchQuery};

pub use view::{EmptyState, QuestionListView};

/// Quiet period before search input is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// What to do with a response whose request has since been superseded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Apply every response as it resolves; the last to resolve wins.
    #[default]
    ApplyAll,
    /// Drop responses to all but the most recently issued request.
    DiscardSuperseded,
}

/// Fixed parameters of one list session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    pub page_size: PageSize,
    pub debounce: Duration,
    pub stale_responses: StaleResponsePolicy,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::DEFAULT,
            debounce: DEFAULT_DEBOUNCE,
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    page: PageNumber,
    search: Option<SearchQuery>,
    sort: QuestionSort,
}

#[derive(Debug)]
struct ListState {
    search_input: String,
    search: Option<SearchQuery>,
    sort: QuestionSort,
    pagination: PaginationState,
    items: Vec<Question>,
    error: Option<Error>,
    outstanding: usize,
    debounce_armed: bool,
    latest_issued: u64,
    last_requested: Option<FetchKey>,
}

/// A fetch that has been counted as outstanding and must be run.
struct Ticket {
    sequence: u64,
    query: QuestionListQuery,
}

impl ListState {
    fn new(page_size: PageSize) -> Self {
        Self {
            search_input: String::new(),
            search: None,
            sort: QuestionSort::default(),
            pagination: PaginationState::new(page_size),
            items: Vec::new(),
            error: None,
            outstanding: 0,
            debounce_armed: false,
            latest_issued: 0,
            last_requested: None,
        }
    }

    fn key(&self) -> FetchKey {
        FetchKey {
            page: self.pagination.current_page(),
            search: self.search.clone(),
            sort: self.sort,
        }
    }

    fn issue(&mut self) -> Ticket {
        self.outstanding += 1;
        self.latest_issued += 1;
        self.last_requested = Some(self.key());
        Ticket {
            sequence: self.latest_issued,
            query: QuestionListQuery {
                page: self.pagination.request(),
                search: self.search.clone(),
                sort: self.sort,
            },
        }
    }

    fn issue_if_changed(&mut self) -> Option<Ticket> {
        let key = self.key();
        (self.last_requested.as_ref() != Some(&key)).then(|| self.issue())
    }

    fn is_settled(&self) -> bool {
        self.outstanding == 0 && !self.debounce_armed
    }
}

struct Shared {
    repository: Arc<dyn QuestionRepository>,
    settings: ListSettings,
    state: Mutex<ListState>,
    settled: Notify,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn(self: &Arc<Self>, ticket: Option<Ticket>) {
        if let Some(ticket) = ticket {
            let shared = Arc::clone(self);
            tokio::spawn(async move {
                // Failures are recorded in the view.
                let _ = shared.run(ticket).await;
            });
        }
    }

    async fn run(&self, ticket: Ticket) -> Result<(), Error> {
        let Ticket { sequence, query } = ticket;
        debug!(
            sequence,
            page = query.page.page().get(),
            search = query.search.as_ref().map(SearchQuery::as_str),
            sort = %query.sort,
            "fetching questions"
        );
        let result = self.repository.list(&query).await;
        let outcome = self.complete(sequence, result);
        self.settled.notify_waiters();
        outcome
    }

    fn complete(
        &self,
        sequence: u64,
        result: Result<Page<Question>, QuestionRepositoryError>,
    ) -> Result<(), Error> {
        let mut state = self.state();
        state.outstanding = state.outstanding.saturating_sub(1);
        let superseded = sequence < state.latest_issued;
        let apply = !superseded || self.settings.stale_responses == StaleResponsePolicy::ApplyAll;
        match result {
            Ok(page) => {
                if !apply {
                    debug!(sequence, "discarding superseded question page");
                    return Ok(());
                }
                let (items, total) = page.into_parts();
                debug!(sequence, total, superseded, "question page applied");
                state.items = items;
                state.pagination.record_total(total);
                state.error = None;
                Ok(())
            }
            Err(err) => {
                let error = from_question_store(err);
                warn!(sequence, error = %error, "question fetch failed");
                if apply {
                    state.error = Some(error.clone());
                }
                Err(error)
            }
        }
    }

    fn commit_search(self: &Arc<Self>) {
        let ticket = {
            let mut state = self.state();
            state.debounce_armed = false;
            state.search = SearchQuery::parse(&state.search_input);
            state.pagination.reset();
            info!(
                search = state.search.as_ref().map(SearchQuery::as_str),
                "search committed"
            );
            state.issue_if_changed()
        };
        self.spawn(ticket);
        self.settled.notify_waiters();
    }
}

/// Controller for the home-page question list.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
/// use stackit_client::domain::{ListSettings, QuestionListController};
/// use stackit_client::outbound::memory::InMemoryStore;
///
/// # async fn demo() -> Result<(), stackit_client::domain::Error> {
/// let store = Arc::new(InMemoryStore::default());
/// let list = QuestionListController::new(store, ListSettings::default());
/// list.load().await?;
/// list.on_search_input("borrow");
/// list.settled().await;
/// println!("{} matches", list.view().total_items);
/// # Ok(())
/// # }
/// ```
pub struct QuestionListController {
    shared: Arc<Shared>,
    debouncer: Mutex<Debouncer>,
}

impl QuestionListController {
    /// Controller on page 1 with no search and nothing loaded.
    pub fn new(repository: Arc<dyn QuestionRepository>, settings: ListSettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                repository,
                settings,
                state: Mutex::new(ListState::new(settings.page_size)),
                settled: Notify::new(),
            }),
            debouncer: Mutex::new(Debouncer::new(settings.debounce)),
        }
    }

    /// Session parameters.
    pub fn settings(&self) -> ListSettings {
        self.shared.settings
    }

    fn debouncer(&self) -> MutexGuard<'_, Debouncer> {
        self.debouncer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the current page and wait for it.
    ///
    /// Used for the initial load. The result is also recorded in the view.
    pub async fn load(&self) -> Result<(), Error> {
        let ticket = self.shared.state().issue();
        self.shared.run(ticket).await
    }

    /// Refetch the current page in the background.
    pub fn refresh(&self) {
        let ticket = self.shared.state().issue();
        self.shared.spawn(Some(ticket));
    }

    /// Record a keystroke in the search box and re-arm the debounce timer.
    pub fn on_search_input(&self, text: impl Into<String>) {
        {
            let mut state = self.shared.state();
            state.search_input = text.into();
            state.debounce_armed = true;
        }
        let shared = Arc::clone(&self.shared);
        self.debouncer().schedule(async move {
            shared.commit_search();
        });
    }

    /// Commit the search box contents now, skipping the quiet period.
    pub fn submit_search(&self, text: impl Into<String>) {
        self.debouncer().cancel();
        self.shared.state().search_input = text.into();
        self.shared.commit_search();
    }

    /// Empty the search box, drop the committed query, return to page 1,
    /// and refetch.
    pub fn clear_search(&self) {
        self.debouncer().cancel();
        let ticket = {
            let mut state = self.shared.state();
            state.search_input.clear();
            state.search = None;
            state.debounce_armed = false;
            state.pagination.reset();
            info!("search cleared");
            state.issue()
        };
        self.shared.spawn(Some(ticket));
        self.shared.settled.notify_waiters();
    }

    /// Jump to `page`. Returns whether the page changed.
    pub fn select_page(&self, page: PageNumber) -> bool {
        let ticket = {
            let mut state = self.shared.state();
            if !state.pagination.select(page) {
                return false;
            }
            state.issue_if_changed()
        };
        self.shared.spawn(ticket);
        true
    }

    /// Follow the "Next" control. Returns whether the page changed.
    pub fn next_page(&self) -> bool {
        let ticket = {
            let mut state = self.shared.state();
            if !state.pagination.next() {
                return false;
            }
            state.issue_if_changed()
        };
        self.shared.spawn(ticket);
        true
    }

    /// Follow the "Previous" control. Returns whether the page changed.
    pub fn previous_page(&self) -> bool {
        let ticket = {
            let mut state = self.shared.state();
            if !state.pagination.previous() {
                return false;
            }
            state.issue_if_changed()
        };
        self.shared.spawn(ticket);
        true
    }

    /// Switch the sort mode, returning to page 1. Returns whether it changed.
    pub fn set_sort(&self, sort: QuestionSort) -> bool {
        let ticket = {
            let mut state = self.shared.state();
            if state.sort == sort {
                return false;
            }
            state.sort = sort;
            state.pagination.reset();
            state.issue_if_changed()
        };
        self.shared.spawn(ticket);
        true
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> QuestionListView {
        let state = self.shared.state();
        let loading = state.outstanding > 0;
        let active_search = state.search.as_ref().map(|query| query.as_str().to_owned());
        QuestionListView {
            empty_state: QuestionListView::empty_state_for(
                loading,
                &state.items,
                state.pagination.total_items(),
                state.pagination.total_pages(),
                active_search.as_deref(),
            ),
            items: state.items.clone(),
            total_items: state.pagination.total_items(),
            current_page: state.pagination.current_page().get(),
            total_pages: state.pagination.total_pages(),
            visible_pages: state.pagination.visible_pages(),
            has_previous: state.pagination.has_previous(),
            has_next: state.pagination.has_next(),
            loading,
            error: state.error.clone(),
            search_input: state.search_input.clone(),
            active_search,
            sort: state.sort,
        }
    }

    /// Wait until no debounce is armed and no fetch is outstanding.
    pub async fn settled(&self) {
        loop {
            let notified = self.shared.settled.notified();
            if self.shared.state().is_settled() {
                return;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for QuestionListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionListController")
            .field("settings", &self.shared.settings)
            .finish_non_exhaustive()
    }
}
