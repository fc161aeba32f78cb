use crate::{EventStream, StateCell};
use futures_signals::signal::{MutableSignalCloned, Signal, SignalExt};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Construction parameters of a [`PaginationModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PaginationConfig {
    pub initial_page: u32,
    pub initial_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            initial_page: 1,
            initial_limit: 20,
            max_limit: 100,
        }
    }
}

impl PaginationConfig {
    /// Brings every field into its valid range: `max_limit >= 1`,
    /// `initial_limit` within `[1, max_limit]` and `initial_page >= 1`.
    pub fn normalized(self) -> Self {
        let max_limit = self.max_limit.max(1);
        Self {
            initial_page: self.initial_page.max(1),
            initial_limit: self.initial_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn initial_state(&self) -> PaginationState {
        let config = self.normalized();
        PaginationState {
            current_page: config.initial_page,
            limit: config.initial_limit,
            total_items: None,
        }
    }
}

/// Page, page size and total count. Everything else is derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub limit: u32,
    /// `None` until the remote side has reported a count.
    pub total_items: Option<u32>,
}

impl PaginationState {
    /// Index of the first item on the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Last reachable page, `None` while the total is unknown. An empty
    /// catalog yields `Some(0)`; page transitions still floor at page 1.
    pub fn max_page(&self) -> Option<u32> {
        self.total_items
            .map(|total| total.div_ceil(self.limit.max(1)))
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        match self.total_items {
            None | Some(0) => false,
            Some(total) => u64::from(self.current_page) * u64::from(self.limit) < u64::from(total),
        }
    }

    /// `page` limited to `[1, max_page]`.
    pub fn clamp_page(&self, page: u32) -> u32 {
        let upper = self.max_page().unwrap_or(u32::MAX);
        page.min(upper).max(1)
    }

    pub fn with_page(self, page: u32) -> Self {
        Self {
            current_page: self.clamp_page(page),
            ..self
        }
    }

    pub fn next(self) -> Self {
        self.with_page(self.current_page.saturating_add(1))
    }

    pub fn prev(self) -> Self {
        self.with_page(self.current_page.saturating_sub(1))
    }

    /// Clamps `limit` to `[1, max_limit]`, then re-clamps the current page
    /// against the page count the new limit yields.
    pub fn with_limit(self, limit: u32, max_limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, max_limit.max(1)),
            ..self
        }
        .with_page(self.current_page)
    }

    /// Takes the count verbatim; the current page is only re-clamped by the
    /// next page transition.
    pub fn with_total_items(self, total_items: u32) -> Self {
        Self {
            total_items: Some(total_items),
            ..self
        }
    }
}

/// Page navigation state machine.
///
/// Every trigger is a reducer over one snapshot of [`PaginationState`]
/// taken under the cell's lock, so concurrent triggers never interleave
/// inside a transition. Inputs are clamped, never rejected.
#[derive(Clone)]
pub struct PaginationModel {
    name: String,
    config: PaginationConfig,
    state: StateCell<PaginationState>,
    set_page: EventStream<u32>,
    next_page: EventStream<()>,
    prev_page: EventStream<()>,
    set_limit: EventStream<u32>,
    set_total_items: EventStream<u32>,
    reset: EventStream<()>,
}

impl PaginationModel {
    pub fn new(name: impl Into<String>, config: PaginationConfig) -> Self {
        let name = name.into();
        let config = config.normalized();
        let state = StateCell::new(format!("{name}.state"), config.initial_state());

        let set_page = EventStream::new(format!("{name}.set_page"));
        let next_page = EventStream::new(format!("{name}.next_page"));
        let prev_page = EventStream::new(format!("{name}.prev_page"));
        let set_limit = EventStream::new(format!("{name}.set_limit"));
        let set_total_items = EventStream::new(format!("{name}.set_total_items"));
        let reset = EventStream::new(format!("{name}.reset"));

        let max_limit = config.max_limit;
        state.on(&set_page, |state: &PaginationState, page: &u32| state.with_page(*page));
        state.on(&next_page, |state: &PaginationState, _: &()| state.next());
        state.on(&prev_page, |state: &PaginationState, _: &()| state.prev());
        state.on(&set_limit, move |state: &PaginationState, limit: &u32| {
            state.with_limit(*limit, max_limit)
        });
        state.on(&set_total_items, |state: &PaginationState, total: &u32| {
            state.with_total_items(*total)
        });
        state.reset_on(&reset);

        {
            let name = name.clone();
            state.watch(move |state| {
                debug!(
                    pagination = %name,
                    page = state.current_page,
                    limit = state.limit,
                    total = ?state.total_items,
                    "state changed"
                );
            });
        }

        PaginationModel {
            name,
            config,
            state,
            set_page,
            next_page,
            prev_page,
            set_limit,
            set_total_items,
            reset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> PaginationConfig {
        self.config
    }

    pub fn set_page(&self, page: u32) {
        self.set_page.fire(page)
    }

    pub fn next_page(&self) {
        self.next_page.fire(())
    }

    pub fn prev_page(&self) {
        self.prev_page.fire(())
    }

    pub fn set_limit(&self, limit: u32) {
        self.set_limit.fire(limit)
    }

    pub fn set_total_items(&self, total_items: u32) {
        self.set_total_items.fire(total_items)
    }

    pub fn reset(&self) {
        self.reset.fire(())
    }

    pub fn state(&self) -> PaginationState {
        self.state.get()
    }

    pub fn current_page(&self) -> u32 {
        self.state.with(|state| state.current_page)
    }

    pub fn limit(&self) -> u32 {
        self.state.with(|state| state.limit)
    }

    pub fn offset(&self) -> u64 {
        self.state.with(PaginationState::offset)
    }

    pub fn total_items(&self) -> Option<u32> {
        self.state.with(|state| state.total_items)
    }

    pub fn max_page(&self) -> Option<u32> {
        self.state.with(PaginationState::max_page)
    }

    pub fn has_next_page(&self) -> bool {
        self.state.with(PaginationState::has_next_page)
    }

    pub fn has_prev_page(&self) -> bool {
        self.state.with(PaginationState::has_prev_page)
    }

    pub fn state_cell(&self) -> StateCell<PaginationState> {
        self.state.clone()
    }

    pub fn state_signal(&self) -> MutableSignalCloned<PaginationState> {
        self.state.signal()
    }

    pub fn current_page_signal(&self) -> impl Signal<Item = u32> {
        self.state.signal().map(|state| state.current_page).dedupe()
    }

    pub fn has_next_page_signal(&self) -> impl Signal<Item = bool> {
        self.state.signal().map(|state| state.has_next_page()).dedupe()
    }

    pub fn has_prev_page_signal(&self) -> impl Signal<Item = bool> {
        self.state.signal().map(|state| state.has_prev_page()).dedupe()
    }

    pub fn set_page_event(&self) -> EventStream<u32> {
        self.set_page.clone()
    }

    pub fn next_page_event(&self) -> EventStream<()> {
        self.next_page.clone()
    }

    pub fn prev_page_event(&self) -> EventStream<()> {
        self.prev_page.clone()
    }

    pub fn set_limit_event(&self) -> EventStream<u32> {
        self.set_limit.clone()
    }

    pub fn set_total_items_event(&self) -> EventStream<u32> {
        self.set_total_items.clone()
    }

    pub fn reset_event(&self) -> EventStream<()> {
        self.reset.clone()
    }
}
