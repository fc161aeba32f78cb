use crate::{
    either_pending, fetch_items, forward, sample, CatalogClient, CatalogPage, EventStream,
    ListParams, PaginationConfig, PaginationModel, PaginationState, Pokemon, QueryModel, StateCell,
};
use futures_signals::map_ref;
use futures_signals::signal::{Signal, SignalExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a successful detail fetch lands in the visible collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum CollectionMode {
    /// The new page replaces whatever was shown.
    #[default]
    Replace,
    /// The new page is appended, as an infinite list would. Entries already
    /// shown are skipped, so revisiting or refreshing a page adds nothing.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PokedexConfig {
    pub pagination: PaginationConfig,
    pub collection: CollectionMode,
}

#[cfg(feature = "serde")]
impl PokedexConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Everything a view needs to render one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub items: Vec<Pokemon>,
    pub loading: bool,
    pub error: Option<String>,
    pub current_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Paged catalog browser: a pagination model driving a two-stage fetch.
///
/// Navigation fetches the listing for the new window; a successful listing
/// feeds its count back into the pagination and its URLs into the detail
/// query; a successful detail fetch becomes the visible collection. A
/// failure in either stage lands in the shared error and leaves the
/// collection untouched; the next success of either stage clears it.
#[derive(Clone)]
pub struct Pokedex {
    config: PokedexConfig,
    pagination: PaginationModel,
    list_query: QueryModel<ListParams, CatalogPage>,
    detail_query: QueryModel<Vec<String>, Vec<Pokemon>>,
    items: StateCell<Vec<Pokemon>>,
    error: StateCell<Option<String>>,
    refresh: EventStream<()>,
}

impl Pokedex {
    pub fn new(client: Arc<dyn CatalogClient>, config: PokedexConfig) -> Self {
        let pagination = PaginationModel::new("pokedex.pagination", config.pagination);

        let list_query: QueryModel<ListParams, CatalogPage> = {
            let client = client.clone();
            QueryModel::new("pokedex.list", move |params: ListParams| {
                let client = client.clone();
                async move { client.list_page(params.limit, params.offset).await }
            })
        };
        let detail_query: QueryModel<Vec<String>, Vec<Pokemon>> =
            QueryModel::new("pokedex.detail", move |urls: Vec<String>| {
                fetch_items(client.clone(), urls)
            });

        let items: StateCell<Vec<Pokemon>> = StateCell::new("pokedex.items", Vec::new());
        let error: StateCell<Option<String>> = StateCell::new("pokedex.error", None);
        let refresh: EventStream<()> = EventStream::new("pokedex.refresh");

        // Registered after the pagination reducers, so the rules below read
        // the state the navigation has just produced.
        let navigate = EventStream::merge(
            "pokedex.navigate",
            [
                &pagination.next_page_event(),
                &pagination.prev_page_event(),
                &pagination.set_page_event().map("pokedex.navigate.set_page", |_| ()),
                &pagination.set_limit_event().map("pokedex.navigate.set_limit", |_| ()),
                &refresh,
            ],
        );
        sample(
            &navigate,
            &pagination.state_cell(),
            |state: &PaginationState, _: &()| ListParams {
                limit: state.limit,
                offset: state.offset(),
            },
            &list_query.fetch_event(),
        );

        let pages = list_query
            .data_cell()
            .updates()
            .filter_map("pokedex.list.pages", |data: &Option<CatalogPage>| data.clone());
        forward(
            &pages.map("pokedex.list.count", |page: &CatalogPage| page.count),
            &pagination.set_total_items_event(),
        );
        forward(
            &pages.map("pokedex.list.urls", |page: &CatalogPage| page.urls.clone()),
            &detail_query.fetch_event(),
        );

        let details = detail_query
            .data_cell()
            .updates()
            .filter_map("pokedex.detail.items", |data: &Option<Vec<Pokemon>>| data.clone());
        let mode = config.collection;
        items.on(&details, move |current: &Vec<Pokemon>, fetched: &Vec<Pokemon>| match mode {
            CollectionMode::Replace => fetched.clone(),
            CollectionMode::Append => append_unseen(current, fetched),
        });

        let failures = EventStream::merge(
            "pokedex.failures",
            [
                &list_query.error_cell().updates(),
                &detail_query.error_cell().updates(),
            ],
        );
        error.on(&failures, |current: &Option<String>, failure| match failure {
            Some(failure) => Some(failure.to_string()),
            None => current.clone(),
        });
        error.on(&pages, |_, _| None);
        error.on(&details, |_, _| None);

        Pokedex {
            config,
            pagination,
            list_query,
            detail_query,
            items,
            error,
            refresh,
        }
    }

    pub fn config(&self) -> PokedexConfig {
        self.config
    }

    /// Initial load: fetches the page the pagination starts on.
    ///
    /// The page never leaves `[1, max_page]`, so there is no "page 0" to
    /// advance from; refreshing the starting page is the first navigation.
    pub fn mount(&self) {
        debug!(page = self.pagination.current_page(), "mount");
        self.refresh()
    }

    /// Fetches the current page again. Doubles as the retry affordance.
    pub fn refresh(&self) {
        self.refresh.fire(())
    }

    pub fn next_page(&self) {
        self.pagination.next_page()
    }

    pub fn prev_page(&self) {
        self.pagination.prev_page()
    }

    pub fn set_page(&self, page: u32) {
        self.pagination.set_page(page)
    }

    pub fn set_limit(&self, limit: u32) {
        self.pagination.set_limit(limit)
    }

    /// Back to the construction-time state. Requests already in flight still
    /// write their outcome when they settle.
    pub fn reset(&self) {
        self.pagination.reset();
        self.list_query.reset();
        self.detail_query.reset();
        self.items.reset();
        self.error.reset();
    }

    pub fn items(&self) -> Vec<Pokemon> {
        self.items.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn is_loading(&self) -> bool {
        self.list_query.is_loading() || self.detail_query.is_loading()
    }

    /// Resolves once neither stage has a request outstanding.
    pub async fn settled(&self) {
        while self.is_loading() {
            self.list_query.settled().await;
            self.detail_query.settled().await;
        }
    }

    pub fn view_state(&self) -> ViewState {
        let pagination = self.pagination.state();
        ViewState {
            items: self.items(),
            loading: self.is_loading(),
            error: self.error(),
            current_page: pagination.current_page,
            has_next_page: pagination.has_next_page(),
            has_prev_page: pagination.has_prev_page(),
        }
    }

    pub fn loading_signal(&self) -> impl Signal<Item = bool> {
        either_pending(
            self.list_query.loading_signal(),
            self.detail_query.loading_signal(),
        )
        .dedupe()
    }

    pub fn view_signal(&self) -> impl Signal<Item = ViewState> {
        map_ref! {
            let items = self.items.signal(),
            let loading = self.loading_signal(),
            let error = self.error.signal(),
            let pagination = self.pagination.state_signal() =>
            ViewState {
                items: items.clone(),
                loading: *loading,
                error: error.clone(),
                current_page: pagination.current_page,
                has_next_page: pagination.has_next_page(),
                has_prev_page: pagination.has_prev_page(),
            }
        }
    }

    pub fn pagination(&self) -> &PaginationModel {
        &self.pagination
    }

    pub fn list_query(&self) -> &QueryModel<ListParams, CatalogPage> {
        &self.list_query
    }

    pub fn detail_query(&self) -> &QueryModel<Vec<String>, Vec<Pokemon>> {
        &self.detail_query
    }

    pub fn items_cell(&self) -> StateCell<Vec<Pokemon>> {
        self.items.clone()
    }

    pub fn error_cell(&self) -> StateCell<Option<String>> {
        self.error.clone()
    }
}

fn append_unseen(current: &[Pokemon], fetched: &[Pokemon]) -> Vec<Pokemon> {
    let shown: HashSet<u32> = current.iter().map(|pokemon| pokemon.id).collect();
    current
        .iter()
        .chain(fetched.iter().filter(|pokemon| !shown.contains(&pokemon.id)))
        .cloned()
        .collect()
}
