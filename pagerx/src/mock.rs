use crate::{CatalogClient, CatalogError, CatalogPage, Pokemon};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio::time::sleep;

const MOCK_ORIGIN: &str = "mock://pokemon";

/// A request received by [`MockCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    ListPage { limit: u32, offset: u64 },
    FetchItem { url: String },
}

#[derive(Default)]
struct MockState {
    catalog: Vec<(String, Pokemon)>,
    scripted_pages: VecDeque<Result<CatalogPage, String>>,
    list_delays: VecDeque<Duration>,
    item_delay: Option<Duration>,
    failing_urls: HashSet<String>,
    calls: Vec<CatalogCall>,
}

/// In-memory catalog for tests and demos.
///
/// Listing requests consume scripted responses first and fall back to
/// slicing the in-memory catalog. Item lookups fail for URLs marked with
/// [`fail_item`](MockCatalog::fail_item) and answer 404 for unknown URLs.
#[derive(Default)]
pub struct MockCatalog {
    state: Mutex<MockState>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding entries `1..=count`.
    pub fn with_catalog(count: u32) -> Self {
        let catalog = Self::new();
        for id in 1..=count {
            catalog.insert(Self::url_for(id), Self::pokemon(id));
        }
        catalog
    }

    pub fn url_for(id: u32) -> String {
        format!("{MOCK_ORIGIN}/{id}/")
    }

    /// The entry `with_catalog` generates for `id`.
    pub fn pokemon(id: u32) -> Pokemon {
        Pokemon {
            source_image_url: format!("mock://sprites/{id}.png"),
            name: format!("pokemon-{id}"),
            id,
            types: vec!["normal".to_string()],
        }
    }

    pub fn insert(&self, url: impl Into<String>, pokemon: Pokemon) {
        self.state.lock().catalog.push((url.into(), pokemon));
    }

    /// Queues a listing response served ahead of the catalog slice.
    pub fn mock_page(&self, page: CatalogPage) {
        self.state.lock().scripted_pages.push_back(Ok(page));
    }

    /// Queues a listing failure.
    pub fn mock_page_failure(&self, message: impl Into<String>) {
        self.state
            .lock()
            .scripted_pages
            .push_back(Err(message.into()));
    }

    /// Delays the next listing request, in call order.
    pub fn delay_next_list(&self, delay: Duration) {
        self.state.lock().list_delays.push_back(delay);
    }

    pub fn set_item_delay(&self, delay: Duration) {
        self.state.lock().item_delay = Some(delay);
    }

    pub fn fail_item(&self, url: impl Into<String>) {
        self.state.lock().failing_urls.insert(url.into());
    }

    pub fn heal_item(&self, url: &str) {
        self.state.lock().failing_urls.remove(url);
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.state.lock().calls.clone()
    }

    pub fn list_calls(&self) -> Vec<(u32, u64)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                CatalogCall::ListPage { limit, offset } => Some((*limit, *offset)),
                CatalogCall::FetchItem { .. } => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn list_page(&self, limit: u32, offset: u64) -> Result<CatalogPage, CatalogError> {
        let (delay, scripted) = {
            let mut state = self.state.lock();
            state.calls.push(CatalogCall::ListPage { limit, offset });
            (state.list_delays.pop_front(), state.scripted_pages.pop_front())
        };
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        match scripted {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(CatalogError::Transport {
                url: MOCK_ORIGIN.to_string(),
                message,
            }),
            None => {
                let state = self.state.lock();
                let start = usize::try_from(offset).unwrap_or(usize::MAX);
                let urls = state
                    .catalog
                    .iter()
                    .skip(start)
                    .take(limit as usize)
                    .map(|(url, _)| url.clone())
                    .collect();
                Ok(CatalogPage {
                    urls,
                    count: u32::try_from(state.catalog.len()).unwrap_or(u32::MAX),
                })
            }
        }
    }

    async fn fetch_item(&self, url: &str) -> Result<Pokemon, CatalogError> {
        let delay = {
            let mut state = self.state.lock();
            state.calls.push(CatalogCall::FetchItem {
                url: url.to_string(),
            });
            state.item_delay
        };
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        let state = self.state.lock();
        if state.failing_urls.contains(url) {
            return Err(CatalogError::Transport {
                url: url.to_string(),
                message: "connection reset".to_string(),
            });
        }
        state
            .catalog
            .iter()
            .find(|(known, _)| known == url)
            .map(|(_, pokemon)| pokemon.clone())
            .ok_or_else(|| CatalogError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
