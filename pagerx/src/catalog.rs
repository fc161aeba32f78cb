use async_trait::async_trait;
use futures::future::try_join_all;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One catalog entry as displayed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pokemon {
    pub source_image_url: String,
    pub name: String,
    pub id: u32,
    pub types: Vec<String>,
}

impl Display for Pokemon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:04} {} [{}]", self.id, self.name, self.types.join("/"))
    }
}

/// One page of the catalog listing: item URLs plus the catalog-wide count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogPage {
    pub urls: Vec<String>,
    pub count: u32,
}

/// Window requested from the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListParams {
    pub limit: u32,
    pub offset: u64,
}

/// Failures surfaced by a [`CatalogClient`].
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed payload from {url}: {message}")]
    Decode { url: String, message: String },
}

/// The remote catalog as seen by the core: a paged listing and per-item
/// detail lookups.
#[async_trait]
pub trait CatalogClient: Send + Sync + 'static {
    async fn list_page(&self, limit: u32, offset: u64) -> Result<CatalogPage, CatalogError>;

    async fn fetch_item(&self, url: &str) -> Result<Pokemon, CatalogError>;
}

/// Fetches every URL concurrently and keeps the input order. Fails with the
/// first error if any lookup fails.
pub async fn fetch_items(
    client: Arc<dyn CatalogClient>,
    urls: Vec<String>,
) -> Result<Vec<Pokemon>, CatalogError> {
    try_join_all(urls.iter().map(|url| client.fetch_item(url))).await
}
