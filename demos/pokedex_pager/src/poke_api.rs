use async_trait::async_trait;
use pagerx::{CatalogClient, CatalogError, CatalogPage, Pokemon};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// [`CatalogClient`] backed by the public PokeAPI.
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| CatalogError::Transport {
                url: base_url.clone(),
                message: error.to_string(),
            })?;
        Ok(Self { http, base_url })
    }

    async fn get_text(&self, url: &str) -> Result<String, CatalogError> {
        debug!(%url, "GET");
        let transport = |error: reqwest::Error| CatalogError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        };
        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}

#[async_trait]
impl CatalogClient for PokeApiClient {
    async fn list_page(&self, limit: u32, offset: u64) -> Result<CatalogPage, CatalogError> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base_url);
        let body = self.get_text(&url).await?;
        parse_list_page(&url, &body)
    }

    async fn fetch_item(&self, url: &str) -> Result<Pokemon, CatalogError> {
        let body = self.get_text(url).await?;
        parse_pokemon(url, &body)
    }
}

#[derive(Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Deserialize)]
struct ListResponse {
    count: u32,
    results: Vec<NamedResource>,
}

#[derive(Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

#[derive(Deserialize)]
struct TypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    sprites: Sprites,
    types: Vec<TypeSlot>,
}

fn decode<'a, T: Deserialize<'a>>(url: &str, body: &'a str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|error| CatalogError::Decode {
        url: url.to_string(),
        message: error.to_string(),
    })
}

pub fn parse_list_page(url: &str, body: &str) -> Result<CatalogPage, CatalogError> {
    let response: ListResponse = decode(url, body)?;
    Ok(CatalogPage {
        urls: response.results.into_iter().map(|entry| entry.url).collect(),
        count: response.count,
    })
}

pub fn parse_pokemon(url: &str, body: &str) -> Result<Pokemon, CatalogError> {
    let mut response: PokemonResponse = decode(url, body)?;
    response.types.sort_by_key(|slot| slot.slot);
    Ok(Pokemon {
        source_image_url: response.sprites.front_default.unwrap_or_default(),
        name: response.name,
        id: response.id,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.kind.name)
            .collect(),
    })
}
