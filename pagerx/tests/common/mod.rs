#![allow(dead_code)]

use pagerx::mock::MockCatalog;
use pagerx::{Pokedex, PokedexConfig};
use std::sync::Arc;
use std::time::Duration;

pub fn pokedex_with(catalog: MockCatalog, config: PokedexConfig) -> (Pokedex, Arc<MockCatalog>) {
    let catalog = Arc::new(catalog);
    let pokedex = Pokedex::new(catalog.clone(), config);
    (pokedex, catalog)
}

pub fn pokedex(catalog: MockCatalog) -> (Pokedex, Arc<MockCatalog>) {
    pokedex_with(catalog, PokedexConfig::default())
}

/// Waits for both fetch stages to finish, failing the test after a second.
pub async fn settle(pokedex: &Pokedex) {
    tokio::time::timeout(Duration::from_secs(1), pokedex.settled())
        .await
        .expect("pokedex did not settle");
}

pub fn ids(pokedex: &Pokedex) -> Vec<u32> {
    pokedex.items().iter().map(|pokemon| pokemon.id).collect()
}
