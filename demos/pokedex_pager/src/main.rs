use crate::poke_api::{PokeApiClient, DEFAULT_BASE_URL};
use crate::tracing_setup::tracing_init;
use crate::view::show_view;
use clap::Parser;
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use pagerx::{CollectionMode, Pokedex, PokedexConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod poke_api;
mod tracing_setup;
mod view;

/// Pages through the PokeAPI catalog and logs every rendered frame.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Root of the PokeAPI REST endpoints.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Items per page. Overrides the config file.
    #[arg(long)]
    limit: Option<u32>,

    /// How many times to press "next" after the initial load.
    #[arg(long, default_value_t = 2)]
    pages: u32,

    /// Append each page to the list instead of replacing it.
    #[arg(long)]
    append: bool,

    /// Per-request timeout.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// JSON file holding a `PokedexConfig`.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn pokedex_config(&self) -> Result<PokedexConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => PokedexConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => PokedexConfig::default(),
        };
        if let Some(limit) = self.limit {
            config.pagination.initial_limit = limit;
        }
        if self.append {
            config.collection = CollectionMode::Append;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_init()?;
    let args = Args::parse();

    let config = args.pokedex_config()?;
    let client = PokeApiClient::new(&args.base_url, Duration::from_secs(args.timeout_secs))?;
    let pokedex = Pokedex::new(Arc::new(client), config);
    info!(base_url = %args.base_url, ?config, "pokedex ready");

    let render = tokio::spawn(
        pokedex
            .view_signal()
            .dedupe_cloned()
            .to_stream()
            .for_each(|view| async move {
                if !view.loading {
                    show_view(&view);
                }
            }),
    );

    pokedex.mount();
    pokedex.settled().await;

    for _ in 0..args.pages {
        if !pokedex.pagination().has_next_page() {
            warn!("no next page, stopping");
            break;
        }
        pokedex.next_page();
        pokedex.settled().await;
    }

    if pokedex.pagination().has_prev_page() {
        info!("going back one page");
        pokedex.prev_page();
        pokedex.settled().await;
    }

    render.abort();

    let view = pokedex.view_state();
    info!(
        page = view.current_page,
        items = view.items.len(),
        total = ?pokedex.pagination().total_items(),
        "final view"
    );
    show_view(&view);
    Ok(())
}
