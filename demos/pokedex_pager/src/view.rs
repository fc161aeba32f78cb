use pagerx::ViewState;
use tracing::{debug, info, warn};

pub fn show_view(view: &ViewState) {
    info!("=================================");
    info!(
        "| Page {}{}{}",
        view.current_page,
        if view.has_prev_page { "  [< prev]" } else { "" },
        if view.has_next_page { "  [next >]" } else { "" },
    );
    if let Some(error) = &view.error {
        warn!("| Error: {error} (refresh to retry)");
    }
    if view.items.is_empty() {
        debug!("| No pokemon on this page.");
    }
    for pokemon in &view.items {
        debug!("| {pokemon}  {}", pokemon.source_image_url);
    }
}
