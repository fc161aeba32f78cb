use crate::common::{ids, pokedex, settle};
use pagerx::mock::MockCatalog;
use std::time::Duration;

mod common;

// Fetches are neither cancelled nor fenced: a slow response for an older
// navigation overwrites a faster, newer one.
#[tokio::test]
async fn test_slow_older_page_overwrites_newer_page() {
    let catalog = MockCatalog::with_catalog(45);
    let (pokedex, catalog) = pokedex(catalog);
    pokedex.mount();
    settle(&pokedex).await;

    catalog.delay_next_list(Duration::from_millis(80));
    catalog.delay_next_list(Duration::from_millis(5));
    pokedex.next_page();
    pokedex.next_page();
    assert_eq!(pokedex.pagination().current_page(), 3);

    settle(&pokedex).await;

    assert_eq!(catalog.list_calls(), vec![(20, 0), (20, 20), (20, 40)]);
    // Page 2 settled last, so its items win while the pagination says 3.
    assert_eq!(ids(&pokedex), (21..=40).collect::<Vec<_>>());
    assert_eq!(pokedex.pagination().current_page(), 3);
}

#[tokio::test]
async fn test_rapid_navigation_issues_every_request() {
    let (pokedex, catalog) = pokedex(MockCatalog::with_catalog(100));
    pokedex.mount();
    pokedex.next_page();
    pokedex.next_page();
    pokedex.prev_page();

    settle(&pokedex).await;

    assert_eq!(
        catalog.list_calls(),
        vec![(20, 0), (20, 20), (20, 40), (20, 20)]
    );
    assert!(!pokedex.is_loading());
}
