use crate::{PagerxStreamExt, StateCell};
use futures::stream::{self, FusedStream};
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use std::time::Duration;

#[tokio::test]
async fn test_stop_if_includes_the_stopping_item() {
    let values: Vec<u32> = stream::iter(1..=10).stop_if(|value| *value == 4).collect().await;
    assert_eq!(values, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_stop_if_ends_with_the_source() {
    let values: Vec<u32> = stream::iter(1..=3).stop_if(|_| false).collect().await;
    assert_eq!(values, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_stop_if_is_terminated_after_stopping() {
    let mut values = stream::iter(1..=3).stop_if(|value| *value == 1);
    assert!(!values.is_terminated());
    assert_eq!(values.next().await, Some(1));
    assert!(values.is_terminated());
    assert_eq!(values.next().await, None);
}

#[tokio::test]
async fn test_stop_if_follows_a_cell() {
    let progress = StateCell::new("progress", 0u32);
    let writer = progress.clone();
    tokio::spawn(async move {
        for step in 1..=5 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            writer.set(step);
        }
    });

    let seen: Vec<u32> = progress
        .signal()
        .to_stream()
        .stop_if(|step| *step >= 5)
        .collect()
        .await;

    assert_eq!(seen.first(), Some(&0));
    assert_eq!(seen.last(), Some(&5));
}
