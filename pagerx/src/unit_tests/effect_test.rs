use crate::unit_tests::{delayed, Recorder};
use crate::{either_pending, AsyncError, Effect};
use futures::StreamExt;
use futures_signals::signal::{always, SignalExt};
use std::pin::pin;

#[tokio::test]
async fn test_run_success_publishes_and_settles() {
    let effect: Effect<u32, u32> = Effect::new("double", |n: u32| delayed(5, n * 2));
    let recorder = Recorder::default();
    {
        let sink = recorder.clone();
        effect.done_data().watch(move |value| sink.push(*value));
    }

    let handle = effect.run(21);
    assert!(effect.is_pending());
    assert_eq!(effect.in_flight(), 1);

    assert_eq!(handle.await.unwrap(), Ok(42));
    assert!(!effect.is_pending());
    assert_eq!(recorder.seen(), vec![42]);
    assert_eq!(effect.last_success().get(), Some(42));
    assert_eq!(effect.last_failure().get(), None);
}

#[tokio::test]
async fn test_run_failure_keeps_message() {
    let effect: Effect<(), String> = Effect::new("list", |_: ()| async {
        Err::<String, _>("502 Bad Gateway")
    });
    let recorder = Recorder::default();
    {
        let sink = recorder.clone();
        effect.fail_data().watch(move |error| sink.push(error.clone()));
    }

    let outcome = effect.run(()).await.unwrap();

    assert_eq!(outcome, Err(AsyncError::message("502 Bad Gateway")));
    assert_eq!(recorder.seen(), vec![AsyncError::message("502 Bad Gateway")]);
    assert_eq!(
        effect.last_failure().get(),
        Some(AsyncError::message("502 Bad Gateway"))
    );
    assert!(!effect.is_pending());
}

#[tokio::test]
async fn test_run_none_fails_with_none() {
    let effect: Effect<u32, u32> = Effect::new("lookup", |_: u32| async { None::<u32> });
    assert_eq!(effect.run(1).await.unwrap(), Err(AsyncError::None));
}

#[tokio::test]
async fn test_overlapping_runs_stay_pending_until_all_settle() {
    let effect: Effect<u64, u64> = Effect::new("sleep", |millis: u64| delayed(millis, millis));

    let slow = effect.run(60);
    let fast = effect.run(5);
    assert_eq!(effect.in_flight(), 2);

    assert_eq!(fast.await.unwrap(), Ok(5));
    assert!(effect.is_pending());
    assert_eq!(effect.in_flight(), 1);

    assert_eq!(slow.await.unwrap(), Ok(60));
    assert!(!effect.is_pending());
    // Last settled wins.
    assert_eq!(effect.last_success().get(), Some(60));
}

#[tokio::test]
async fn test_pending_is_true_when_outcome_is_published() {
    let effect: Effect<u32, u32> = Effect::new("echo", |n: u32| delayed(1, n));
    let recorder = Recorder::default();
    {
        let sink = recorder.clone();
        let effect_handle = effect.clone();
        effect
            .done_data()
            .watch(move |_| sink.push(effect_handle.is_pending()));
    }

    effect.run(1).await.unwrap().unwrap();

    assert_eq!(recorder.seen(), vec![true]);
    assert!(!effect.is_pending());
}

#[tokio::test]
async fn test_panic_is_reported_as_failure() {
    let effect: Effect<u32, u32> = Effect::new("fragile", |n: u32| async move {
        assert!(n < 10, "input too large");
        n
    });

    let outcome = effect.run(99).await.unwrap();

    assert!(matches!(outcome, Err(AsyncError::Panicked(_))));
    assert!(!effect.is_pending());
    assert!(effect.last_failure().get().is_some());
}

#[tokio::test]
async fn test_settled_waits_for_every_run() {
    let effect: Effect<u64, u64> = Effect::new("sleep", |millis: u64| delayed(millis, millis));
    drop(effect.run(20));
    drop(effect.run(10));

    effect.settled().await;

    assert_eq!(effect.in_flight(), 0);
    assert_eq!(effect.last_success().get(), Some(20));
}

#[tokio::test]
async fn test_either_pending_combines_two_signals() {
    let mut idle = pin!(either_pending(always(false), always(false)).to_stream());
    assert_eq!(idle.next().await, Some(false));

    let effect: Effect<u64, u64> = Effect::new("sleep", |millis: u64| delayed(millis, millis));
    let handle = effect.run(5);
    let mut busy = pin!(either_pending(effect.pending_signal(), always(false)).to_stream());
    assert_eq!(busy.next().await, Some(true));

    handle.await.unwrap().unwrap();
    let mut done = pin!(either_pending(effect.pending_signal(), always(false)).to_stream());
    assert_eq!(done.next().await, Some(false));
}
