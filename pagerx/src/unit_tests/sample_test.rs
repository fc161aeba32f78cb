use crate::unit_tests::Recorder;
use crate::{forward, sample, sample_filter, EventStream, StateCell};

#[test]
fn test_sample_reads_source_when_clock_fires() {
    let clock: EventStream<u32> = EventStream::new("clock");
    let source = StateCell::new("limit", 20u32);
    let target: EventStream<(u32, u32)> = EventStream::new("target");
    let recorder = Recorder::default();
    {
        let sink = recorder.clone();
        target.watch(move |pair| sink.push(*pair));
    }
    sample(&clock, &source, |limit, page| (*limit, *page), &target);

    clock.fire(1);
    source.set(50);
    clock.fire(2);

    assert_eq!(recorder.seen(), vec![(20, 1), (50, 2)]);
}

#[test]
fn test_sample_into_cell() {
    let clock: EventStream<()> = EventStream::new("clock");
    let source = StateCell::new("page", 3u32);
    let offset = StateCell::new("offset", 0u32);
    sample(&clock, &source, |page, _| (page - 1) * 20, &offset);

    clock.fire(());

    assert_eq!(offset.get(), 40);
}

#[test]
fn test_sample_filter_skips_none() {
    let clock: EventStream<i32> = EventStream::new("clock");
    let source = StateCell::new("base", 10i32);
    let target = StateCell::new("target", 0i32);
    sample_filter(
        &clock,
        &source,
        |base, delta| (*delta > 0).then(|| base + delta),
        &target,
    );

    clock.fire(-5);
    assert_eq!(target.get(), 0);
    assert_eq!(target.version(), 0);

    clock.fire(5);
    assert_eq!(target.get(), 15);
}

#[test]
fn test_rules_on_one_clock_see_the_same_state() {
    let clock: EventStream<()> = EventStream::new("clock");
    let source = StateCell::new("page", 1u32);
    let first = StateCell::new("first", 0u32);
    let second = StateCell::new("second", 0u32);
    sample(&clock, &source, |page, _| *page, &first);
    sample(&clock, &source, |page, _| *page, &second);

    clock.fire(());

    assert_eq!(first.get(), second.get());
}

#[test]
fn test_forward_passes_payload_through() {
    let clock: EventStream<String> = EventStream::new("names");
    let latest = StateCell::new("latest", String::new());
    forward(&clock, &latest);

    clock.fire("charmander".to_string());

    assert_eq!(latest.get(), "charmander");
}
