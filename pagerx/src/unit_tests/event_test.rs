use crate::unit_tests::Recorder;
use crate::EventStream;

#[test]
fn test_fire_notifies_in_registration_order() {
    let event: EventStream<u32> = EventStream::new("numbers");
    let recorder = Recorder::default();

    for tag in ["first", "second", "third"] {
        let recorder = recorder.clone();
        event.watch(move |value| recorder.push(format!("{tag}:{value}")));
    }
    event.fire(7);

    assert_eq!(recorder.seen(), vec!["first:7", "second:7", "third:7"]);
}

#[test]
fn test_fire_without_subscribers_is_dropped() {
    let event: EventStream<u32> = EventStream::new("lonely");
    event.fire(1);

    let recorder = Recorder::default();
    let sink = recorder.clone();
    event.watch(move |value| sink.push(*value));
    event.fire(2);

    assert_eq!(recorder.seen(), vec![2]);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let event: EventStream<&'static str> = EventStream::new("ticks");
    let recorder = Recorder::default();
    let sink = recorder.clone();
    let subscription = event.watch(move |value| sink.push(*value));

    event.fire("a");
    subscription.unsubscribe();
    event.fire("b");

    assert_eq!(recorder.seen(), vec!["a"]);
    assert_eq!(event.subscriber_count(), 0);
}

#[test]
fn test_subscriber_added_during_fire_sees_only_later_payloads() {
    let event: EventStream<u32> = EventStream::new("growing");
    let recorder = Recorder::default();
    {
        let event_handle = event.clone();
        let recorder = recorder.clone();
        event.watch(move |value| {
            if *value == 1 {
                let sink = recorder.clone();
                event_handle.watch(move |late| sink.push(*late));
            }
        });
    }

    event.fire(1);
    event.fire(2);

    assert_eq!(recorder.seen(), vec![2]);
}

#[test]
fn test_reentrant_fire_does_not_deadlock() {
    let event: EventStream<u32> = EventStream::new("countdown");
    let recorder = Recorder::default();
    {
        let event_handle = event.clone();
        let recorder = recorder.clone();
        event.watch(move |value| {
            recorder.push(*value);
            if *value > 0 {
                event_handle.fire(value - 1);
            }
        });
    }

    event.fire(3);

    assert_eq!(recorder.seen(), vec![3, 2, 1, 0]);
}

#[test]
fn test_merge_fires_for_every_source() {
    let next: EventStream<()> = EventStream::new("next");
    let prev: EventStream<()> = EventStream::new("prev");
    let jump: EventStream<u32> = EventStream::new("jump");
    let merged = EventStream::merge(
        "navigate",
        [&next, &prev, &jump.map("jump.unit", |_| ())],
    );

    let recorder = Recorder::default();
    let sink = recorder.clone();
    merged.watch(move |_| sink.push(()));

    next.fire(());
    jump.fire(4);
    prev.fire(());

    assert_eq!(recorder.seen().len(), 3);
    assert_eq!(merged.name(), "navigate");
}

#[test]
fn test_map_filter_and_filter_map() {
    let source: EventStream<i32> = EventStream::new("source");
    let doubled = source.map("doubled", |value| value * 2);
    let positive = source.filter("positive", |value| *value > 0);
    let halves = source.filter_map("halves", |value| (value % 2 == 0).then(|| value / 2));

    let recorder = Recorder::default();
    {
        let sink = recorder.clone();
        doubled.watch(move |value| sink.push(format!("doubled:{value}")));
    }
    {
        let sink = recorder.clone();
        positive.watch(move |value| sink.push(format!("positive:{value}")));
    }
    {
        let sink = recorder.clone();
        halves.watch(move |value| sink.push(format!("half:{value}")));
    }

    source.fire(-4);
    source.fire(3);

    assert_eq!(
        recorder.seen(),
        vec!["doubled:-8", "half:-2", "doubled:6", "positive:3"]
    );
}
