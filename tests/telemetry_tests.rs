mod common;

use std::collections::VecDeque;

use mascot::kernel::event::{EngineSignal, Event, Page, SpeechSource};
use mascot::kernel::hints::HintKind;
use mascot::kernel::speech::arbiter::{SpeechDecision, SuppressReason};
use mascot::kernel::telemetry::event::{DialogueTransitionKind, TelemetryEvent, UtteranceEventKind};
use mascot::kernel::telemetry::metrics::compute_snapshot;
use mascot::kernel::telemetry::recorder::TelemetryRecorder;
use mascot::kernel::time::Millis;

#[test]
fn test_snapshot_is_pure_aggregation() {
    let mut events = VecDeque::new();
    events.push_back(TelemetryEvent::SpeechSuppressed {
        source: SpeechSource::Page,
        reason: SuppressReason::UserInteracting,
    });
    events.push_back(TelemetryEvent::HintShown { page: Page::Home, kind: HintKind::Idle });
    events.push_back(TelemetryEvent::DialogueTransition { kind: DialogueTransitionKind::Opened });
    events.push_back(TelemetryEvent::DialogueTransition { kind: DialogueTransitionKind::Moved });

    let first = compute_snapshot(&events);
    let second = compute_snapshot(&events);
    assert_eq!(first, second, "Same input, same snapshot");

    assert_eq!(first.speech_stats.suppressed_interaction, 1);
    assert!((first.speech_stats.suppression_ratio - 1.0).abs() < 1e-9);
    assert_eq!(first.hint_stats.idle, 1);
    assert_eq!(first.dialogue_stats.opened, 1);
    assert_eq!(first.dialogue_stats.moves, 1);
}

#[test]
fn test_recorder_evicts_oldest() {
    let mut recorder = TelemetryRecorder::with_capacity(2);
    for enabled in [true, false, true] {
        recorder.record(TelemetryEvent::VoiceToggled { enabled });
    }

    assert_eq!(recorder.events().len(), 2);
    assert_eq!(recorder.dropped(), 1);
    assert_eq!(recorder.events()[0], TelemetryEvent::VoiceToggled { enabled: false });

    recorder.clear();
    assert!(recorder.events().is_empty());
    assert_eq!(recorder.dropped(), 0);
}

#[test]
fn test_reactor_records_utterance_lifecycle() {
    let (mut reactor, _log) = common::reactor();

    let SpeechDecision::Accepted(request) = reactor.request_speech("Hi", SpeechSource::Manual, Millis(0)) else {
        panic!("should be accepted");
    };
    reactor.step(vec![], Millis(300));
    reactor.step(vec![Event::Engine(EngineSignal::Started(request.id))], Millis(310));
    reactor.step(vec![Event::Engine(EngineSignal::Ended(request.id))], Millis(900));

    let kinds: Vec<UtteranceEventKind> = reactor
        .telemetry
        .events()
        .iter()
        .filter_map(|e| match e {
            TelemetryEvent::UtteranceLifecycle { id, event } if *id == request.id => Some(*event),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![UtteranceEventKind::Dispatched, UtteranceEventKind::Started, UtteranceEventKind::Ended]
    );
}

#[test]
fn test_preempted_utterance_counts_as_canceled() {
    let (mut reactor, _log) = common::reactor();

    reactor.request_speech("First", SpeechSource::Manual, Millis(0));
    reactor.step(vec![], Millis(300));
    reactor.request_speech("Second", SpeechSource::Planet, Millis(1000));

    let snap = reactor.telemetry.snapshot();
    assert_eq!(snap.speech_stats.dispatched, 1);
    assert_eq!(snap.speech_stats.canceled, 1, "A newer request cuts the in-flight one");
}

#[test]
fn test_session_summary() {
    let (mut reactor, _log) = common::reactor();
    reactor.step(vec![Event::RouteChanged("/".to_string())], Millis(0));
    reactor.step(vec![], Millis(700));
    reactor.request_speech("Hello", SpeechSource::Planet, Millis(800));
    reactor.request_speech("Hello", SpeechSource::Planet, Millis(900));
    reactor.telemetry.record(TelemetryEvent::DialogueTransition { kind: DialogueTransitionKind::Navigated });

    let summary = reactor.telemetry.summarize(60_000);
    assert_eq!(summary.duration_ms, 60_000);
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.played, 0);
    assert!((summary.suppression_ratio - 0.5).abs() < 1e-9);
    assert_eq!(summary.hints_shown, 1);
    assert_eq!(summary.dialogue_steps, 1);
    assert_eq!(summary.events_dropped, 0);
}
