mod common;

use std::sync::Arc;

use common::{reactor, reactor_with, sample_catalog};
use mascot::dialogue::content::PageHints;
use mascot::kernel::event::{Event, InteractionKind, Page, SpeechSource, Viewport};
use mascot::kernel::hints::{normalize_hint, HintCatalog, HintKind, HintLedger};
use mascot::kernel::scheduler::{SideEffect, TimerKind, TimerRegistry};
use mascot::kernel::time::Millis;
use mascot::storage::{MemoryFlagStore, PersistedFlags};
use mascot::{MascotConfig, Reactor};

fn shown(effects: &[SideEffect]) -> Vec<(HintKind, String)> {
    effects
        .iter()
        .filter_map(|e| match e {
            SideEffect::ShowHint { kind, text } => Some((*kind, text.clone())),
            _ => None,
        })
        .collect()
}

fn go(path: &str) -> Vec<Event> {
    vec![Event::RouteChanged(path.to_string())]
}

#[test]
fn test_entry_idle_recovery_cadence_desktop() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));

    assert!(shown(&reactor.step(vec![], Millis(699))).is_empty(), "Entry hint waits 700ms");

    let effects = reactor.step(vec![], Millis(700));
    assert_eq!(shown(&effects), vec![(HintKind::Entry, "Explore the planets to begin.".to_string())]);
    assert_eq!(reactor.visible_hint(), Some("Explore the planets to begin."));

    let effects = reactor.step(vec![], Millis(4700));
    assert!(effects.contains(&SideEffect::ClearHint), "Hint auto-dismisses after 4000ms");
    assert!(reactor.visible_hint().is_none());

    assert!(shown(&reactor.step(vec![], Millis(10_999))).is_empty());
    let effects = reactor.step(vec![], Millis(11_000));
    assert_eq!(shown(&effects), vec![(HintKind::Idle, "Tap a planet to continue.".to_string())]);

    let effects = reactor.step(vec![], Millis(18_000));
    assert_eq!(
        shown(&effects),
        vec![(HintKind::Recovery, "Double-tap a planet to navigate.".to_string())]
    );

    let snap = reactor.telemetry.snapshot();
    assert_eq!((snap.hint_stats.entry, snap.hint_stats.idle, snap.hint_stats.recovery), (1, 1, 1));
}

#[test]
fn test_late_step_shows_only_newest_hint() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));

    let effects = reactor.step(vec![], Millis(20_000));
    assert_eq!(
        shown(&effects),
        vec![(HintKind::Recovery, "Double-tap a planet to navigate.".to_string())],
        "Overdue entry and idle tiers never flash"
    );
    assert_eq!(reactor.visible_hint(), Some("Double-tap a planet to navigate."));

    let ledger = reactor.hint_ledger();
    assert!(!ledger.has_shown(Page::Home, HintKind::Entry));
    assert!(!ledger.has_shown(Page::Home, HintKind::Idle));
    assert!(ledger.has_shown(Page::Home, HintKind::Recovery));

    let snap = reactor.telemetry.snapshot();
    assert_eq!((snap.hint_stats.entry, snap.hint_stats.idle, snap.hint_stats.recovery), (0, 0, 1));

    let effects = reactor.step(vec![], Millis(24_000));
    assert!(effects.contains(&SideEffect::ClearHint), "Dismissal is still scheduled");
}

#[test]
fn test_timer_kinds_map_to_hint_tiers() {
    assert_eq!(TimerKind::EntryHint.hint_kind(), Some(HintKind::Entry));
    assert_eq!(TimerKind::IdleHint.hint_kind(), Some(HintKind::Idle));
    assert_eq!(TimerKind::RecoveryHint.hint_kind(), Some(HintKind::Recovery));
    assert_eq!(TimerKind::HintDismiss.hint_kind(), None);
    assert_eq!(TimerKind::SpeakDebounce.hint_kind(), None);
}

#[test]
fn test_interaction_restarts_dwell_timers() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));
    reactor.step(vec![], Millis(700));

    reactor.step(vec![Event::Interaction(InteractionKind::Planet)], Millis(10_000));
    assert_eq!(reactor.timers().deadline(TimerKind::IdleHint), Some(Millis(21_000)));
    assert_eq!(reactor.timers().deadline(TimerKind::RecoveryHint), Some(Millis(28_000)));

    assert!(shown(&reactor.step(vec![], Millis(11_000))).is_empty(), "Idle timer was reset");
    let effects = reactor.step(vec![], Millis(21_000));
    assert_eq!(shown(&effects).len(), 1);
    assert_eq!(shown(&effects)[0].0, HintKind::Idle);
}

#[test]
fn test_interaction_clears_visible_hint() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));
    reactor.step(vec![], Millis(700));
    assert!(reactor.visible_hint().is_some());

    let effects = reactor.step(vec![Event::Interaction(InteractionKind::Skills)], Millis(1000));
    assert!(effects.contains(&SideEffect::ClearHint));
    assert!(!reactor.timers().is_armed(TimerKind::HintDismiss));
}

#[test]
fn test_each_hint_shown_once_per_page() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));
    reactor.step(vec![], Millis(700));

    reactor.step(go("/skills"), Millis(2000));
    let effects = reactor.step(vec![], Millis(2700));
    assert_eq!(shown(&effects), vec![(HintKind::Entry, "Browse skills and learning paths.".to_string())]);

    reactor.step(go("/"), Millis(5000));
    assert!(
        !reactor.timers().is_armed(TimerKind::EntryHint),
        "Home entry hint already shown this session"
    );
    assert!(shown(&reactor.step(vec![], Millis(5700))).is_empty());
    assert!(reactor.hint_ledger().has_shown(Page::Home, HintKind::Entry));
    assert!(reactor.hint_ledger().has_shown(Page::Skills, HintKind::Entry));
}

#[test]
fn test_unknown_route_ignored() {
    let (mut reactor, _log) = reactor();
    let effects = reactor.step(go("/nowhere"), Millis(0));

    assert!(effects.is_empty());
    assert!(reactor.current_page().is_none());
    assert!(reactor.timers().is_empty(), "No page, no hints");
}

#[test]
fn test_open_guide_suppresses_hints() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));
    reactor.step(vec![Event::SetGuideOpen(true)], Millis(100));

    assert!(!reactor.timers().is_armed(TimerKind::EntryHint));
    assert!(!reactor.timers().is_armed(TimerKind::IdleHint));
    assert!(shown(&reactor.step(vec![], Millis(20_000))).is_empty());

    reactor.step(vec![Event::SetGuideOpen(false)], Millis(21_000));
    assert_eq!(reactor.timers().deadline(TimerKind::EntryHint), Some(Millis(21_700)));
    let effects = reactor.step(vec![], Millis(21_700));
    assert_eq!(shown(&effects)[0].0, HintKind::Entry);
}

#[test]
fn test_mobile_uses_shorter_delays_and_truncates() {
    let mut catalog = sample_catalog();
    catalog.hints.insert(
        Page::Home,
        PageHints {
            idle: Some("one two three four five six seven eight nine ten".to_string()),
            recovery: None,
        },
    );
    let mut reactor = Reactor::new(
        MascotConfig::default(),
        Arc::new(catalog),
        None,
        Box::new(MemoryFlagStore::new()),
        Viewport::Mobile,
    );

    reactor.step(go("/"), Millis(0));
    assert_eq!(reactor.timers().deadline(TimerKind::IdleHint), Some(Millis(9000)));
    assert_eq!(reactor.timers().deadline(TimerKind::RecoveryHint), Some(Millis(16_000)));

    reactor.step(vec![], Millis(700));
    let effects = reactor.step(vec![], Millis(9000));
    assert_eq!(
        shown(&effects),
        vec![(HintKind::Idle, "one two three four five six seven eight".to_string())]
    );
}

#[test]
fn test_viewport_change_rearms_dwell() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));
    reactor.step(vec![Event::ViewportChanged(Viewport::Mobile)], Millis(1000));

    assert_eq!(reactor.timers().deadline(TimerKind::IdleHint), Some(Millis(10_000)));
}

#[test]
fn test_boot_restores_last_page() {
    let flags = PersistedFlags {
        voice_enabled: Some(false),
        last_visited_page: Some(Page::Projects),
        ..Default::default()
    };
    let mut reactor = Reactor::new(
        MascotConfig::default(),
        Arc::new(sample_catalog()),
        None,
        Box::new(MemoryFlagStore::with_flags(flags)),
        Viewport::Desktop,
    );

    let effects = reactor.boot(Millis(0));
    assert_eq!(effects, vec![SideEffect::VoiceChanged(false)], "Stored flag beats the viewport default");
    assert_eq!(reactor.current_page(), Some(Page::Projects));

    let effects = reactor.step(vec![], Millis(700));
    assert_eq!(shown(&effects), vec![(HintKind::Entry, "Open a project to learn more.".to_string())]);
}

#[test]
fn test_shutdown_disarms_everything() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));
    reactor.request_speech("Bye soon", SpeechSource::Planet, Millis(100));
    reactor.step(vec![], Millis(700));
    assert!(!reactor.timers().is_empty());

    let effects = reactor.shutdown();
    assert!(effects.contains(&SideEffect::ClearHint));
    assert!(reactor.timers().is_empty(), "No timer may survive teardown");
    assert!(reactor.pending_utterance().is_none());
    assert!(reactor.is_shut_down());

    assert!(reactor.step(vec![], Millis(60_000)).is_empty(), "Nothing fires after shutdown");
    assert!(reactor.shutdown().is_empty(), "Shutdown is idempotent");
}

// === Guide panel ===

#[test]
fn test_mascot_click_opens_guide_for_active_planet() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));

    let effects = reactor.step(vec![Event::MascotClicked], Millis(100));
    assert!(reactor.guide_open());
    let entries = effects
        .iter()
        .find_map(|e| match e {
            SideEffect::GuideChanged { open: true, entries } => Some(entries.clone()),
            _ => None,
        })
        .expect("guide should open");
    assert_eq!(entries.len(), 3, "Desktop lists three entries");
    assert_eq!(entries[0].label, "Skills");
}

#[test]
fn test_mobile_guide_lists_two_entries() {
    let (mut reactor, _log) = reactor_with(Viewport::Mobile);
    reactor.step(go("/"), Millis(0));
    reactor.step(vec![Event::ToggleGuide], Millis(100));

    assert_eq!(reactor.guide_entries().len(), 2);
}

#[test]
fn test_guide_selection_speaks_and_navigates() {
    let (mut reactor, log) = reactor();
    reactor.step(go("/"), Millis(0));
    reactor.step(vec![Event::MascotClicked], Millis(100));

    let effects = reactor.step(vec![Event::GuideSelected(1)], Millis(200));
    assert!(effects.contains(&SideEffect::Navigate("/projects".to_string())));
    assert!(!reactor.guide_open(), "Guide closes after a pick");
    assert_eq!(
        reactor.arbiter.current().map(|r| r.text.as_str()),
        Some("To the projects."),
        "Navigation speech is exempt from the interaction grace"
    );

    reactor.step(vec![], Millis(500));
    assert_eq!(common::spoken_count(&log), 1);
}

#[test]
fn test_guide_selection_out_of_range_ignored() {
    let (mut reactor, _log) = reactor();
    reactor.step(go("/"), Millis(0));
    reactor.step(vec![Event::MascotClicked], Millis(100));

    let effects = reactor.step(vec![Event::GuideSelected(3)], Millis(200));
    assert!(effects.iter().all(|e| !matches!(e, SideEffect::Navigate(_))));
    assert!(reactor.guide_open());
}

// === Building blocks ===

#[test]
fn test_timer_registry_orders_and_replaces() {
    let mut timers = TimerRegistry::new();
    timers.arm(TimerKind::IdleHint, Millis(500));
    timers.arm(TimerKind::EntryHint, Millis(200));
    timers.arm(TimerKind::EntryHint, Millis(300));
    timers.arm(TimerKind::RecoveryHint, Millis(900));

    assert_eq!(timers.take_due(Millis(600)), vec![TimerKind::EntryHint, TimerKind::IdleHint]);
    assert!(timers.take_due(Millis(600)).is_empty(), "Fired timers are removed");
    assert!(timers.disarm(TimerKind::RecoveryHint));
    assert!(!timers.disarm(TimerKind::RecoveryHint));
    assert!(timers.is_empty());
}

#[test]
fn test_hint_ledger_keys() {
    let mut ledger = HintLedger::new();
    assert_eq!(HintLedger::key(Page::Skills, HintKind::Idle), "skills:idle");

    assert!(ledger.mark_shown(Page::Home, HintKind::Recovery));
    assert!(!ledger.mark_shown(Page::Home, HintKind::Recovery));
    assert!(ledger.mark_shown(Page::Skills, HintKind::Recovery), "Pages keep separate ledgers");
    assert_eq!(ledger.len(), 2);
}

#[test]
fn test_hint_text_overrides_and_normalization() {
    let mut overrides = std::collections::BTreeMap::new();
    overrides.insert(
        Page::Projects,
        PageHints { idle: Some("Open any project card.".to_string()), recovery: None },
    );
    let catalog = HintCatalog::new(overrides);

    assert_eq!(catalog.text(Page::Projects, HintKind::Idle), "Open any project card.");
    assert_eq!(catalog.text(Page::Projects, HintKind::Recovery), "Double-tap a planet to navigate.");
    assert_eq!(catalog.text(Page::Contact, HintKind::Entry), "Pick a contact method here.");

    assert_eq!(normalize_hint("a b c", Viewport::Mobile, 2), "a b");
    assert_eq!(normalize_hint("a b c", Viewport::Desktop, 2), "a b c");
}
