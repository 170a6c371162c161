use std::sync::Arc;

use tracing::{debug, info, warn};

use super::event::{EngineSignal, Event, InteractionKind, Page, SpeechSource, UtteranceRequest, Viewport};
use super::hints::{normalize_hint, HintCatalog, HintKind, HintLedger};
use super::presence::{Mood, MoodGraph, MoodRequest};
use super::scheduler::{SideEffect, TimerKind, TimerRegistry};
use super::speech::arbiter::{SpeechArbiter, SpeechDecision};
use super::speech::synth::{Narrator, SpeakOutcome, SpeechEngine};
use super::telemetry::event::{TelemetryEvent, UtteranceEventKind};
use super::telemetry::recorder::TelemetryRecorder;
use super::time::Millis;
use crate::config::MascotConfig;
use crate::dialogue::content::{Catalog, GuideEntry};
use crate::storage::{FlagStore, PersistedFlags};

/// The mascot's coordination core. Owns the arbiter, the speech engine, all
/// timers and the persisted flags. Single-threaded: the host feeds events
/// and the current time, and carries out the returned side effects.
pub struct Reactor {
    config: MascotConfig,
    pub arbiter: SpeechArbiter,
    narrator: Narrator,
    timers: TimerRegistry,
    hints: HintCatalog,
    ledger: HintLedger,
    catalog: Arc<Catalog>,
    store: Box<dyn FlagStore>,
    flags: PersistedFlags,
    mood: Mood,
    viewport: Viewport,
    current_page: Option<Page>,
    active_planet: Option<Page>,
    guide_open: bool,
    visible_hint: Option<String>,
    // Accepted, waiting out the debounce.
    pending: Option<UtteranceRequest>,
    outbox: Vec<SideEffect>,
    pub telemetry: TelemetryRecorder,
    shut_down: bool,
}

impl Reactor {
    pub fn new(
        config: MascotConfig,
        catalog: Arc<Catalog>,
        engine: Option<Box<dyn SpeechEngine>>,
        store: Box<dyn FlagStore>,
        viewport: Viewport,
    ) -> Self {
        let flags = store.load().unwrap_or_else(|e| {
            warn!("Could not load persisted flags, starting fresh: {}", e);
            PersistedFlags::default()
        });
        // Voice defaults on for desktop, off for phones.
        let voice_enabled = flags.voice_enabled.unwrap_or(viewport == Viewport::Desktop);

        Self {
            arbiter: SpeechArbiter::new(config.speech.clone(), voice_enabled),
            narrator: Narrator::new(engine, config.speech.clone()),
            timers: TimerRegistry::new(),
            hints: HintCatalog::new(catalog.hints.clone()),
            ledger: HintLedger::new(),
            current_page: flags.last_visited_page,
            active_planet: None,
            catalog,
            store,
            flags,
            config,
            mood: Mood::Idle,
            viewport,
            guide_open: false,
            visible_hint: None,
            pending: None,
            outbox: Vec::new(),
            telemetry: TelemetryRecorder::new(),
            shut_down: false,
        }
    }

    // === Read-only accessors ===

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn voice_enabled(&self) -> bool {
        self.arbiter.voice_enabled()
    }

    pub fn is_speaking(&self) -> bool {
        self.arbiter.is_speaking()
    }

    pub fn current_page(&self) -> Option<Page> {
        self.current_page
    }

    pub fn active_planet(&self) -> Option<Page> {
        self.active_planet
    }

    pub fn guide_open(&self) -> bool {
        self.guide_open
    }

    pub fn visible_hint(&self) -> Option<&str> {
        self.visible_hint.as_deref()
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn flags(&self) -> &PersistedFlags {
        &self.flags
    }

    pub fn hint_ledger(&self) -> &HintLedger {
        &self.ledger
    }

    pub fn pending_utterance(&self) -> Option<&UtteranceRequest> {
        self.pending.as_ref()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Guide entries for the active planet, capped for the viewport.
    pub fn guide_entries(&self) -> Vec<GuideEntry> {
        let Some(planet) = self.active_planet else {
            return Vec::new();
        };
        self.catalog
            .guide_entries(planet)
            .iter()
            .take(self.config.guide.entries_for(self.viewport))
            .cloned()
            .collect()
    }

    // === Lifecycle ===

    /// Publishes the restored flags and arms hint timers for the restored
    /// page.
    pub fn boot(&mut self, now: Millis) -> Vec<SideEffect> {
        info!(
            "Mascot booting: voice={} page={:?} viewport={:?}",
            self.voice_enabled(),
            self.current_page,
            self.viewport
        );
        self.outbox.push(SideEffect::VoiceChanged(self.voice_enabled()));
        self.arm_entry_hint(now);
        self.arm_dwell_hints(now);
        std::mem::take(&mut self.outbox)
    }

    /// One reactor step: apply host events in order, then fire due timers.
    pub fn step(&mut self, events: Vec<Event>, now: Millis) -> Vec<SideEffect> {
        if self.shut_down {
            return Vec::new();
        }

        for event in events {
            self.apply(event, now);
        }

        let due = self.timers.take_due(now);
        // A late step surfaces only the newest hint tier; older tiers stay unshown.
        let latest_hint = due.iter().rev().copied().find(|t| t.hint_kind().is_some());
        for timer in due {
            if timer.hint_kind().is_some() && Some(timer) != latest_hint {
                debug!("Skipping overdue {:?}, superseded in this step", timer);
                continue;
            }
            self.fire(timer, now);
        }

        std::mem::take(&mut self.outbox)
    }

    /// Effects produced by direct calls (`request_speech`, `stop`, ...)
    /// since the last step.
    pub fn drain_effects(&mut self) -> Vec<SideEffect> {
        std::mem::take(&mut self.outbox)
    }

    /// Teardown: nothing may fire after this. Cancels speech and every timer.
    pub fn shutdown(&mut self) -> Vec<SideEffect> {
        if self.shut_down {
            return Vec::new();
        }
        info!("Mascot shutting down");
        self.timers.disarm_all();
        self.pending = None;
        self.cancel_in_flight();
        self.move_mood(MoodRequest::Stopped);
        if self.visible_hint.take().is_some() {
            self.outbox.push(SideEffect::ClearHint);
        }
        self.persist();
        self.shut_down = true;
        std::mem::take(&mut self.outbox)
    }

    // === Public operations (also reachable through events) ===

    /// Single entry point for narration. Accepted requests are debounced
    /// before they reach the engine.
    pub fn request_speech(&mut self, text: &str, source: SpeechSource, now: Millis) -> SpeechDecision {
        let decision = self.arbiter.request_speech(text, source, now);
        match &decision {
            SpeechDecision::Suppressed(reason) => {
                self.telemetry.record(TelemetryEvent::SpeechSuppressed { source, reason: *reason });
            }
            SpeechDecision::Accepted(request) => {
                info!("Speech accepted from {:?}", source);
                self.telemetry.record(TelemetryEvent::SpeechAccepted { id: request.id, source });
                if !self.voice_enabled() {
                    debug!("Voice disabled, utterance {:?} will not play", request.id);
                    return decision;
                }
                // Last request wins: drop the pending one and cut playback.
                self.cancel_in_flight();
                self.pending = Some(request.clone());
                self.timers.arm(
                    TimerKind::SpeakDebounce,
                    now.after(Millis(self.config.speech.debounce_ms)),
                );
                self.move_mood(MoodRequest::SpeechAccepted);
            }
        }
        decision
    }

    /// Narrates `page` once, ever. `None` if it was already narrated. A
    /// suppressed attempt does not count, so the page can be tried again.
    pub fn request_page_speech(&mut self, page: Page, text: &str, now: Millis) -> Option<SpeechDecision> {
        if self.flags.spoken_pages.contains(&page) {
            return None;
        }
        let decision = self.request_speech(text, SpeechSource::Page, now);
        if decision.is_accepted() {
            self.flags.spoken_pages.insert(page);
            self.persist();
        }
        Some(decision)
    }

    pub fn request_guide(&mut self, text: &str, now: Millis) -> SpeechDecision {
        self.request_speech(text, SpeechSource::Guide, now)
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        self.pending = None;
        self.timers.disarm(TimerKind::SpeakDebounce);
        self.cancel_in_flight();
        self.move_mood(MoodRequest::Stopped);
    }

    /// Flips and persists the voice flag; always stops current speech.
    pub fn toggle_voice(&mut self) -> bool {
        let enabled = self.arbiter.toggle_voice();
        self.narrator.cancel();
        self.pending = None;
        self.timers.disarm(TimerKind::SpeakDebounce);
        self.move_mood(if enabled { MoodRequest::Stopped } else { MoodRequest::VoiceDisabled });
        self.flags.voice_enabled = Some(enabled);
        self.persist();
        self.telemetry.record(TelemetryEvent::VoiceToggled { enabled });
        self.outbox.push(SideEffect::VoiceChanged(enabled));
        info!("Voice {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }

    /// A genuine user interaction: silences non-exempt narration for a
    /// moment, hides the current hint and restarts the dwell timers.
    pub fn register_interaction(&mut self, kind: InteractionKind, now: Millis) {
        self.arbiter.register_interaction(kind, now);
        self.clear_hint();
        self.arm_dwell_hints(now);
    }

    pub fn set_guide_open(&mut self, open: bool, now: Millis) {
        if self.guide_open == open {
            return;
        }
        self.guide_open = open;
        if open {
            self.clear_hint();
            self.timers.disarm(TimerKind::EntryHint);
            self.timers.disarm(TimerKind::IdleHint);
            self.timers.disarm(TimerKind::RecoveryHint);
        } else {
            self.arm_entry_hint(now);
            self.arm_dwell_hints(now);
        }
        let entries = self.guide_entries();
        self.outbox.push(SideEffect::GuideChanged { open, entries });
    }

    // === Event application ===

    fn apply(&mut self, event: Event, now: Millis) {
        match event {
            Event::RouteChanged(path) => {
                let Some(page) = Page::from_route(&path) else {
                    debug!("No page for route {}", path);
                    return;
                };
                self.active_planet = Some(page);
                if self.current_page != Some(page) {
                    self.current_page = Some(page);
                    self.arm_entry_hint(now);
                }
                self.register_interaction(InteractionKind::Route, now);
                self.flags.last_visited_page = Some(page);
                self.persist();
            }
            Event::Interaction(kind) => self.register_interaction(kind, now),
            Event::SpeechRequested { text, source } => {
                self.request_speech(&text, source, now);
            }
            Event::PageSpeechRequested { page, text } => {
                self.request_page_speech(page, &text, now);
            }
            Event::Engine(signal) => self.on_engine(signal),
            Event::StopSpeech => self.stop(),
            Event::ClearSpeech => self.arbiter.clear_speech(),
            Event::ToggleVoice => {
                self.toggle_voice();
            }
            Event::MascotClicked => {
                self.register_interaction(InteractionKind::Guide, now);
                self.set_guide_open(!self.guide_open, now);
            }
            Event::ToggleGuide => self.set_guide_open(!self.guide_open, now),
            Event::SetGuideOpen(open) => self.set_guide_open(open, now),
            Event::GuideSelected(index) => {
                if !self.guide_open {
                    debug!("Guide selection {} while closed", index);
                    return;
                }
                let Some(entry) = self.guide_entries().into_iter().nth(index) else {
                    warn!("No guide entry at {}", index);
                    return;
                };
                self.request_speech(&entry.script, SpeechSource::Navigation, now);
                self.outbox.push(SideEffect::Navigate(entry.route));
                self.set_guide_open(false, now);
            }
            Event::PlanetFocused(planet) => {
                self.active_planet = planet;
                if self.guide_open {
                    let entries = self.guide_entries();
                    self.outbox.push(SideEffect::GuideChanged { open: true, entries });
                }
            }
            Event::ViewportChanged(viewport) => {
                if self.viewport != viewport {
                    self.viewport = viewport;
                    self.arm_entry_hint(now);
                    self.arm_dwell_hints(now);
                }
            }
        }
    }

    fn on_engine(&mut self, signal: EngineSignal) {
        match signal {
            EngineSignal::Started(id) => {
                if self.arbiter.mark_started(id) {
                    self.telemetry.record(TelemetryEvent::UtteranceLifecycle {
                        id,
                        event: UtteranceEventKind::Started,
                    });
                    self.move_mood(MoodRequest::PlaybackStarted);
                } else {
                    debug!("Ignoring start of superseded utterance {:?}", id);
                }
            }
            EngineSignal::Ended(id) | EngineSignal::Failed(id) => {
                if self.arbiter.mark_finished(id) {
                    self.telemetry.record(TelemetryEvent::UtteranceLifecycle {
                        id,
                        event: UtteranceEventKind::Ended,
                    });
                    self.move_mood(MoodRequest::PlaybackEnded);
                }
            }
        }
    }

    fn fire(&mut self, timer: TimerKind, now: Millis) {
        debug!("Timer fired: {:?}", timer);
        match timer {
            TimerKind::SpeakDebounce => {
                let Some(request) = self.pending.take() else {
                    return;
                };
                match self.narrator.speak(&request, self.voice_enabled()) {
                    SpeakOutcome::Dispatched(id) => {
                        self.arbiter.begin(id);
                        self.telemetry.record(TelemetryEvent::UtteranceLifecycle {
                            id,
                            event: UtteranceEventKind::Dispatched,
                        });
                    }
                    SpeakOutcome::Finished => {
                        self.telemetry.record(TelemetryEvent::UtteranceLifecycle {
                            id: request.id,
                            event: UtteranceEventKind::Degraded,
                        });
                        self.move_mood(MoodRequest::PlaybackEnded);
                    }
                }
            }
            TimerKind::HintDismiss => self.clear_hint(),
            TimerKind::EntryHint | TimerKind::IdleHint | TimerKind::RecoveryHint => {
                if let Some(kind) = timer.hint_kind() {
                    self.show_hint(kind, now);
                }
            }
        }
    }

    // === Hints ===

    fn show_hint(&mut self, kind: HintKind, now: Millis) {
        let Some(page) = self.current_page else {
            return;
        };
        if self.guide_open || self.ledger.has_shown(page, kind) {
            return;
        }
        let text = normalize_hint(
            &self.hints.text(page, kind),
            self.viewport,
            self.config.hints.mobile_max_words,
        );
        if text.is_empty() {
            return;
        }
        self.ledger.mark_shown(page, kind);
        info!("Hint {}:{}", page, kind);
        self.telemetry.record(TelemetryEvent::HintShown { page, kind });
        self.visible_hint = Some(text.clone());
        self.outbox.push(SideEffect::ShowHint { kind, text });
        self.timers.arm(TimerKind::HintDismiss, now.after(Millis(self.config.hints.display_ms)));
    }

    fn clear_hint(&mut self) {
        self.timers.disarm(TimerKind::HintDismiss);
        if self.visible_hint.take().is_some() {
            self.outbox.push(SideEffect::ClearHint);
        }
    }

    fn arm_entry_hint(&mut self, now: Millis) {
        match self.current_page {
            Some(page) if !self.guide_open && !self.ledger.has_shown(page, HintKind::Entry) => {
                self.timers.arm(
                    TimerKind::EntryHint,
                    now.after(Millis(self.config.hints.entry_delay_ms)),
                );
            }
            _ => {
                self.timers.disarm(TimerKind::EntryHint);
            }
        }
    }

    /// Idle and recovery timers restart from `now`.
    fn arm_dwell_hints(&mut self, now: Millis) {
        self.timers.disarm(TimerKind::IdleHint);
        self.timers.disarm(TimerKind::RecoveryHint);
        if self.current_page.is_none() || self.guide_open {
            return;
        }
        let hints = &self.config.hints;
        let idle = now.after(hints.idle_delay_ms.for_viewport(self.viewport));
        let recovery = now.after(hints.recovery_delay_ms.for_viewport(self.viewport));
        self.timers.arm(TimerKind::IdleHint, idle);
        self.timers.arm(TimerKind::RecoveryHint, recovery);
    }

    // === Helpers ===

    fn cancel_in_flight(&mut self) {
        self.narrator.cancel();
        let in_flight = self.arbiter.in_flight();
        if self.arbiter.stop() {
            if let Some(id) = in_flight {
                self.telemetry.record(TelemetryEvent::UtteranceLifecycle {
                    id,
                    event: UtteranceEventKind::Canceled,
                });
            }
        }
    }

    fn move_mood(&mut self, request: MoodRequest) {
        if let Some(next) = MoodGraph::transition(self.mood, request) {
            if next != self.mood {
                self.mood = next;
                self.outbox.push(SideEffect::MoodChanged(next));
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.flags) {
            warn!("Failed to persist mascot flags: {}", e);
        }
    }
}
