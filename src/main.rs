use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mascot::dialogue::content::Catalog;
use mascot::dialogue::engine::{DialogueEngine, Selection};
use mascot::kernel::event::{EngineSignal, Event, InteractionKind, Page, SpeechSource, Viewport};
use mascot::kernel::scheduler::SideEffect;
use mascot::kernel::speech::synth::{EngineError, SpeechEngine, Utterance, Voice};
use mascot::kernel::telemetry::event::{DialogueTransitionKind, TelemetryEvent};
use mascot::kernel::time::{Clock, SystemClock, TICK_MS};
use mascot::storage::JsonFlagStore;
use mascot::{MascotConfig, Reactor};

/// Prints utterances and reports playback through the reactor channel,
/// taking roughly as long as reading the text aloud would.
struct ConsoleEngine {
    tx: mpsc::Sender<Event>,
    playing: Option<JoinHandle<()>>,
}

impl SpeechEngine for ConsoleEngine {
    fn voices(&self) -> Vec<Voice> {
        vec![
            Voice { name: "Daniel".to_string(), lang: "en-GB".to_string() },
            Voice { name: "Samantha".to_string(), lang: "en-US".to_string() },
        ]
    }

    fn speak(&mut self, utterance: Utterance) -> Result<(), EngineError> {
        let voice = utterance.voice.as_ref().map(|v| v.name.as_str()).unwrap_or("default");
        println!("[VOICE:{}] {}", voice, utterance.text);

        let tx = self.tx.clone();
        let id = utterance.id;
        let words = utterance.text.split_whitespace().count() as f32;
        let duration = Duration::from_millis((words * 330.0 / utterance.params.rate) as u64);
        self.playing = Some(tokio::spawn(async move {
            let _ = tx.send(Event::Engine(EngineSignal::Started(id))).await;
            tokio::time::sleep(duration).await;
            let _ = tx.send(Event::Engine(EngineSignal::Ended(id))).await;
        }));
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(task) = self.playing.take() {
            task.abort();
        }
    }
}

struct Args {
    config: PathBuf,
    content: PathBuf,
    state: PathBuf,
    viewport: Viewport,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: PathBuf::from("assets/mascot.toml"),
        content: PathBuf::from("assets/portfolio.json"),
        state: PathBuf::from("mascot_state.json"),
        viewport: Viewport::Desktop,
    };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--config" => args.config = it.next().context("--config needs a path")?.into(),
            "--content" => args.content = it.next().context("--content needs a path")?.into(),
            "--state" => args.state = it.next().context("--state needs a path")?.into(),
            "--mobile" => args.viewport = Viewport::Mobile,
            other => anyhow::bail!("unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn interaction_kind(name: &str) -> Option<InteractionKind> {
    Some(match name {
        "planet" => InteractionKind::Planet,
        "skills" => InteractionKind::Skills,
        "projects" => InteractionKind::Projects,
        "experience" => InteractionKind::Experience,
        "journey" => InteractionKind::Journey,
        "contact" => InteractionKind::Contact,
        "guide" => InteractionKind::Guide,
        _ => return None,
    })
}

fn print_dialogue(dialogue: &DialogueEngine) {
    if let Some(node) = dialogue.node() {
        println!("[BOT] {}", node.message);
        for (i, action) in node.actions.iter().enumerate() {
            println!("   {}) {}", i, action.label);
        }
    }
}

fn print_effect(effect: &SideEffect) {
    match effect {
        SideEffect::MoodChanged(mood) => println!("[MOOD] {:?}", mood),
        SideEffect::ShowHint { text, .. } => println!("[HINT] {}", text),
        SideEffect::ClearHint => println!("[HINT] -"),
        SideEffect::Navigate(route) => println!("[NAV] {}", route),
        SideEffect::GuideChanged { open, entries } => {
            println!("[GUIDE] {}", if *open { "open" } else { "closed" });
            if *open && entries.is_empty() {
                println!("   Double-click on a planet to navigate");
            }
            for (i, entry) in entries.iter().enumerate() {
                println!("   {}) {}", i, entry.label);
            }
        }
        SideEffect::VoiceChanged(on) => println!("[VOICE] {}", if *on { "on" } else { "off" }),
    }
}

const HELP: &str = "commands: go <path> | narrate | say <text> | tap <kind> | planet <page> | mascot | guide <n> | \
voice | stop | mobile | desktop | chat | pick <n> | stats | quit";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mascot=info")),
        )
        .init();

    let args = parse_args()?;
    let config = MascotConfig::load(&args.config).context("loading config")?;
    let catalog = Arc::new(Catalog::load(&args.content).context("loading content")?);

    // Kernel Channel
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    let engine = ConsoleEngine { tx: tx.clone(), playing: None };
    let clock = SystemClock;
    let mut reactor = Reactor::new(
        config,
        catalog.clone(),
        Some(Box::new(engine) as Box<dyn SpeechEngine>),
        Box::new(JsonFlagStore::new(&args.state)),
        args.viewport,
    );
    let mut dialogue = DialogueEngine::new(catalog);
    let mut pathname = reactor
        .current_page()
        .map(|p| p.route().to_string())
        .unwrap_or_else(|| "/".to_string());

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let started = clock.now();
    for effect in reactor.boot(started) {
        print_effect(&effect);
    }
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut cadence = interval(Duration::from_millis(TICK_MS));
    cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        let mut events = Vec::new();

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = cadence.tick() => {}
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("stdin closed: {}", e);
                        break;
                    }
                };
                let (cmd, rest) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));
                match cmd {
                    "" => {}
                    "quit" | "exit" => break,
                    "go" => {
                        pathname = rest.to_string();
                        events.push(Event::RouteChanged(pathname.clone()));
                    }
                    "narrate" => match Page::from_route(&pathname) {
                        Some(page) => events.push(Event::PageSpeechRequested {
                            page,
                            text: page.narration().to_string(),
                        }),
                        None => println!("no page at {}", pathname),
                    },
                    "say" => events.push(Event::SpeechRequested {
                        text: rest.to_string(),
                        source: SpeechSource::Manual,
                    }),
                    "tap" => match interaction_kind(rest) {
                        Some(kind) => events.push(Event::Interaction(kind)),
                        None => println!("unknown interaction '{}'", rest),
                    },
                    "planet" => {
                        let page = Page::from_route(&format!("/{}", rest))
                            .or_else(|| (rest == "home").then_some(Page::Home));
                        events.push(Event::Interaction(InteractionKind::Planet));
                        events.push(Event::PlanetFocused(page));
                    }
                    "mascot" => events.push(Event::MascotClicked),
                    "guide" => match rest.parse::<usize>() {
                        Ok(n) => events.push(Event::GuideSelected(n)),
                        Err(_) => println!("guide <n>"),
                    },
                    "voice" => events.push(Event::ToggleVoice),
                    "stop" => events.push(Event::StopSpeech),
                    "mobile" => events.push(Event::ViewportChanged(Viewport::Mobile)),
                    "desktop" => events.push(Event::ViewportChanged(Viewport::Desktop)),
                    "chat" => {
                        if dialogue.toggle(&pathname) {
                            reactor.telemetry.record(TelemetryEvent::DialogueTransition {
                                kind: DialogueTransitionKind::Opened,
                            });
                            print_dialogue(&dialogue);
                        } else {
                            println!("[BOT] (closed)");
                        }
                    }
                    "pick" => match rest
                        .parse::<usize>()
                        .map_err(anyhow::Error::from)
                        .and_then(|n| dialogue.select(n).map_err(anyhow::Error::from))
                    {
                        Ok(Selection::Moved(_)) => {
                            reactor.telemetry.record(TelemetryEvent::DialogueTransition {
                                kind: DialogueTransitionKind::Moved,
                            });
                            print_dialogue(&dialogue);
                        }
                        Ok(Selection::Navigate(route)) => {
                            reactor.telemetry.record(TelemetryEvent::DialogueTransition {
                                kind: DialogueTransitionKind::Navigated,
                            });
                            println!("[NAV] {}", route);
                            pathname = route.clone();
                            events.push(Event::RouteChanged(route));
                        }
                        Err(e) => println!("{}", e),
                    },
                    "stats" => println!("{:#?}", reactor.telemetry.snapshot()),
                    _ => println!("{}", HELP),
                }
            }
        }

        // Drain Engine Events
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        for effect in reactor.step(events, clock.now()) {
            if let SideEffect::Navigate(route) = &effect {
                pathname = route.clone();
                // The console router honors navigation immediately.
                for follow in reactor.step(vec![Event::RouteChanged(route.clone())], clock.now()) {
                    print_effect(&follow);
                }
            }
            print_effect(&effect);
        }
    }

    for effect in reactor.shutdown() {
        print_effect(&effect);
    }
    let summary = reactor.telemetry.summarize(clock.now().since(started));
    info!("Mascot stopped: {:?}", summary);
    Ok(())
}
