use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::kernel::event::{SpeechSource, Viewport};
use crate::kernel::time::Millis;

/// Runtime tunables. Every key is optional in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MascotConfig {
    pub speech: SpeechConfig,
    pub hints: HintConfig,
    pub guide: GuideConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Minimum gap between the starts of two accepted utterances.
    pub dedupe_cooldown_ms: u64,
    /// Non-exempt sources stay silent this long after a user interaction.
    pub interaction_grace_ms: u64,
    /// Delay between accepting a request and handing it to the engine.
    pub debounce_ms: u64,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Tried first, case-insensitive substring match on the voice name.
    pub preferred_voice_patterns: Vec<String>,
    /// Tried second; an `en*` language tag also matches.
    pub fallback_voice_patterns: Vec<String>,
    /// Sources allowed to speak while the user is mid-interaction.
    pub exempt_sources: BTreeSet<SpeechSource>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            dedupe_cooldown_ms: 800,
            interaction_grace_ms: 1200,
            debounce_ms: 300,
            rate: 0.85,
            pitch: 1.0,
            volume: 0.75,
            preferred_voice_patterns: ["female", "zira", "samantha", "google uk english female"]
                .into_iter()
                .map(String::from)
                .collect(),
            fallback_voice_patterns: ["google", "english"].into_iter().map(String::from).collect(),
            exempt_sources: SpeechSource::interaction_exempt(),
        }
    }
}

/// A delay that depends on the viewport class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportDelay {
    pub mobile: u64,
    pub desktop: u64,
}

impl ViewportDelay {
    pub fn for_viewport(&self, viewport: Viewport) -> Millis {
        match viewport {
            Viewport::Mobile => Millis(self.mobile),
            Viewport::Desktop => Millis(self.desktop),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    pub entry_delay_ms: u64,
    pub display_ms: u64,
    pub idle_delay_ms: ViewportDelay,
    pub recovery_delay_ms: ViewportDelay,
    pub mobile_max_words: usize,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            entry_delay_ms: 700,
            display_ms: 4000,
            idle_delay_ms: ViewportDelay { mobile: 9000, desktop: 11000 },
            recovery_delay_ms: ViewportDelay { mobile: 16000, desktop: 18000 },
            mobile_max_words: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub mobile_entries: usize,
    pub desktop_entries: usize,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self { mobile_entries: 2, desktop_entries: 3 }
    }
}

impl GuideConfig {
    pub fn entries_for(&self, viewport: Viewport) -> usize {
        match viewport {
            Viewport::Mobile => self.mobile_entries,
            Viewport::Desktop => self.desktop_entries,
        }
    }
}

impl MascotConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Loads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
