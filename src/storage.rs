use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MascotError, Result};
use crate::kernel::event::Page;

/// The handful of flags that outlive a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedFlags {
    pub voice_enabled: Option<bool>,
    pub last_visited_page: Option<Page>,
    /// Pages whose one-time narration already played.
    pub spoken_pages: BTreeSet<Page>,
}

pub trait FlagStore: Send {
    fn load(&self) -> Result<PersistedFlags>;
    fn save(&mut self, flags: &PersistedFlags) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    flags: PersistedFlags,
    saves: usize,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: PersistedFlags) -> Self {
        Self { flags, saves: 0 }
    }

    pub fn flags(&self) -> &PersistedFlags {
        &self.flags
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl FlagStore for MemoryFlagStore {
    fn load(&self) -> Result<PersistedFlags> {
        Ok(self.flags.clone())
    }

    fn save(&mut self, flags: &PersistedFlags) -> Result<()> {
        self.flags = flags.clone();
        self.saves += 1;
        Ok(())
    }
}

/// JSON file on disk. A missing file reads as empty flags.
#[derive(Debug, Clone)]
pub struct JsonFlagStore {
    path: PathBuf,
}

impl JsonFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlagStore for JsonFlagStore {
    fn load(&self) -> Result<PersistedFlags> {
        if !self.path.exists() {
            return Ok(PersistedFlags::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&mut self, flags: &PersistedFlags) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(flags)?;
        // Write-then-rename so a crash never leaves a truncated file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| MascotError::Storage(format!("rename {}: {}", self.path.display(), e)))?;
        debug!("Saved flags to {}", self.path.display());
        Ok(())
    }
}
