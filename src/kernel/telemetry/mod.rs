//! Speech, hint and dialogue telemetry.
//!
//! Recording is write-only from the kernel's point of view: the arbiter, the
//! reactor and the dialogue renderer never read it back to make a decision.
//!
//! Events carry ids, tiers, reasons and counts. Never spoken or displayed
//! text.

pub mod event;
pub mod metrics;
pub mod recorder;
