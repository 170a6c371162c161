pub mod arbiter;
pub mod synth;
