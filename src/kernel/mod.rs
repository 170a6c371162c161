pub mod event;
pub mod hints;
pub mod presence;
pub mod reactor;
pub mod scheduler;
pub mod speech;
pub mod telemetry;
pub mod time;
