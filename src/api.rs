pub mod dtek;
pub mod heartbeat;
pub mod schedule_source;
pub mod telegram;
