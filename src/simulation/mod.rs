//! Traffic light simulation core
//!
//! A blocking handoff queue and the traffic light that drives it. Runs
//! without any rendering; vehicles are plain threads that wait for green.

mod blocking_queue;
mod config;
mod supervisor;
mod traffic_light;
mod types;

pub use blocking_queue::BlockingQueue;
pub use config::{
    LightConfig, DEFAULT_MAX_CYCLE_UNITS, DEFAULT_MIN_CYCLE_UNITS, DEFAULT_POLL_INTERVAL,
    DEFAULT_QUEUE_LIMIT,
};
pub use supervisor::{CancellationToken, Supervisor};
pub use traffic_light::{PhaseObserver, TrafficLight};
pub use types::{Phase, PhaseChange};
