//! Ownership of background tasks
//!
//! The supervisor holds the handles of every task it started and joins
//! them at teardown. Lights do not track their own threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Result;
use log::{error, info};

use super::traffic_light::TrafficLight;

/// Shared flag telling background tasks to stop
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Registry of running background tasks
#[derive(Default)]
pub struct Supervisor {
    token: CancellationToken,
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a light's phase loop and take ownership of its thread
    pub fn start(&mut self, light: &TrafficLight) -> Result<()> {
        let handle = light.simulate(self.token.clone())?;
        let name = handle
            .thread()
            .name()
            .unwrap_or("traffic-light")
            .to_string();
        self.tasks.push((name, handle));
        Ok(())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel every task and wait for all of them to finish.
    /// The supervisor gets a fresh token, so it can start tasks again.
    pub fn shutdown(&mut self) {
        self.token.cancel();
        let stopped = self.tasks.len();
        for (name, handle) in self.tasks.drain(..) {
            if handle.join().is_err() {
                error!("Task {} panicked before shutdown", name);
            }
        }
        self.token = CancellationToken::new();
        if stopped > 0 {
            info!("Stopped {} background tasks", stopped);
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
