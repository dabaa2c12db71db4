//! Traffic light with an autonomous phase loop
//!
//! A light toggles between red and green on a background thread and
//! publishes every new phase into its handoff queue. Vehicles block in
//! [`TrafficLight::wait_for_phase`] until they pull the phase they want.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::blocking_queue::BlockingQueue;
use super::config::LightConfig;
use super::supervisor::CancellationToken;
use super::types::{Phase, PhaseChange};

/// Callback invoked from the light's thread on every toggle
pub type PhaseObserver = Box<dyn Fn(&PhaseChange) + Send + Sync>;

static NEXT_LIGHT_ID: AtomicUsize = AtomicUsize::new(0);

struct LightState {
    id: usize,
    config: LightConfig,
    /// Written only by the phase loop; readers accept a value up to one
    /// toggle stale, so relaxed ordering is enough.
    current_phase: AtomicU8,
    queue: BlockingQueue<Phase>,
    started: AtomicBool,
    cycles_completed: AtomicU64,
    observer: Option<PhaseObserver>,
}

/// A simulated traffic light. Cloning yields another handle to the same light.
#[derive(Clone)]
pub struct TrafficLight {
    state: Arc<LightState>,
}

impl TrafficLight {
    fn new_internal(config: LightConfig, observer: Option<PhaseObserver>) -> Result<Self> {
        config.validate().context("Invalid traffic light configuration")?;
        Ok(Self::build(config, observer))
    }

    fn build(config: LightConfig, observer: Option<PhaseObserver>) -> Self {
        let state = LightState {
            id: NEXT_LIGHT_ID.fetch_add(1, Ordering::Relaxed),
            current_phase: AtomicU8::new(config.initial_phase.as_u8()),
            queue: BlockingQueue::with_limit(config.queue_limit),
            started: AtomicBool::new(false),
            cycles_completed: AtomicU64::new(0),
            observer,
            config,
        };
        Self {
            state: Arc::new(state),
        }
    }

    /// Create a red light with the default 4-6 second cycle
    pub fn new() -> Self {
        Self::build(LightConfig::default(), None)
    }

    pub fn new_with_config(config: LightConfig) -> Result<Self> {
        Self::new_internal(config, None)
    }

    /// Create a light that reports every toggle to `observer`
    pub fn new_with_observer(config: LightConfig, observer: PhaseObserver) -> Result<Self> {
        Self::new_internal(config, Some(observer))
    }

    pub fn id(&self) -> usize {
        self.state.id
    }

    pub fn config(&self) -> &LightConfig {
        &self.state.config
    }

    /// The most recently toggled phase. Never blocks.
    pub fn current_phase(&self) -> Phase {
        Phase::from_u8(self.state.current_phase.load(Ordering::Relaxed))
    }

    /// Number of toggles published so far
    pub fn cycles_completed(&self) -> u64 {
        self.state.cycles_completed.load(Ordering::Relaxed)
    }

    /// Number of unread phase values buffered in the queue
    pub fn pending_messages(&self) -> usize {
        self.state.queue.len()
    }

    /// Block until a published phase equal to `target` is received.
    /// Every other value pulled from the queue is discarded.
    pub fn wait_for_phase(&self, target: Phase) {
        loop {
            if self.state.queue.receive() == target {
                return;
            }
        }
    }

    pub fn wait_for_green(&self) {
        self.wait_for_phase(Phase::Green);
    }

    /// Start the phase loop on its own thread.
    /// Fails if `token` is already cancelled, or while the loop from an
    /// earlier call is still running.
    pub fn simulate(&self, token: CancellationToken) -> Result<JoinHandle<()>> {
        if token.is_cancelled() {
            bail!("Traffic light {} cannot start with a cancelled token", self.state.id);
        }
        if self.state.started.swap(true, Ordering::AcqRel) {
            bail!("Traffic light {} is already simulating", self.state.id);
        }

        let state = Arc::clone(&self.state);
        let rng = self.state.config.seed.map(StdRng::seed_from_u64);
        let spawned = thread::Builder::new()
            .name(format!("traffic-light-{}", self.state.id))
            .spawn(move || state.cycle_through_phases(token, rng));

        match spawned {
            Ok(handle) => Ok(handle),
            Err(e) => {
                self.state.started.store(false, Ordering::Release);
                Err(anyhow::Error::new(e).context("Failed to spawn traffic light thread"))
            }
        }
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl LightState {
    fn draw_cycle(&self, rng: &mut Option<StdRng>) -> Duration {
        match rng {
            Some(rng) => self.config.draw_cycle(rng),
            None => self.config.draw_cycle(&mut rand::rng()),
        }
    }

    fn toggle_current_phase(&self) -> Phase {
        let next = Phase::from_u8(self.current_phase.load(Ordering::Relaxed)).toggled();
        self.current_phase.store(next.as_u8(), Ordering::Relaxed);
        next
    }

    /// Runs until `token` is cancelled
    fn cycle_through_phases(&self, token: CancellationToken, mut rng: Option<StdRng>) {
        let mut cycle = self.draw_cycle(&mut rng);
        let mut cycle_start = Instant::now();
        let mut deadline = cycle_start + cycle;
        debug!("Light {} starting a new cycle of {:?}", self.id, cycle);

        while !token.is_cancelled() {
            thread::sleep(self.config.poll_interval);

            let now = Instant::now();
            if now < deadline {
                continue;
            }

            let phase = self.toggle_current_phase();
            let sequence = self.cycles_completed.fetch_add(1, Ordering::Relaxed) + 1;
            self.queue.send(phase);
            info!(
                "Light {} completed a cycle of {:?}, now {}",
                self.id, cycle, phase
            );
            if let Some(observer) = &self.observer {
                observer(&PhaseChange {
                    phase,
                    cycle,
                    elapsed: now - cycle_start,
                    sequence,
                });
            }

            cycle = self.draw_cycle(&mut rng);
            cycle_start = Instant::now();
            deadline = cycle_start + cycle;
            debug!("Light {} starting a new cycle of {:?}", self.id, cycle);
        }

        debug!(
            "Light {} stopped after {} cycles",
            self.id,
            self.cycles_completed.load(Ordering::Relaxed)
        );
        self.started.store(false, Ordering::Release);
    }
}
