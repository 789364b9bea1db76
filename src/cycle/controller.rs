//! The automatic signal cycle.
//!
//! One background task walks the lanes in cycle order: yellow transition,
//! green phase, one dequeue attempt per green second, then a short settle
//! pause after the last lane. Stop requests are cooperative and observed at
//! every sleep boundary, so cancellation latency is bounded by the longest
//! single sleep. At most one cycle task is alive at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cycle::config::{CycleConfig, validate_signal_time};
use crate::domain::Lane;
use crate::state::Intersection;

/// Yellow transition delay between green phases.
const YELLOW_DELAY: Duration = Duration::from_secs(1);

/// Pause before each dequeue attempt during green.
const DEQUEUE_INTERVAL: Duration = Duration::from_secs(1);

/// Settle delay after a full pass over all lanes.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Outcome of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new cycle task was spawned with this green-phase duration.
    Started { signal_time: u64 },
    /// A cycle task is already running; nothing changed.
    AlreadyRunning,
}

/// Handle to the live cycle task.
struct RunningCycle {
    handle: JoinHandle<()>,
    stop_tx: watch::Sender<bool>,
}

/// Owns the background cycle task.
///
/// The running slot is guarded by its own lock so concurrent start requests
/// serialize; only the winner spawns a task.
pub struct CycleController {
    state: Arc<Intersection>,
    config: Arc<RwLock<CycleConfig>>,
    running: Mutex<Option<RunningCycle>>,
}

impl CycleController {
    /// Create a controller with the default cycle timing.
    pub fn new(state: Arc<Intersection>) -> Self {
        Self::with_config(state, CycleConfig::default())
    }

    /// Create a controller with custom cycle timing.
    pub fn with_config(state: Arc<Intersection>, config: CycleConfig) -> Self {
        Self {
            state,
            config: Arc::new(RwLock::new(config)),
            running: Mutex::new(None),
        }
    }

    /// Current green-phase duration in seconds.
    pub async fn signal_time(&self) -> u64 {
        self.config.read().await.signal_time
    }

    /// Whether a cycle task is currently alive.
    pub async fn is_running(&self) -> bool {
        let mut running = self.running.lock().await;
        let alive = running
            .as_ref()
            .is_some_and(|cycle| !cycle.handle.is_finished());
        if !alive {
            // Reap a task that exited on its own.
            *running = None;
        }
        alive
    }

    /// Start the cycle, optionally reconfiguring the green-phase duration.
    ///
    /// The duration is applied only when a new task is actually spawned; a
    /// start that reports `AlreadyRunning` leaves the config untouched.
    /// Invalid durations are ignored with a warning and the previous value
    /// stays in force.
    pub async fn start(&self, signal_time: Option<i64>) -> StartOutcome {
        let mut running = self.running.lock().await;
        if let Some(cycle) = running.as_ref() {
            if !cycle.handle.is_finished() {
                debug!("start: cycle already running");
                return StartOutcome::AlreadyRunning;
            }
        }

        if let Some(secs) = signal_time {
            match validate_signal_time(secs) {
                Ok(secs) => self.config.write().await.signal_time = secs,
                Err(e) => warn!("Ignoring requested duration: {}", e),
            }
        }
        let signal_time = self.config.read().await.signal_time;

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_cycle(
            Arc::clone(&self.state),
            Arc::clone(&self.config),
            stop_rx,
        ));
        *running = Some(RunningCycle { handle, stop_tx });

        info!(signal_time, "Auto cycle started");
        StartOutcome::Started { signal_time }
    }

    /// Request a stop and wait for the cycle task to exit.
    ///
    /// Returns false when no cycle was running. The wait is bounded by the
    /// longest single sleep in the cycle.
    pub async fn stop(&self) -> bool {
        let cycle = self.running.lock().await.take();
        match cycle {
            Some(cycle) => {
                let _ = cycle.stop_tx.send(true);
                if let Err(e) = cycle.handle.await {
                    warn!("Cycle task ended abnormally: {}", e);
                }
                info!("Auto cycle stopped");
                true
            }
            None => false,
        }
    }
}

/// Sleep for `duration` unless a stop is requested first.
///
/// Returns true when the cycle should exit. The flag is checked before and
/// after the sleep, and the sleep itself races against the stop signal, so a
/// stop never waits longer than one interval.
async fn stopped_after(stop: &mut watch::Receiver<bool>, duration: Duration) -> bool {
    if *stop.borrow() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => *stop.borrow(),
        _ = stop.changed() => true,
    }
}

/// The cycle task body.
///
/// All signal and queue writes go through the shared state lock; every sleep
/// happens outside it.
async fn run_cycle(
    state: Arc<Intersection>,
    config: Arc<RwLock<CycleConfig>>,
    mut stop: watch::Receiver<bool>,
) {
    info!("Auto cycle running");
    'cycle: loop {
        for lane in Lane::ALL {
            if *stop.borrow() {
                break 'cycle;
            }

            // Yellow: remember who was green, then nobody is.
            state.begin_transition().await;
            if stopped_after(&mut stop, YELLOW_DELAY).await {
                break 'cycle;
            }

            // Green for this lane.
            state.begin_green(lane).await;
            debug!(lane = %lane, "Green");

            // One dequeue attempt per elapsed green second. The duration is
            // latched here; a reconfigure never alters an in-flight phase.
            let ticks = config.read().await.signal_time;
            for _ in 0..ticks {
                if stopped_after(&mut stop, DEQUEUE_INTERVAL).await {
                    break 'cycle;
                }
                if let Some(vehicle) = state.dequeue_front(lane).await {
                    info!(lane = %lane, vehicle = %vehicle, "Vehicle passed");
                }
            }
        }

        if stopped_after(&mut stop, SETTLE_DELAY).await {
            break;
        }
    }
    info!("Auto cycle exited");
}
