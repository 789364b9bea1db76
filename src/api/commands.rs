//! Synchronous commands against the intersection.
//!
//! Each operation is atomic under the shared state lock. Failures are
//! converted to descriptive messages in the response payload at this
//! boundary; callers always get a well-formed response.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::cycle::{CycleController, StartOutcome};
use crate::domain::Lane;
use crate::id::generate_vehicle_id;
use crate::state::Intersection;

/// Response carrying a message plus the flattened queue view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueResponse {
    pub message: String,
    pub queue: Vec<String>,
}

/// Response for status queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResponse {
    pub queue: Vec<String>,
    pub current_signal: Option<Lane>,
    pub prev_signal: Option<Lane>,
}

/// Message-only response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Static service description.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainResponse {
    pub project: &'static str,
    pub description: &'static str,
}

/// The command surface shared by the IPC server and tests.
///
/// Holds references to the one intersection and the one cycle controller
/// created at startup; nothing here is global.
pub struct CommandApi {
    state: Arc<Intersection>,
    controller: Arc<CycleController>,
    default_lane: Lane,
}

impl CommandApi {
    /// Create the command surface over shared state and controller.
    pub fn new(state: Arc<Intersection>, controller: Arc<CycleController>) -> Self {
        Self {
            state,
            controller,
            default_lane: Lane::North,
        }
    }

    /// Set the lane used when an enqueue request names none.
    pub fn with_default_lane(mut self, lane: Lane) -> Self {
        self.default_lane = lane;
        self
    }

    /// Add a vehicle to a lane queue.
    ///
    /// A missing vehicle gets a generated token; a missing lane falls back to
    /// the default lane. An unrecognized lane name is reported in the message
    /// without touching any queue.
    pub async fn enqueue(&self, vehicle: Option<String>, lane: Option<&str>) -> QueueResponse {
        let lane = match lane {
            Some(name) => match Lane::parse(name) {
                Ok(lane) => lane,
                Err(e) => {
                    debug!(lane = %name, "enqueue: rejected");
                    return QueueResponse {
                        message: e.to_string(),
                        queue: self.state.snapshot().await.queue,
                    };
                }
            },
            None => self.default_lane,
        };

        let vehicle = vehicle.unwrap_or_else(generate_vehicle_id);
        let queue = self.state.enqueue(lane, vehicle.clone()).await;
        info!(%lane, %vehicle, "Vehicle enqueued");
        QueueResponse {
            message: format!("{} added to {} lane.", vehicle, lane),
            queue,
        }
    }

    /// Remove the front vehicle from the currently green lane.
    ///
    /// A no-op (not an error) when no lane is green or the green lane's queue
    /// is empty.
    pub async fn dequeue(&self) -> QueueResponse {
        let outcome = self.state.dequeue_active().await;
        let message = match &outcome.removed {
            Some((lane, vehicle)) => {
                info!(%lane, %vehicle, "Vehicle passed");
                format!("{} passed from {} lane.", vehicle, lane)
            }
            None => "No vehicle to dequeue.".to_string(),
        };
        QueueResponse {
            message,
            queue: outcome.queue,
        }
    }

    /// Stop the cycle and clear all queues and the signal. Idempotent.
    pub async fn reset(&self) -> QueueResponse {
        // Stop first so the cycle can't repaint the signal after the clear.
        self.controller.stop().await;
        self.state.clear().await;
        info!("System reset");
        QueueResponse {
            message: "System reset complete.".to_string(),
            queue: Vec::new(),
        }
    }

    /// Report queues and signal state.
    pub async fn status(&self) -> StatusResponse {
        let snap = self.state.snapshot().await;
        StatusResponse {
            queue: snap.queue,
            current_signal: snap.active,
            prev_signal: snap.previous,
        }
    }

    /// Manually make `name` the green lane.
    ///
    /// Permitted while the cycle runs; the last writer under the lock wins,
    /// so the next automatic phase transition may supersede the override.
    pub async fn change_signal(&self, name: &str) -> MessageResponse {
        match Lane::parse(name) {
            Ok(lane) => {
                self.state.set_signal(lane).await;
                info!(%lane, "Signal changed");
                MessageResponse {
                    message: format!("Signal changed to {}.", lane),
                }
            }
            Err(_) => MessageResponse {
                message: "Invalid signal name.".to_string(),
            },
        }
    }

    /// Start the automatic cycle, optionally with a new green-phase duration.
    pub async fn start_auto(&self, signal_time: Option<i64>) -> MessageResponse {
        match self.controller.start(signal_time).await {
            StartOutcome::Started { signal_time } => MessageResponse {
                message: format!("Auto mode started (interval: {}s per lane).", signal_time),
            },
            StartOutcome::AlreadyRunning => MessageResponse {
                message: "Auto mode already running.".to_string(),
            },
        }
    }

    /// Stop the automatic cycle.
    pub async fn stop_auto(&self) -> MessageResponse {
        if self.controller.stop().await {
            MessageResponse {
                message: "Auto mode stopped.".to_string(),
            }
        } else {
            MessageResponse {
                message: "Auto mode not active.".to_string(),
            }
        }
    }

    /// Static description of the service. Reads no state.
    pub fn explain(&self) -> ExplainResponse {
        ExplainResponse {
            project: "Junction",
            description: "Traffic intersection queue daemon. Each lane has its own \
                FIFO vehicle queue. Auto mode cycles the signal through the lanes \
                (yellow transition, then green) and dequeues one vehicle per green \
                second from the active lane.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::CycleConfig;

    fn api() -> CommandApi {
        let state = Arc::new(Intersection::new());
        let controller = Arc::new(CycleController::with_config(
            Arc::clone(&state),
            CycleConfig::default(),
        ));
        CommandApi::new(state, controller)
    }

    #[tokio::test]
    async fn test_enqueue_named_vehicle_and_lane() {
        let api = api();
        let resp = api.enqueue(Some("Car-1".to_string()), Some("East")).await;
        assert_eq!(resp.message, "Car-1 added to East lane.");
        assert_eq!(resp.queue, vec!["Car-1"]);
    }

    #[tokio::test]
    async fn test_enqueue_defaults() {
        let api = api();
        let resp = api.enqueue(None, None).await;
        assert!(resp.message.contains("added to North lane."));
        assert_eq!(resp.queue.len(), 1);
        assert!(resp.queue[0].starts_with("Vehicle-"));
    }

    #[tokio::test]
    async fn test_enqueue_custom_default_lane() {
        let api = api().with_default_lane(Lane::West);
        let resp = api.enqueue(Some("Car-1".to_string()), None).await;
        assert_eq!(resp.message, "Car-1 added to West lane.");
    }

    #[tokio::test]
    async fn test_enqueue_invalid_lane_is_rejected() {
        let api = api();
        let resp = api.enqueue(Some("Car-1".to_string()), Some("Northeast")).await;
        assert_eq!(resp.message, "Invalid lane: Northeast");
        assert!(resp.queue.is_empty());
    }

    #[tokio::test]
    async fn test_dequeue_without_active_lane() {
        let api = api();
        api.enqueue(Some("Car-1".to_string()), Some("North")).await;

        let resp = api.dequeue().await;
        assert_eq!(resp.message, "No vehicle to dequeue.");
        assert_eq!(resp.queue, vec!["Car-1"]);
    }

    #[tokio::test]
    async fn test_dequeue_from_active_lane() {
        // Enqueue A and B to North, make North green, dequeue once.
        let api = api();
        api.enqueue(Some("A".to_string()), Some("North")).await;
        api.enqueue(Some("B".to_string()), Some("North")).await;
        api.change_signal("North").await;

        let resp = api.dequeue().await;
        assert_eq!(resp.message, "A passed from North lane.");
        assert_eq!(resp.queue, vec!["B"]);

        let status = api.status().await;
        assert_eq!(status.queue, vec!["B"]);
    }

    #[tokio::test]
    async fn test_dequeue_from_empty_active_lane() {
        let api = api();
        api.change_signal("South").await;
        let resp = api.dequeue().await;
        assert_eq!(resp.message, "No vehicle to dequeue.");
    }

    #[tokio::test]
    async fn test_change_signal_round_trip() {
        let api = api();
        api.change_signal("North").await;
        let resp = api.change_signal("South").await;
        assert_eq!(resp.message, "Signal changed to South.");

        let status = api.status().await;
        assert_eq!(status.current_signal, Some(Lane::South));
        assert_eq!(status.prev_signal, Some(Lane::North));
    }

    #[tokio::test]
    async fn test_change_signal_invalid_name() {
        let api = api();
        let resp = api.change_signal("Up").await;
        assert_eq!(resp.message, "Invalid signal name.");

        let status = api.status().await;
        assert_eq!(status.current_signal, None);
    }

    #[tokio::test]
    async fn test_queue_length_tracks_enqueues_minus_dequeues() {
        let api = api();
        for i in 0..5 {
            api.enqueue(Some(format!("Car-{}", i)), Some("East")).await;
        }
        api.change_signal("East").await;
        api.dequeue().await;
        api.dequeue().await;

        let status = api.status().await;
        assert_eq!(status.queue.len(), 3);
        assert_eq!(status.queue, vec!["Car-2", "Car-3", "Car-4"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_everything_and_stops() {
        let api = api();
        api.enqueue(Some("A".to_string()), Some("North")).await;
        api.change_signal("West").await;
        api.start_auto(Some(2)).await;

        let resp = api.reset().await;
        assert_eq!(resp.message, "System reset complete.");
        assert!(resp.queue.is_empty());

        let status = api.status().await;
        assert!(status.queue.is_empty());
        assert_eq!(status.current_signal, None);
        assert_eq!(status.prev_signal, None);

        // Idempotent, and the cycle stays down.
        let resp = api.reset().await;
        assert!(resp.queue.is_empty());
        let resp = api.stop_auto().await;
        assert_eq!(resp.message, "Auto mode not active.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_auto_reports_interval() {
        let api = api();
        let resp = api.start_auto(Some(2)).await;
        assert_eq!(resp.message, "Auto mode started (interval: 2s per lane).");

        let resp = api.start_auto(None).await;
        assert_eq!(resp.message, "Auto mode already running.");

        let resp = api.stop_auto().await;
        assert_eq!(resp.message, "Auto mode stopped.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_auto_ignores_bad_interval() {
        let api = api();
        let resp = api.start_auto(Some(0)).await;
        assert_eq!(resp.message, "Auto mode started (interval: 3s per lane).");
        api.stop_auto().await;
    }

    #[tokio::test]
    async fn test_explain_is_static() {
        let api = api();
        let resp = api.explain();
        assert_eq!(resp.project, "Junction");
        assert!(resp.description.contains("queue"));
    }

    #[test]
    fn test_status_serializes_null_signals() {
        let status = StatusResponse {
            queue: Vec::new(),
            current_signal: None,
            prev_signal: Some(Lane::North),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert!(json["current_signal"].is_null());
        assert_eq!(json["prev_signal"], "North");
        assert!(json["queue"].as_array().unwrap().is_empty());
    }
}
