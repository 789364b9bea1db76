//! SignalState - which lane is green and which lane just finished.

use serde::{Deserialize, Serialize};

use super::lane::Lane;

/// The current signal record.
///
/// During steady green `previous` is None and `active` holds the green lane.
/// During the yellow transition `active` is None and `previous` holds the
/// lane that just finished its green phase, for the duration of the yellow
/// delay only. At most one of the two fields names the currently-green lane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalState {
    /// The lane that is currently green, if any.
    pub active: Option<Lane>,
    /// The lane that was green before the current transition, if any.
    pub previous: Option<Lane>,
}

impl SignalState {
    /// Create a cleared signal record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `lane` the green lane, remembering the prior one.
    pub fn set_active(&mut self, lane: Lane) {
        self.previous = self.active;
        self.active = Some(lane);
    }

    /// Enter the yellow transition: no lane is green, remember who was.
    pub fn enter_transition(&mut self) {
        self.previous = self.active;
        self.active = None;
    }

    /// Begin a green phase for `lane`, clearing the transition marker.
    pub fn begin_green(&mut self, lane: Lane) {
        self.previous = None;
        self.active = Some(lane);
    }

    /// Clear both fields.
    pub fn clear(&mut self) {
        self.active = None;
        self.previous = None;
    }
}
