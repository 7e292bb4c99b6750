//! Scene snapshots, kinetic metrics, and the per-hand state machine.

use std::fmt;

use cogniscript_common::clock::TimestampMs;
use serde::{Deserialize, Serialize};

use crate::detection::DetectedObject;

/// Which writing tool, if any, the scene currently attributes to the hand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolLabel {
    /// No detection refresh has completed yet.
    #[default]
    Searching,
    /// The last refresh found no qualifying object near the hand.
    NotSeen,
    /// Upper-cased class label of the associated object.
    Identified(String),
}

impl ToolLabel {
    /// Label for an associated object class.
    pub fn identified(class: &str) -> Self {
        Self::Identified(class.to_uppercase())
    }

    pub fn is_identified(&self) -> bool {
        matches!(self, Self::Identified(_))
    }
}

impl fmt::Display for ToolLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Searching => f.write_str("Searching..."),
            Self::NotSeen => f.write_str("Not Seen"),
            Self::Identified(label) => f.write_str(label),
        }
    }
}

/// Immutable scene snapshot, rebuilt on every detection refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneStatus {
    /// A hand was tracked when the refresh completed.
    pub hand_visible: bool,

    /// A writing tool was associated with the hand.
    pub tool_visible: bool,

    pub tool_label: ToolLabel,

    /// Everything the detector reported, tool or not.
    pub detected_objects: Vec<DetectedObject>,
}

/// Kinetic handwriting metrics for the tracked hand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsState {
    /// Normalized distance per millisecond.
    pub velocity: f64,

    /// Debounced hesitation events counted this session. Never decreases.
    pub hesitation_count: u64,

    /// Below the hesitation threshold on the latest frame.
    pub is_hesitating: bool,

    /// When the last hesitation event was counted.
    pub last_hesitation_ms: Option<TimestampMs>,

    /// Pinch detected on the latest frame; ink flows while set.
    pub engaged: bool,
}

impl MetricsState {
    /// State after the hand leaves the frame.
    ///
    /// Instantaneous values go back to neutral. The hesitation count and
    /// its debounce timestamp are session totals and survive.
    pub fn after_hand_lost(&self) -> Self {
        Self {
            hesitation_count: self.hesitation_count,
            last_hesitation_ms: self.last_hesitation_ms,
            ..Self::default()
        }
    }
}

/// Per-hand tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandState {
    #[default]
    NoHand,
    HandVisible,
    /// Pinching: the only state that lays down ink.
    Engaged,
}

impl HandState {
    /// State for a frame given hand presence and the pinch reading.
    ///
    /// Every state is reachable from every other in one frame; pinch on a
    /// frame with no hand is ignored.
    pub fn next(hand_present: bool, engaged: bool) -> Self {
        match (hand_present, engaged) {
            (false, _) => Self::NoHand,
            (true, false) => Self::HandVisible,
            (true, true) => Self::Engaged,
        }
    }

    pub fn permits_ink(self) -> bool {
        self == Self::Engaged
    }

    pub fn hand_present(self) -> bool {
        self != Self::NoHand
    }
}
