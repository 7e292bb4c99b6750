//! Cogniscript Processing Core
//!
//! The per-frame math behind handwriting analysis:
//! - **Letterbox:** map source-frame coordinates onto the drawing surface
//! - **Smoothing:** exponential moving average over the ink point
//! - **Kinematics:** velocity and debounced hesitation events
//! - **Pinch:** thumb/index distance threshold for the inking state
//! - **Tool proximity:** pick the writing tool nearest to the hand
//! - **Color:** velocity heat scale for ink and status display
//!
//! This crate is pure computation: no I/O, no rendering, no clocks.
//! Callers own all state and thread it through these functions.

pub mod color;
pub mod kinematics;
pub mod letterbox;
pub mod pinch;
pub mod smoothing;
pub mod tool_proximity;

pub use color::{velocity_color, HslColor};
pub use kinematics::{HesitationAnalyzer, HesitationConfig, MotionSample};
pub use letterbox::{CoordinateMapper, LetterboxTransform};
pub use pinch::{classify_pinch, PinchReading};
pub use smoothing::{smooth_point, KeypointSmoother};
pub use tool_proximity::{find_nearest_tool, ToolClassSet, ToolMatch};
