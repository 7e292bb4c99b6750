//! Cogniscript Render Engine
//!
//! Everything that touches pixels:
//!
//! ```text
//! smoothed ink point ──┐
//! engaged flag ────────┼── StrokeAccumulator ── StrokeSurface (persistent)
//! velocity color ──────┘                              │
//!                                                     ├── clear (reset)
//!                                                     └── PNG (export)
//!
//! landmarks, objects, cursor ── compose_overlay ── OverlayFrame ── render_overlay
//! ```
//!
//! The stroke surface is the only durable side effect of a session. The
//! overlay is recomputed from scratch every frame.

pub mod export;
pub mod overlay;
pub mod stroke;

pub use export::*;
pub use overlay::{compose_overlay, render_overlay, OverlayFrame, OverlayInput};
pub use stroke::{Segment, StrokeAccumulator, StrokeSurface};
