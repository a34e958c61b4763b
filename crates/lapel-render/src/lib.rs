#![forbid(unsafe_code)]

//! Presentational derivation for the lapel profile-badge engine.
//!
//! Everything here is a pure function of engine state: self-render badge markup from profile
//! data ([`view`]), and sizing/serialization of the opaque frames the legacy path injects
//! ([`frame`]). No side effects, no I/O.

pub mod frame;
pub mod view;

pub use frame::{
    DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DeterministicFrameMeasurer, FrameMeasurer,
    FrameMetrics, frame_html, sized_frame,
};
pub use view::{ViewOptions, render_badge_html};
