#![forbid(unsafe_code)]

//! Headless profile-badge embed engine.
//!
//! Design goals:
//! - wire parity with the hosted badge loader (URL shape, callback contract)
//! - deterministic, testable outputs (no DOM, no ambient clock in fixtures)
//! - runtime-agnostic async APIs (no specific executor required)
//!
//! The engine correlates concurrently in-flight badge renders with the containers that
//! requested them ([`session`]), builds the vendor loader URLs ([`wire`]), generates the
//! per-render correlation UIDs ([`uid`]), and keeps an expiring local cache of fetched
//! profile data for the self-render path ([`cache`], [`fetch`]).

pub mod cache;
pub mod error;
pub mod fetch;
pub mod page;
pub mod params;
pub mod profile;
pub mod sanitize;
pub mod scripts;
pub mod session;
pub mod time;
pub mod uid;
pub mod wire;

pub use error::{Error, Result};
pub use page::PageLocation;
pub use params::{BadgeSize, BadgeTheme, BadgeVersion, Entity, Orientation, RenderParams};
pub use profile::{ProfileData, ProfileLink};
pub use session::{
    BadgeHub, BadgeSession, BadgeSlot, CALLBACK_NAME, Cleanup, DispatchOutcome, FrameInjection,
    Mounted, RequestStatus, ScriptHandle,
};
pub use uid::{NetworkEntropy, NoEntropy, generate_uid};
pub use wire::{LoaderFlags, build_loader_url, encode_uri_component};
