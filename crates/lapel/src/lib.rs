#![forbid(unsafe_code)]

//! `lapel` renders embeddable profile badges without a DOM.
//!
//! The engine ([`lapel_core`], re-exported here) correlates concurrently in-flight badge
//! renders with the containers that requested them, speaks the hosted badge loader's wire
//! contract, and keeps an expiring local cache of fetched profile data.
//!
//! # Features
//!
//! - `render` (default): badge markup + frame sizing (`lapel::render`)
//! - `http`: `reqwest`-backed profile fetch and public-IP entropy (`lapel::http`)

pub use lapel_core::*;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "render")]
pub mod render {
    pub use lapel_render::frame::{
        DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DeterministicFrameMeasurer, FrameMeasurer,
        FrameMetrics, frame_html, sized_frame,
    };
    pub use lapel_render::view::{ViewOptions, render_badge_html};

    use lapel_core::cache::ProfileStore;
    use lapel_core::fetch::{LoadOptions, ProfileSource, load_profile};
    use lapel_core::page::PageLocation;
    use lapel_core::params::RenderParams;
    use lapel_core::session::DispatchOutcome;
    use lapel_core::uid::{NetworkEntropy, generate_uid};

    #[derive(Debug, Clone, Default)]
    pub struct SelfRenderOptions {
        /// Generate the UID without the public-IP lookup.
        pub skip_network_entropy: bool,
        pub load: LoadOptions,
        pub view: ViewOptions,
    }

    /// The complete self-render flow: UID generation, cache/fetch, markup.
    ///
    /// Always returns markup. When no usable data could be produced (fetch failed and the
    /// cache had nothing fresh), the markup carries the plain-link fallback instead of the
    /// profile card.
    pub async fn self_render_badge<S, P, E>(
        store: &S,
        source: &P,
        entropy: &E,
        params: &RenderParams,
        location: &PageLocation,
        options: &SelfRenderOptions,
    ) -> String
    where
        S: ProfileStore + ?Sized,
        P: ProfileSource,
        E: NetworkEntropy,
    {
        let uid = generate_uid(params, location, entropy, options.skip_network_entropy).await;
        let profile = load_profile(store, source, params, &uid, options.load).await;
        render_badge_html(params, profile.as_ref(), &options.view)
    }

    /// Serializes every injection of a dispatch outcome as inline frame markup, in order.
    pub fn frames_for_outcome(outcome: &DispatchOutcome, measurer: &dyn FrameMeasurer) -> Vec<String> {
        outcome
            .injections
            .iter()
            .map(|injection| frame_html(injection, measurer))
            .collect()
    }
}
