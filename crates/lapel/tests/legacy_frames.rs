#![cfg(feature = "render")]

use futures::executor::block_on;
use lapel::render::{DeterministicFrameMeasurer, frames_for_outcome};
use lapel::{
    BadgeSession, BadgeSlot, BadgeVersion, LoaderFlags, NoEntropy, PageLocation, RenderParams,
};

#[test]
fn v2_create_flow_mounts_and_renders_frames() {
    let mut session = BadgeSession::new();
    let location = PageLocation::new("example.com", "/", "");
    let params = RenderParams {
        version: BadgeVersion::V2,
        ..RenderParams::default()
    };
    let slot = BadgeSlot::new(params)
        .with_extra_key("data-key-profile-ref", "ref-7")
        .with_flags(LoaderFlags { ei: false, create: true });

    let mounted = block_on(session.mount(slot, &location, &NoEntropy, true)).unwrap();
    assert!(mounted.script.url.contains("/view?"));
    assert!(mounted.script.url.contains("key-profile-ref=ref-7"));
    assert!(mounted.script.url.ends_with("&fromCreate=true"));

    let outcome = session.dispatch("<div>badge card</div>", &mounted.uid);
    let frames = frames_for_outcome(&outcome, &DeterministicFrameMeasurer::default());
    assert_eq!(frames.len(), 1);
    assert!(frames[0].starts_with("<iframe frameborder=\"0\""));
    assert!(frames[0].contains("badge card"));
    assert!(outcome.cleanup.is_some());
}
