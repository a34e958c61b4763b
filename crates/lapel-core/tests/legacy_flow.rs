use futures::executor::block_on;
use lapel_core::{BadgeSession, BadgeSlot, NoEntropy, PageLocation, RenderParams};

#[test]
fn single_badge_mount_to_cleanup() {
    let mut session = BadgeSession::new();
    let location = PageLocation::new("example.com", "/about", "?hl=en");
    let slot = BadgeSlot::new(RenderParams::for_vanity("acme"));

    let mounted = lapel_core::time::with_fixed_now_millis(Some(1_700_000_000_000), || {
        block_on(session.mount(slot, &location, &NoEntropy, true))
    })
    .unwrap();

    let (path, query) = mounted.script.url.split_once('?').expect("url has a query");
    assert!(path.ends_with("/profile"));
    assert!(query.split('&').any(|p| p == "maxsize=medium"));
    assert!(query.split('&').any(|p| p == "vanityname=acme"));
    assert!(query.split('&').any(|p| p == format!("uid={}", mounted.uid)));

    let outcome = session.dispatch("<div>X</div>", &mounted.uid);
    assert_eq!(outcome.injections.len(), 1);
    assert!(outcome.injections[0].document.contains("X"));

    let cleanup = outcome.cleanup.expect("single badge completes on first response");
    assert_eq!(cleanup.callback, session.callback());
    assert_eq!(cleanup.scripts, vec![mounted.script]);
}

#[test]
fn concurrent_badges_resolve_out_of_order() {
    let mut session = BadgeSession::new();
    let location = PageLocation::new("example.com", "/", "");

    let mut uids = Vec::new();
    for (i, vanity) in ["alpha", "beta", "gamma"].iter().enumerate() {
        let uid = format!("{}", 1000 + i);
        session
            .mount_with_uid(uid.clone(), BadgeSlot::new(RenderParams::for_vanity(*vanity)), &location)
            .unwrap();
        uids.push(uid);
    }

    // Responses arrive in reverse order; each lands on its own badge.
    assert!(session.dispatch("<p>g</p>", &uids[2]).cleanup.is_none());
    assert!(session.dispatch("<p>b</p>", &uids[1]).cleanup.is_none());
    let last = session.dispatch("<p>a</p>", &uids[0]);
    assert_eq!(last.injections[0].document, "<body><p>a</p></body>");
    assert!(last.cleanup.is_some());
}
