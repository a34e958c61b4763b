use crate::error::{Error, Result};
use crate::page::PageLocation;
use crate::params::RenderParams;
use crate::scripts::{ScriptTag, plan_script_activation};
use crate::time;
use crate::uid::{NetworkEntropy, generate_uid};
use crate::wire::{LoaderFlags, build_loader_url};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

/// The callback name the hosted badge loader invokes. Part of the vendor wire contract; the
/// host page exposes exactly one function under this name and forwards into
/// [`BadgeHub::dispatch`].
pub const CALLBACK_NAME: &str = "LIBadgeCallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Fulfilled,
}

/// One badge container waiting for vendor markup.
#[derive(Debug, Clone, Default)]
pub struct BadgeSlot {
    pub params: RenderParams,
    /// `data-key-*` attributes carried on the container, in attribute order. v2 loader
    /// requests re-emit them as `key-*` query parameters.
    pub extra_keys: IndexMap<String, String>,
    pub flags: LoaderFlags,
}

impl BadgeSlot {
    pub fn new(params: RenderParams) -> Self {
        Self {
            params,
            extra_keys: IndexMap::new(),
            flags: LoaderFlags::default(),
        }
    }

    pub fn with_extra_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_keys.insert(name.into(), value.into());
        self
    }

    pub fn with_flags(mut self, flags: LoaderFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A loader script element appended to the page for one render attempt.
///
/// The element belongs to the session that created it; it is only ever detached through a
/// [`Cleanup`], never by the loader itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHandle {
    pub url: String,
    pub element_id: String,
}

/// Result of mounting one badge: the correlation uid and the script element the host must
/// append to the page body.
#[derive(Debug, Clone)]
pub struct Mounted {
    pub uid: String,
    pub script: ScriptHandle,
}

#[derive(Debug)]
struct BadgeRequest {
    slot: BadgeSlot,
    status: RequestStatus,
    created_at_millis: i64,
}

/// Markup injection for one fulfilled badge.
#[derive(Debug, Clone)]
pub struct FrameInjection {
    pub uid: String,
    /// Complete sub-document to write into the badge's opaque frame.
    pub document: String,
    /// Script tags the host must re-create after injection, in document order. Raw-HTML
    /// injection does not execute embedded scripts.
    pub scripts: Vec<ScriptTag>,
}

/// One-shot teardown of a session's page-visible resources.
#[derive(Debug, Clone)]
pub struct Cleanup {
    /// The callback registration to remove.
    pub callback: String,
    /// Script elements to detach, in insertion order.
    pub scripts: Vec<ScriptHandle>,
}

/// Everything the host must apply after one response dispatch.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub injections: Vec<FrameInjection>,
    pub cleanup: Option<Cleanup>,
}

/// Per-mount-instance correlation state.
///
/// Each widget instance gets its own session: its own pending registry, response counters,
/// script handles, and processed-script set. Responses reach a session either directly (tests,
/// single-widget hosts) or routed through a [`BadgeHub`].
#[derive(Debug)]
pub struct BadgeSession {
    id: Uuid,
    callback: String,
    pending: FxHashMap<String, BadgeRequest>,
    mount_order: Vec<String>,
    scripts: Vec<ScriptHandle>,
    processed_scripts: FxHashSet<String>,
    responses_received: usize,
    expected_responses: usize,
    cleaned: bool,
}

impl Default for BadgeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BadgeSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        let suffix = id.simple().to_string();
        Self {
            id,
            callback: format!("{CALLBACK_NAME}-{}", &suffix[..8]),
            pending: FxHashMap::default(),
            mount_order: Vec::new(),
            scripts: Vec::new(),
            processed_scripts: FxHashSet::default(),
            responses_received: 0,
            expected_responses: 0,
            cleaned: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Instance-scoped callback identity. Hosts that bypass the hub register this name
    /// instead of the shared [`CALLBACK_NAME`], so concurrent instances cannot clobber each
    /// other's handler.
    pub fn callback(&self) -> &str {
        &self.callback
    }

    pub fn responses_received(&self) -> usize {
        self.responses_received
    }

    pub fn expected_responses(&self) -> usize {
        self.expected_responses
    }

    /// Total badges registered over the session's lifetime, fulfilled ones included.
    pub fn badge_count(&self) -> usize {
        self.mount_order.len()
    }

    pub fn status_of(&self, uid: &str) -> Option<RequestStatus> {
        self.pending.get(uid).map(|request| request.status)
    }

    /// When the badge for `uid` was registered, in milliseconds since the epoch.
    pub fn created_at_millis(&self, uid: &str) -> Option<i64> {
        self.pending.get(uid).map(|request| request.created_at_millis)
    }

    pub(crate) fn owns(&self, uid: &str) -> bool {
        self.pending.contains_key(uid)
    }

    /// Registers `slot` and returns the loader request for it, generating the uid.
    ///
    /// `location` must be the page location at call time; the loader URL's host selection is
    /// re-evaluated per call.
    pub async fn mount<E: NetworkEntropy>(
        &mut self,
        slot: BadgeSlot,
        location: &PageLocation,
        entropy: &E,
        skip_network_entropy: bool,
    ) -> Result<Mounted> {
        let uid = generate_uid(&slot.params, location, entropy, skip_network_entropy).await;
        let script = self.mount_with_uid(uid.clone(), slot, location)?;
        Ok(Mounted { uid, script })
    }

    /// Registers `slot` under a caller-supplied uid.
    ///
    /// A uid addresses exactly one slot for the life of the session; re-mounting a live uid
    /// is rejected rather than silently multi-matched.
    pub fn mount_with_uid(
        &mut self,
        uid: String,
        slot: BadgeSlot,
        location: &PageLocation,
    ) -> Result<ScriptHandle> {
        if self.pending.contains_key(&uid) {
            return Err(Error::UidInUse { uid });
        }

        let url = build_loader_url(&slot.params, &uid, location, &slot.extra_keys, slot.flags);
        let script = ScriptHandle {
            url,
            element_id: format!("{}-{}", self.callback, self.scripts.len() + 1),
        };

        tracing::debug!(uid, url = %script.url, "mounting badge");
        self.expected_responses += 1;
        self.pending.insert(
            uid.clone(),
            BadgeRequest {
                slot,
                status: RequestStatus::Pending,
                created_at_millis: time::now_millis(),
            },
        );
        self.mount_order.push(uid);
        self.scripts.push(script.clone());
        Ok(script)
    }

    /// The response entry point: the loader script calls back with `(markup, uid)`.
    ///
    /// Every dispatch counts as a received response, whether or not it matches; unmatched
    /// uids are a silent no-op. A matching Pending badge is fulfilled exactly once, and later
    /// responses for the same uid never re-inject.
    pub fn dispatch(&mut self, markup: &str, uid: &str) -> DispatchOutcome {
        self.responses_received += 1;
        tracing::debug!(
            uid,
            received = self.responses_received,
            expected = self.expected_responses,
            "badge response received"
        );

        let mut injections = Vec::new();
        match self.pending.get_mut(uid) {
            Some(request) if request.status == RequestStatus::Pending => {
                request.status = RequestStatus::Fulfilled;
                let scripts = plan_script_activation(
                    markup,
                    request.slot.flags.create,
                    &mut self.processed_scripts,
                );
                injections.push(FrameInjection {
                    uid: uid.to_string(),
                    document: format!("<body>{markup}</body>"),
                    scripts,
                });
            }
            Some(_) => {
                tracing::debug!(uid, "duplicate response for fulfilled badge ignored");
            }
            None => {
                tracing::debug!(uid, "response matched no pending badge");
            }
        }

        DispatchOutcome {
            injections,
            cleanup: self.try_clean(),
        }
    }

    /// Releases page-visible resources once the session looks complete.
    ///
    /// Complete means the expected-response count was reached (when one was ever set), or the
    /// received count reached the total badge count; the second arm sweeps up sessions whose
    /// expected counter was never maintained. Fires at most once; a fresh mount starts a
    /// fresh session with fresh counters.
    fn try_clean(&mut self) -> Option<Cleanup> {
        if self.cleaned {
            return None;
        }
        let done = (self.expected_responses > 0
            && self.responses_received >= self.expected_responses)
            || self.responses_received >= self.badge_count();
        if !done {
            return None;
        }
        self.cleaned = true;
        tracing::debug!(
            received = self.responses_received,
            expected = self.expected_responses,
            badges = self.badge_count(),
            "cleaning up badge session"
        );
        Some(Cleanup {
            callback: self.callback.clone(),
            scripts: std::mem::take(&mut self.scripts),
        })
    }
}

/// Page-level response router.
///
/// The hosted loader reaches one well-known function name per page ([`CALLBACK_NAME`]).
/// Rather than letting every widget instance overwrite that name with its own closure (only
/// the last writer would ever hear back), the hub stays installed once and routes each
/// `(markup, uid)` to the session that owns the uid.
#[derive(Debug, Default)]
pub struct BadgeHub {
    sessions: Vec<BadgeSession>,
}

impl BadgeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single name the host page registers for the vendor script to call.
    pub fn callback(&self) -> &'static str {
        CALLBACK_NAME
    }

    pub fn create_session(&mut self) -> Uuid {
        let session = BadgeSession::new();
        let id = session.id();
        self.sessions.push(session);
        id
    }

    pub fn session(&self, id: Uuid) -> Option<&BadgeSession> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn session_mut(&mut self, id: Uuid) -> Option<&mut BadgeSession> {
        self.sessions.iter_mut().find(|s| s.id() == id)
    }

    /// Routes one loader callback to the owning session. A uid no session owns is dropped.
    pub fn dispatch(&mut self, markup: &str, uid: &str) -> DispatchOutcome {
        for session in &mut self.sessions {
            if session.owns(uid) {
                return session.dispatch(markup, uid);
            }
        }
        tracing::debug!(uid, "response matched no session");
        DispatchOutcome::default()
    }
}
