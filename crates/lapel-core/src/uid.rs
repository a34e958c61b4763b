use crate::page::PageLocation;
use crate::params::RenderParams;
use crate::time;

/// Best-effort network entropy for UID generation.
///
/// The engine folds the caller's public IP address into badge UIDs so that two visitors
/// mounting identical badges on the same URL still get distinct identifiers. The lookup is
/// strictly optional: implementations resolve `None` on any failure and must not retry.
///
/// The engine runs on the host's single-threaded event loop, so no `Send` bound is imposed
/// on implementations.
#[allow(async_fn_in_trait)]
pub trait NetworkEntropy {
    async fn public_ip(&self) -> Option<String>;
}

/// Entropy source that never performs a lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntropy;

impl NetworkEntropy for NoEntropy {
    async fn public_ip(&self) -> Option<String> {
        None
    }
}

/// One multiply-accumulate pass over a string's UTF-16 code units.
///
/// `hash * 31 + code` in wrapping i32 arithmetic, the classic string-hash construction.
fn fold(mut hash: i32, text: &str) -> i32 {
    for unit in text.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(unit as i32);
    }
    hash
}

/// Generates the correlation identifier for one badge render attempt.
///
/// Folds, in order: every non-empty render-parameter value (see
/// [`RenderParams`] for the documented field order), the page hostname, pathname, and query
/// string, the public IP address when `skip_network_entropy` is false (a failed lookup folds
/// nothing), and finally the current timestamp in milliseconds. The result is the unsigned
/// 32-bit value of the accumulated hash, in decimal string form.
///
/// Because the timestamp lands last, two calls with identical inputs produce different UIDs.
/// This is a collision-avoidance token for response correlation, not a content hash.
pub async fn generate_uid<E: NetworkEntropy>(
    params: &RenderParams,
    location: &PageLocation,
    entropy: &E,
    skip_network_entropy: bool,
) -> String {
    let mut hash: i32 = 0;
    for field in params.uid_fields() {
        if !field.is_empty() {
            hash = fold(hash, field);
        }
    }
    if !location.hostname.is_empty() {
        hash = fold(hash, &location.hostname);
    }
    if !location.pathname.is_empty() {
        hash = fold(hash, &location.pathname);
    }
    if !location.search.is_empty() {
        hash = fold(hash, &location.search);
    }

    if !skip_network_entropy {
        if let Some(ip) = entropy.public_ip().await {
            hash = fold(hash, &ip);
        }
    }

    // The timestamp fold is widened to i64 so the truncation below behaves like a ToUint32
    // coercion of the unclamped sum rather than saturating.
    let wide = (hash as i64).wrapping_mul(31).wrapping_add(time::now_millis());
    (wide as u32).to_string()
}
