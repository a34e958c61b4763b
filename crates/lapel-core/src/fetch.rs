use crate::cache::{self, ProfileStore};
use crate::params::{BadgeVersion, RenderParams};
use crate::profile::ProfileData;
use serde::Serialize;

/// JSON body posted to the profile endpoint.
///
/// The key set is version-conditional: v2 sends `badgesize` + `entity`, v1 sends `maxsize` +
/// `trk` + `vanityname`. `fromCreate` is present (as the string `"true"`) only for
/// create-flow renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRequest {
    pub badgetype: String,
    pub badgetheme: String,
    pub locale: String,
    pub uid: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badgesize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxsize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vanityname: Option<String>,
    #[serde(rename = "fromCreate", skip_serializing_if = "Option::is_none")]
    pub from_create: Option<String>,
}

impl ProfileRequest {
    pub fn new(params: &RenderParams, uid: &str, create: bool) -> Self {
        let mut request = Self {
            badgetype: params.orientation.as_str().to_string(),
            badgetheme: params.theme.as_str().to_string(),
            locale: params.locale.clone(),
            uid: uid.to_string(),
            version: params.version.as_str().to_string(),
            badgesize: None,
            entity: None,
            maxsize: None,
            trk: None,
            vanityname: None,
            from_create: create.then(|| "true".to_string()),
        };
        match params.version {
            BadgeVersion::V2 => {
                request.badgesize = Some(params.size.as_str().to_string());
                request.entity = Some(params.entity.as_str().to_string());
            }
            BadgeVersion::V1 => {
                request.maxsize = Some(params.size.as_str().to_string());
                request.trk = Some(params.tracking.clone());
                request.vanityname = Some(params.vanity.clone());
            }
        }
        request
    }
}

/// Opaque remote source of structured profile data.
///
/// The endpoint's internals are not this crate's concern; implementations POST the request
/// body and decode the JSON response. The `http` feature of the `lapel` facade provides one.
///
/// As with [`crate::uid::NetworkEntropy`], the engine runs on the host's single-threaded
/// event loop and imposes no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait ProfileSource {
    async fn fetch_profile(&self, request: &ProfileRequest) -> crate::Result<ProfileData>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Bypass the cache read (the write still happens).
    pub no_cache: bool,
    /// The render originates from a profile-creation flow.
    pub create: bool,
}

/// The self-render data flow: cache read, fetch on miss, headline decode, cache write.
///
/// Every failure is absorbed: a fetch error, a non-usable cached record, or a cache-write
/// error all leave the caller with `None` and the plain-link fallback presentation. Nothing
/// here retries.
pub async fn load_profile<S, P>(
    store: &S,
    source: &P,
    params: &RenderParams,
    uid: &str,
    options: LoadOptions,
) -> Option<ProfileData>
where
    S: ProfileStore + ?Sized,
    P: ProfileSource,
{
    let key = params.cache_key();
    if let Some(record) = cache::get_cached(store, &key, options.no_cache) {
        tracing::debug!(key = %key, "serving profile from cache");
        return Some(record);
    }

    let request = ProfileRequest::new(params, uid, options.create);
    let record = match source.fetch_profile(&request).await {
        Ok(record) => record.with_decoded_headline(),
        Err(err) => {
            tracing::debug!(%err, "profile fetch failed; keeping fallback presentation");
            return None;
        }
    };

    if let Err(err) = cache::put_cached(store, &key, &record) {
        tracing::debug!(key = %key, %err, "profile fetched but not cached");
    }
    Some(record)
}
