//! `reqwest`-backed implementations of the engine's remote interfaces.

use lapel_core::error::Error;
use lapel_core::fetch::{ProfileRequest, ProfileSource};
use lapel_core::profile::ProfileData;
use lapel_core::uid::NetworkEntropy;
use serde::Deserialize;

/// Default public endpoint for the self-render profile API.
pub const DEFAULT_PROFILE_ENDPOINT: &str = "https://ziping.liu.academy/api/v2/linkedin/profile/";

const IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// POSTs [`ProfileRequest`] bodies to the profile endpoint.
#[derive(Debug, Clone)]
pub struct HttpProfileSource {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for HttpProfileSource {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_PROFILE_ENDPOINT.to_string(),
        }
    }
}

impl HttpProfileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl ProfileSource for HttpProfileSource {
    async fn fetch_profile(&self, request: &ProfileRequest) -> lapel_core::Result<ProfileData> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| Error::Fetch { message: err.to_string() })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                message: format!("profile endpoint returned {status}"),
            });
        }
        response
            .json::<ProfileData>()
            .await
            .map_err(|err| Error::Fetch { message: err.to_string() })
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    ip: String,
}

/// Public-IP entropy via the ipify lookup service. Every failure resolves `None`; UID
/// generation proceeds without the extra entropy.
#[derive(Debug, Clone, Default)]
pub struct IpifyEntropy {
    client: reqwest::Client,
}

impl IpifyEntropy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NetworkEntropy for IpifyEntropy {
    async fn public_ip(&self) -> Option<String> {
        let response = self.client.get(IP_LOOKUP_URL).send().await.ok()?;
        response.json::<IpLookupResponse>().await.ok().map(|body| body.ip)
    }
}
