use crate::page::{PageLocation, loader_base_url};
use crate::params::{BadgeVersion, RenderParams};
use indexmap::IndexMap;
use std::fmt::Write as _;

/// Attribute-name prefix for extra parameters carried on a badge container.
///
/// v2 loader requests re-emit each one as `key-<name>=<value>`.
pub const DATA_KEY_PREFIX: &str = "data-key-";

/// Percent-encodes `input` with JavaScript `encodeURIComponent` semantics.
///
/// The hosted loader unescapes parameters the way a browser would have escaped them, so the
/// unreserved set must match exactly: ASCII alphanumerics and `- _ . ! ~ * ' ( )`. Everything
/// else is emitted as uppercase-hex UTF-8 byte escapes.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(*byte as char),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

/// Per-mount flags that shape the loader request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderFlags {
    /// Target the vendor's early-internal environment.
    pub ei: bool,
    /// The render originates from a profile-creation flow.
    pub create: bool,
}

/// Builds the hosted badge loader URL for one render attempt.
///
/// The query-parameter order is part of the wire contract: `locale`, `badgetype`,
/// `badgetheme`, `uid`, `version`, then the version-specific tail (`badgesize`, `entity` and
/// re-emitted `data-key-*` attributes for v2; `maxsize`, `trk`, `vanityname` for v1), with
/// `fromCreate=true` appended last for create-flow renders. Every value is encoded
/// individually before joining.
///
/// `location` must be the page location at call time: the China-region host selection depends
/// on the current hostname and is re-evaluated on every call.
pub fn build_loader_url(
    params: &RenderParams,
    uid: &str,
    location: &PageLocation,
    extra_keys: &IndexMap<String, String>,
    flags: LoaderFlags,
) -> String {
    let mut base = loader_base_url(location, flags.ei);
    base.push_str(match params.version {
        BadgeVersion::V2 => "view",
        BadgeVersion::V1 => "profile",
    });

    let mut query = vec![
        format!("locale={}", encode_uri_component(&params.locale)),
        format!("badgetype={}", encode_uri_component(params.orientation.as_str())),
        format!("badgetheme={}", encode_uri_component(params.theme.as_str())),
        format!("uid={}", encode_uri_component(uid)),
        format!("version={}", encode_uri_component(params.version.as_str())),
    ];

    match params.version {
        BadgeVersion::V2 => {
            query.push(format!("badgesize={}", encode_uri_component(params.size.as_str())));
            query.push(format!("entity={}", encode_uri_component(params.entity.as_str())));
            for (name, value) in extra_keys {
                let Some(key) = name.strip_prefix("data-") else {
                    continue;
                };
                if !key.starts_with("key-") {
                    continue;
                }
                query.push(format!(
                    "{}={}",
                    encode_uri_component(&key.to_ascii_lowercase()),
                    encode_uri_component(value)
                ));
            }
        }
        BadgeVersion::V1 => {
            query.push(format!("maxsize={}", encode_uri_component(params.size.as_str())));
            query.push(format!("trk={}", encode_uri_component(&params.tracking)));
            query.push(format!("vanityname={}", encode_uri_component(&params.vanity)));
        }
    }

    if flags.create {
        query.push("fromCreate=true".to_string());
    }

    format!("{base}?{}", query.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BadgeTheme, Entity, Orientation};

    fn location() -> PageLocation {
        PageLocation::new("example.com", "/", "")
    }

    #[test]
    fn encode_uri_component_matches_js_semantics() {
        assert_eq!(encode_uri_component("acme"), "acme");
        assert_eq!(encode_uri_component("a b&c"), "a%20b%26c");
        // Unreserved marks survive unencoded.
        assert_eq!(encode_uri_component("-_.!~*'()"), "-_.!~*'()");
        // Multi-byte UTF-8 is escaped per byte.
        assert_eq!(encode_uri_component("\u{262f}liu"), "%E2%98%AFliu");
    }

    #[test]
    fn v1_url_carries_the_profile_tail() {
        let params = RenderParams::for_vanity("acme");
        let url = build_loader_url(&params, "12345", &location(), &IndexMap::new(), LoaderFlags::default());
        assert_eq!(
            url,
            "https://badges.linkedin.com/profile?locale=en_US&badgetype=VERTICAL&badgetheme=light\
             &uid=12345&version=v1&maxsize=medium&trk=profile-badge&vanityname=acme"
        );
    }

    #[test]
    fn v2_url_carries_size_entity_and_data_keys() {
        let params = RenderParams {
            version: BadgeVersion::V2,
            theme: BadgeTheme::Dark,
            entity: Entity::Company,
            orientation: Orientation::Horizontal,
            ..RenderParams::default()
        };
        let mut extra = IndexMap::new();
        extra.insert("data-key-profile-ref".to_string(), "a b".to_string());
        let url = build_loader_url(&params, "7", &location(), &extra, LoaderFlags::default());

        assert!(url.starts_with("https://badges.linkedin.com/view?"));
        assert!(url.contains("badgetype=HORIZONTAL"));
        assert!(url.contains("badgetheme=dark"));
        assert!(url.contains("badgesize=medium"));
        assert!(url.contains("entity=COMPANY"));
        assert!(url.contains("key-profile-ref=a%20b"));
        // v1-only parameters must not leak into v2 requests.
        assert!(!url.contains("maxsize="));
        assert!(!url.contains("vanityname="));
        assert!(!url.contains("trk="));
    }

    #[test]
    fn non_key_data_attributes_are_not_emitted() {
        let params = RenderParams {
            version: BadgeVersion::V2,
            ..RenderParams::default()
        };
        let mut extra = IndexMap::new();
        extra.insert("data-theme".to_string(), "dark".to_string());
        extra.insert("id".to_string(), "badge-1".to_string());
        let url = build_loader_url(&params, "7", &location(), &extra, LoaderFlags::default());
        assert!(!url.contains("theme=dark"));
        assert!(!url.contains("badge-1"));
    }

    #[test]
    fn create_flow_appends_from_create_last() {
        let params = RenderParams::for_vanity("acme");
        let url = build_loader_url(
            &params,
            "9",
            &location(),
            &IndexMap::new(),
            LoaderFlags { ei: false, create: true },
        );
        assert!(url.ends_with("&fromCreate=true"));
    }

    #[test]
    fn cn_hostname_switches_the_base_on_every_call() {
        let params = RenderParams::for_vanity("acme");
        let com = build_loader_url(&params, "1", &location(), &IndexMap::new(), LoaderFlags::default());
        let cn = build_loader_url(
            &params,
            "1",
            &PageLocation::new("app.linkedin.cn", "/", ""),
            &IndexMap::new(),
            LoaderFlags::default(),
        );
        assert!(com.starts_with("https://badges.linkedin.com/"));
        assert!(cn.starts_with("https://badges.linkedin.cn/"));
    }
}
