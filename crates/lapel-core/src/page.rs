/// Snapshot of the host page's location, taken at call time.
///
/// Consumers pass the *current* location into each call that needs it (UID generation, loader
/// URL construction). Host pages with client-side routing can change hostname between mounts,
/// so none of the derived values are cached here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub hostname: String,
    pub pathname: String,
    /// Query string, including the leading `?` when present.
    pub search: String,
}

impl PageLocation {
    pub fn new(
        hostname: impl Into<String>,
        pathname: impl Into<String>,
        search: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            pathname: pathname.into(),
            search: search.into(),
        }
    }
}

/// China-region host pages are served badges from the `.cn` vendor domain.
pub fn is_cn_domain(hostname: &str) -> bool {
    hostname.ends_with("linkedin.cn") || hostname.ends_with("linkedin-ei.cn")
}

/// Base URL of the hosted badge loader, with a trailing slash.
///
/// `ei` selects the vendor's early-internal environment.
pub fn loader_base_url(location: &PageLocation, ei: bool) -> String {
    let prefix = if ei {
        "https://badges.linkedin-ei"
    } else {
        "https://badges.linkedin"
    };
    if is_cn_domain(&location.hostname) {
        format!("{prefix}.cn/")
    } else {
        format!("{prefix}.com/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cn_domains_select_the_cn_host() {
        let cn = PageLocation::new("www.linkedin.cn", "/", "");
        let ei_cn = PageLocation::new("dev.linkedin-ei.cn", "/", "");
        let com = PageLocation::new("example.com", "/", "");

        assert_eq!(loader_base_url(&cn, false), "https://badges.linkedin.cn/");
        assert_eq!(loader_base_url(&ei_cn, false), "https://badges.linkedin.cn/");
        assert_eq!(loader_base_url(&com, false), "https://badges.linkedin.com/");
        assert_eq!(loader_base_url(&com, true), "https://badges.linkedin-ei.com/");
        assert_eq!(loader_base_url(&cn, true), "https://badges.linkedin-ei.cn/");
    }

    #[test]
    fn cn_check_requires_the_suffix() {
        assert!(!is_cn_domain("linkedin.com"));
        assert!(!is_cn_domain("linkedin.cn.example.com"));
        assert!(is_cn_domain("linkedin.cn"));
        assert!(is_cn_domain("linkedin-ei.cn"));
    }
}
