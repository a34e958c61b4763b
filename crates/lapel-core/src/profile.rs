use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One company/school affiliation line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileLink {
    pub text: String,
    pub href: String,
}

/// Structured profile data returned by the profile endpoint.
///
/// Every field defaults so a partial response still deserializes; downstream validity checks
/// (a usable record needs a name) are applied where the data is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileData {
    pub profile_image_src: String,
    pub profile_name: String,
    pub profile_headline: String,
    pub profile_company_or_school: Vec<ProfileLink>,
    pub profile_name_link: String,
    pub profile_view_link: String,
    pub profile_company_school_link: String,
}

impl ProfileData {
    /// Returns the record with its headline decoded for display.
    pub fn with_decoded_headline(mut self) -> Self {
        self.profile_headline = decode_headline(&self.profile_headline);
        self
    }
}

fn unicode_escape_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Only runs of two or more consecutive escapes are rewritten; a single `\uXXXX` is
    // assumed to be literal text.
    RE.get_or_init(|| Regex::new(r"((?:\\u[0-9A-Fa-f]{4}){2,})").expect("valid regex"))
}

/// Decodes headline text as delivered by the profile endpoint.
///
/// Headlines can arrive double-encoded: a run of literal `\uXXXX` escape sequences is
/// re-parsed as JSON string content and substituted back, then HTML entities are unescaped
/// (`&amp;` -> `&`). A run that fails to re-parse (e.g. a lone surrogate) is left as-is.
pub fn decode_headline(input: &str) -> String {
    let mut text = input.to_string();
    if let Some(caps) = unicode_escape_run_regex().captures(input) {
        let run = caps.get(1).expect("group 1 always participates").as_str();
        if let Ok(decoded) = serde_json::from_str::<String>(&format!("\"{run}\"")) {
            text = text.replacen(run, &decoded, 1);
        }
    }
    htmlize::unescape(&text).into_owned()
}
