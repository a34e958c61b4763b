use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Replacement for hrefs that decode to an executable scheme.
pub const BLANK_URL: &str = "about:blank";

fn ctrl_entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)&(newline|tab|colon);").expect("valid regex"))
}

fn numeric_entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#x?0*([0-9a-fA-F]+);?").expect("valid regex"))
}

fn is_ctrl_like(ch: char) -> bool {
    matches!(ch,
        '\u{0000}'..='\u{001F}'
        | '\u{007F}'..='\u{009F}'
        | '\u{2000}'..='\u{200D}'
        | '\u{FEFF}'
    )
}

fn decode_numeric_entities(input: &str) -> String {
    numeric_entity_regex()
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let digits = &caps[1];
            let radix = if caps[0].to_ascii_lowercase().starts_with("&#x") { 16 } else { 10 };
            u32::from_str_radix(digits, radix)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .to_string()
}

fn decode_percent_sequences(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push(((hi << 4) | lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}

fn scheme_of(input: &str) -> Option<&str> {
    input.find(':').map(|idx| &input[..idx])
}

fn is_executable_scheme(scheme: &str) -> bool {
    let lower = scheme.to_ascii_lowercase();
    let trimmed =
        lower.trim_start_matches(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'));
    trimmed.starts_with("javascript") || trimmed.starts_with("data") || trimmed.starts_with("vbscript")
}

/// Sanitizes an href arriving from the profile endpoint before it is rendered into badge
/// markup.
///
/// The endpoint is opaque, so links are treated as untrusted: entity, percent, and
/// control-character obfuscation is peeled off iteratively until the string is stable, then
/// executable schemes are replaced with [`BLANK_URL`]. Relative paths and fragments pass
/// through; absolute http(s) URLs are re-serialized with a normalized scheme and host.
pub fn sanitize_href(href: &str) -> String {
    if href.is_empty() {
        return BLANK_URL.to_string();
    }

    let mut decoded = href.trim().to_string();
    loop {
        let stripped = ctrl_entity_regex().replace_all(&decoded, "");
        let unescaped = decode_percent_sequences(&decode_numeric_entities(&stripped));
        let next: String = unescaped.chars().filter(|ch| !is_ctrl_like(*ch)).collect();
        let next = next.trim().to_string();
        if next == decoded {
            break;
        }
        decoded = next;
    }

    if decoded.is_empty() {
        return BLANK_URL.to_string();
    }
    if matches!(decoded.as_bytes().first(), Some(b'.' | b'/' | b'#' | b'?')) {
        return decoded;
    }

    let Some(scheme) = scheme_of(&decoded) else {
        // Schemeless (e.g. `www.example.com`): nothing executable to block.
        return decoded;
    };
    if is_executable_scheme(scheme) {
        return BLANK_URL.to_string();
    }

    let lower = scheme.to_ascii_lowercase();
    if lower == "http" || lower == "https" {
        let Ok(parsed) = Url::parse(&decoded) else {
            return BLANK_URL.to_string();
        };
        return parsed.to_string();
    }

    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_profile_links_pass_through() {
        assert_eq!(
            sanitize_href("https://www.linkedin.com/in/acme?trk=profile-badge"),
            "https://www.linkedin.com/in/acme?trk=profile-badge"
        );
        assert_eq!(sanitize_href("/in/acme"), "/in/acme");
        assert_eq!(sanitize_href("#top"), "#top");
        assert_eq!(sanitize_href("mailto:team@example.com"), "mailto:team@example.com");
        assert_eq!(sanitize_href("www.example.com"), "www.example.com");
    }

    #[test]
    fn executable_schemes_are_blanked() {
        for href in [
            "javascript:alert(1)",
            "JaVaScRiPt:alert(1)",
            "  javascript:alert(1)",
            "data:text/html;base64,PHNjcmlwdD4=",
            "vbscript:msgbox",
        ] {
            assert_eq!(sanitize_href(href), BLANK_URL, "{href}");
        }
    }

    #[test]
    fn entity_and_percent_obfuscation_is_peeled() {
        assert_eq!(sanitize_href("java&Tab;script:alert(1)"), BLANK_URL);
        assert_eq!(sanitize_href("&#106;avascript:alert(1)"), BLANK_URL);
        assert_eq!(sanitize_href("&#x6A;avascript:alert(1)"), BLANK_URL);
        assert_eq!(sanitize_href("javascrip%74:alert(1)"), BLANK_URL);
        // Double-encoded percent sequences need a second pass.
        assert_eq!(sanitize_href("javascrip%2574:alert(1)"), BLANK_URL);
    }

    #[test]
    fn control_characters_are_stripped() {
        assert_eq!(
            sanitize_href("https://example.com/\u{200B}in/\u{0000}acme"),
            "https://example.com/in/acme"
        );
        assert_eq!(sanitize_href("\u{0009}javascript:alert(1)"), BLANK_URL);
    }

    #[test]
    fn empty_and_unparseable_inputs_blank() {
        assert_eq!(sanitize_href(""), BLANK_URL);
        assert_eq!(sanitize_href("https://exa mple.com/"), BLANK_URL);
    }
}
