use lapel_core::params::{BadgeSize, BadgeTheme, Orientation, RenderParams};
use lapel_core::profile::ProfileData;
use lapel_core::sanitize::sanitize_href;
use lapel_core::wire::encode_uri_component;
use std::fmt::Write as _;

/// Compact stand-in for the vendor wordmark. The full artwork is styling, not engine state.
const LOGO_FRAGMENT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 84 21" preserveAspectRatio="xMinYMin meet" focusable="false"><rect class="bug" width="21" height="21" rx="2" fill="currentColor"/><text class="wordmark" x="26" y="16" fill="currentColor">LinkedIn</text></svg>"#;

/// Placeholder figure shown when the profile has no image.
const PLACEHOLDER_FIGURE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 128 128"><path fill="#e7e2dc" d="M0 0h128v128H0z"/><circle cx="64" cy="52" r="28" fill="#9db3c8"/><path d="M16 128a48 48 0 0 1 96 0z" fill="#788fa5"/></svg>"##;

#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// Text of the plain fallback link rendered while no profile data is available.
    pub fallback_name: String,
}

/// Card width in display units, driven by size and orientation together.
fn badge_width(size: BadgeSize, orientation: Orientation) -> u32 {
    match (size, orientation) {
        (BadgeSize::Medium, Orientation::Vertical) => 250,
        (BadgeSize::Medium, Orientation::Horizontal) => 280,
        (BadgeSize::Large, Orientation::Vertical) => 300,
        (BadgeSize::Large, Orientation::Horizontal) => 330,
    }
}

/// `lang` attribute value: the locale's language subtag.
fn lang_of(locale: &str) -> &str {
    let lang = locale.split('_').next().unwrap_or_default();
    if lang.is_empty() { "en" } else { lang }
}

fn theme_suffix(theme: BadgeTheme) -> &'static str {
    theme.as_str()
}

/// Default public profile URL for `vanity` with a tracking code.
fn profile_url(vanity: &str, trk: &str) -> String {
    format!(
        "https://www.linkedin.com/in/{}?trk={trk}",
        encode_uri_component(vanity)
    )
}

fn href_attr(href: &str) -> String {
    htmlize::escape_attribute(&sanitize_href(href)).into_owned()
}

/// Renders the self-render badge card for `params`, with or without fetched profile data.
///
/// Pure derivation: the same inputs always produce the same markup. Text is HTML-escaped and
/// every remote-sourced href is sanitized before it lands in an attribute.
pub fn render_badge_html(
    params: &RenderParams,
    profile: Option<&ProfileData>,
    options: &ViewOptions,
) -> String {
    let theme = theme_suffix(params.theme);
    let width = badge_width(params.size, params.orientation);

    let mut out = String::with_capacity(2048);
    let _ = write!(
        out,
        r#"<div class="profile-badge-rendered"><div class="profile-badge profile-badge--width-{width} profile-badge--{theme}" lang="{}" dir="ltr">"#,
        lang_of(&params.locale)
    );

    // Header: wordmark plus an accessible label.
    let _ = write!(
        out,
        r#"<div class="profile-badge__header profile-badge__header--{theme}"><span class="sr-only">LinkedIn</span><i class="profile-badge__header-logo-icon profile-badge__header-logo-icon--{theme}" aria-hidden="true">{LOGO_FRAGMENT}</i></div>"#
    );

    out.push_str(r#"<div class="profile-badge__content">"#);
    if let Some(data) = profile {
        let name = htmlize::escape_text(&data.profile_name);
        if data.profile_image_src.is_empty() {
            let _ = write!(
                out,
                r#"<figure title="{name}" class="profile-badge__content-profile-image">{PLACEHOLDER_FIGURE}</figure>"#,
            );
        } else {
            let _ = write!(
                out,
                r#"<img class="profile-badge__content-profile-image" title="{name}" alt="{name}" src="{}"/>"#,
                href_attr(&data.profile_image_src)
            );
        }

        let name_href = if data.profile_name_link.is_empty() {
            profile_url(&params.vanity, "public-profile-badge-profile-badge-profile-name")
        } else {
            data.profile_name_link.clone()
        };
        let _ = write!(
            out,
            r#"<h3 class="profile-badge__content-profile-name" itemprop="name"><a class="profile-badge__content-profile-name-link profile-badge__content-profile-name-link--{theme}" href="{}" data-tracking-control-name="public-profile-badge-profile-badge-profile-name">{name}</a></h3>"#,
            href_attr(&name_href)
        );

        if !data.profile_headline.is_empty() {
            let _ = write!(
                out,
                r#"<h4 class="profile-badge__content-profile-headline">{}</h4>"#,
                htmlize::escape_text(&data.profile_headline)
            );
        }

        if !data.profile_company_or_school.is_empty() {
            out.push_str(r#"<h4 class="profile-badge__content-profile-company-school-info">"#);
            let last = data.profile_company_or_school.len() - 1;
            for (i, affiliation) in data.profile_company_or_school.iter().enumerate() {
                let _ = write!(
                    out,
                    r#"<a target="_blank" rel="noopener noreferrer" href="{}" class="profile-badge__content-profile-company-school-info-link profile-badge__content-profile-company-school-info-link--{theme}" data-tracking-control-name="public-profile-badge-profile-badge_school-name">{}</a>"#,
                    href_attr(&affiliation.href),
                    htmlize::escape_text(&affiliation.text)
                );
                if i != last {
                    out.push_str(" | ");
                }
            }
            out.push_str("</h4>");
        }
    }
    out.push_str("</div>");

    let cta_href = match profile {
        Some(data) if !data.profile_view_link.is_empty() => data.profile_view_link.clone(),
        _ => profile_url(&params.vanity, "public-profile-badge-profile-badge-view-profile-cta"),
    };
    let _ = write!(
        out,
        r#"<a class="profile-badge__cta-btn profile-badge__cta-btn--{theme}" rel="noopener noreferrer" target="_blank" href="{}" data-tracking-control-name="public-profile-badge-profile-badge-view-profile-cta">View profile</a>"#,
        href_attr(&cta_href)
    );

    if profile.is_none() {
        // No data yet (or the fetch failed): the plain profile link stands in for the card
        // content indefinitely.
        let _ = write!(
            out,
            r#"<a class="badge-base__link profile-badge__simple-link" target="_blank" rel="noopener noreferrer" href="{}">{}</a>"#,
            href_attr(&profile_url(&params.vanity, "profile-badge")),
            htmlize::escape_text(&options.fallback_name)
        );
    }

    out.push_str("</div></div>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapel_core::profile::ProfileLink;

    fn profile() -> ProfileData {
        ProfileData {
            profile_image_src: "https://media.example.com/p.jpg".to_string(),
            profile_name: "Acme Person".to_string(),
            profile_headline: "Platform Tools & Co".to_string(),
            profile_company_or_school: vec![
                ProfileLink {
                    text: "Acme Corp".to_string(),
                    href: "https://www.linkedin.com/company/acme".to_string(),
                },
                ProfileLink {
                    text: "State U".to_string(),
                    href: "https://www.linkedin.com/school/state-u".to_string(),
                },
            ],
            profile_name_link: String::new(),
            profile_view_link: String::new(),
            profile_company_school_link: String::new(),
        }
    }

    #[test]
    fn renders_profile_fields_when_data_is_present() {
        let params = RenderParams::for_vanity("acme");
        let html = render_badge_html(&params, Some(&profile()), &ViewOptions::default());

        assert!(html.contains("profile-badge--width-250"));
        assert!(html.contains("profile-badge--light"));
        assert!(html.contains(r#"lang="en""#));
        assert!(html.contains("Acme Person"));
        assert!(html.contains("Platform Tools &amp; Co"));
        assert!(html.contains("Acme Corp"));
        assert!(html.contains(" | "));
        // With data present there is no plain fallback link.
        assert!(!html.contains("profile-badge__simple-link"));
    }

    #[test]
    fn renders_fallback_link_without_data() {
        let params = RenderParams::for_vanity("acme");
        let options = ViewOptions { fallback_name: "Acme Person".to_string() };
        let html = render_badge_html(&params, None, &options);

        assert!(html.contains("profile-badge__simple-link"));
        assert!(html.contains("https://www.linkedin.com/in/acme?trk=profile-badge"));
        assert!(html.contains(">Acme Person</a>"));
        // The header and CTA render regardless.
        assert!(html.contains("View profile"));
    }

    #[test]
    fn width_table_follows_size_and_orientation() {
        assert_eq!(badge_width(BadgeSize::Medium, Orientation::Vertical), 250);
        assert_eq!(badge_width(BadgeSize::Medium, Orientation::Horizontal), 280);
        assert_eq!(badge_width(BadgeSize::Large, Orientation::Vertical), 300);
        assert_eq!(badge_width(BadgeSize::Large, Orientation::Horizontal), 330);
    }

    #[test]
    fn lang_strips_the_region_subtag() {
        assert_eq!(lang_of("en_US"), "en");
        assert_eq!(lang_of("zh_CN"), "zh");
        assert_eq!(lang_of(""), "en");
    }

    #[test]
    fn dark_theme_flips_the_class_suffixes() {
        let params = RenderParams {
            theme: BadgeTheme::Dark,
            vanity: "acme".to_string(),
            ..RenderParams::default()
        };
        let html = render_badge_html(&params, Some(&profile()), &ViewOptions::default());
        assert!(html.contains("profile-badge--dark"));
        assert!(html.contains("profile-badge__header--dark"));
        assert!(!html.contains("profile-badge--light"));
    }

    #[test]
    fn hostile_hrefs_are_neutralized() {
        let mut data = profile();
        data.profile_view_link = "javascript:alert(1)".to_string();
        data.profile_company_or_school[0].href = "&#106;avascript:alert(1)".to_string();
        let params = RenderParams::for_vanity("acme");
        let html = render_badge_html(&params, Some(&data), &ViewOptions::default());
        assert!(!html.contains("javascript:"));
        assert!(html.contains("about:blank"));
    }

    #[test]
    fn unicode_vanity_is_percent_encoded_in_default_links() {
        let params = RenderParams::for_vanity("\u{262f}liu");
        let html = render_badge_html(&params, None, &ViewOptions::default());
        assert!(html.contains("https://www.linkedin.com/in/%E2%98%AFliu?trk=profile-badge"));
    }
}
