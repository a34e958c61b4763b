use lol_html::{RewriteStrSettings, element, rewrite_str};
use rustc_hash::FxHashSet;
use std::fmt::Write as _;

/// Marker the vendor's design-system loader stamps on script tags it already manages.
/// Create-page renders must not re-execute those.
const ARTDECO_MARKER: &str = "data-isartdeco";

/// A script element to re-create so the host actually executes it.
///
/// Markup assigned via raw HTML injection does not run embedded `<script>` tags; the browser
/// only executes a script element that is newly inserted. Re-creating the tag with a full,
/// order-preserving attribute copy forces that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub attributes: Vec<(String, String)>,
}

impl ScriptTag {
    pub fn src(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == "src")
            .map(|(_, value)| value.as_str())
    }

    /// Serializes the replacement element.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<script");
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", htmlize::escape_attribute(value));
        }
        out.push_str("></script>");
        out
    }
}

/// Plans which script descendants of `markup` need re-execution.
///
/// Walks every `<script>` in document order. A script is skipped when its `src` is already in
/// `processed` (scripts surfacing in more than one traversal run once), or, on create-page
/// renders, when it carries the vendor's already-handled marker. Each planned script's `src`
/// is recorded in `processed` before returning.
///
/// Markup that fails to rewrite is absorbed: whatever was collected before the failure is
/// returned and the failure is logged.
pub fn plan_script_activation(
    markup: &str,
    create_page: bool,
    processed: &mut FxHashSet<String>,
) -> Vec<ScriptTag> {
    if markup.is_empty() {
        return Vec::new();
    }

    let mut tags: Vec<ScriptTag> = Vec::new();
    let result = rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: vec![element!("script", |el| {
                let attributes: Vec<(String, String)> = el
                    .attributes()
                    .iter()
                    .map(|a| (a.name().to_string(), a.value().to_string()))
                    .collect();

                // Inline scripts key on the empty src, so only the first one re-executes.
                let src = attributes
                    .iter()
                    .find(|(name, _)| name == "src")
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default();

                if processed.contains(&src) {
                    return Ok(());
                }
                if create_page && attributes.iter().any(|(name, _)| name == ARTDECO_MARKER) {
                    return Ok(());
                }

                processed.insert(src);
                tags.push(ScriptTag { attributes });
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    if let Err(err) = result {
        tracing::debug!(%err, "badge markup rewrite failed; partial script plan kept");
    }

    tags
}
