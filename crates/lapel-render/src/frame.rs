use lapel_core::session::FrameInjection;
use serde::{Deserialize, Serialize};

/// Fallback width when the frame's natural content size cannot be measured.
pub const DEFAULT_FRAME_WIDTH: u32 = 330;
/// Fallback height when the frame's natural content size cannot be measured.
pub const DEFAULT_FRAME_HEIGHT: u32 = 300;

/// Some badge content is clipped exactly at its natural bounding box; the displayed frame
/// gets this much slack on both dimensions.
const FRAME_SIZE_BUFFER: u32 = 5;

/// Natural content size of a rendered frame document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub width: u32,
    pub height: u32,
}

/// Measures the natural size of an injected sub-document.
///
/// In a live host this is the frame's scroll size on load; headless consumers plug in a
/// heuristic or fixture-driven implementation.
pub trait FrameMeasurer {
    fn measure(&self, document: &str) -> FrameMetrics;
}

/// Heuristic measurer for headless rendering and tests: width follows the longest text run,
/// height follows the number of block-ish breaks. Zero-configuration fields fall back to
/// typical badge glyph metrics.
#[derive(Debug, Clone, Default)]
pub struct DeterministicFrameMeasurer {
    pub char_width: u32,
    pub line_height: u32,
}

impl FrameMeasurer for DeterministicFrameMeasurer {
    fn measure(&self, document: &str) -> FrameMetrics {
        let char_width = if self.char_width == 0 { 7 } else { self.char_width };
        let line_height = if self.line_height == 0 { 18 } else { self.line_height };

        let mut lines = 0u32;
        let mut longest = 0u32;
        for line in text_lines(document) {
            let len = line.trim().chars().count() as u32;
            if len == 0 {
                continue;
            }
            lines += 1;
            longest = longest.max(len);
        }

        FrameMetrics {
            width: longest * char_width,
            height: lines * line_height,
        }
    }
}

/// Splits a document into text runs, treating tags as boundaries.
fn text_lines(document: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_tag = false;
    for ch in document.chars() {
        match ch {
            '<' => {
                in_tag = true;
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            '>' => in_tag = false,
            _ if !in_tag => current.push(ch),
            _ => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Computes the displayed frame size from measured content.
///
/// Zero measurements fall back to the 330×300 defaults; both dimensions then get the 5-unit
/// buffer.
pub fn sized_frame(metrics: FrameMetrics) -> (u32, u32) {
    let width = if metrics.width == 0 { DEFAULT_FRAME_WIDTH } else { metrics.width };
    let height = if metrics.height == 0 { DEFAULT_FRAME_HEIGHT } else { metrics.height };
    (width + FRAME_SIZE_BUFFER, height + FRAME_SIZE_BUFFER)
}

/// Serializes one injection as an inline frame element.
///
/// The sub-document travels in `srcdoc`, so the host can insert the element as-is without a
/// separate document-write step.
pub fn frame_html(injection: &FrameInjection, measurer: &dyn FrameMeasurer) -> String {
    let (width, height) = sized_frame(measurer.measure(&injection.document));
    format!(
        r#"<iframe frameborder="0" style="display: block;" width="{width}" height="{height}" srcdoc="{}"></iframe>"#,
        htmlize::escape_attribute(&injection.document)
    )
}
