//! Structured page text and text-in-rectangle extraction.
//!
//! The rendering collaborator groups glyphs into lines and blocks. Table
//! detection uses that structure for the text-driven fallback strategies and
//! to fill cell text once a table has been assembled.

use crate::geometry::BBox;

/// Font size assumed when a page carries no glyphs.
pub const DEFAULT_BODY_FONT_SIZE: f64 = 12.0;

/// Margin around a rectangle inside which glyph centres still count.
const RECT_MARGIN: f64 = 2.0;

/// A single positioned glyph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextChar {
    /// The character (decoded glyph code).
    pub c: char,
    /// Font size in points.
    pub size: f64,
    /// Glyph bounding box.
    pub bbox: BBox,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bold: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub italic: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mono: bool,
}

impl TextChar {
    pub fn new(c: char, size: f64, bbox: BBox) -> Self {
        Self {
            c,
            size,
            bbox,
            bold: false,
            italic: false,
            mono: false,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.c.is_whitespace()
    }
}

/// A line of glyphs in reading order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    pub bbox: BBox,
    pub chars: Vec<TextChar>,
}

impl TextLine {
    /// Build a line, computing its bbox from the glyphs.
    pub fn from_chars(chars: Vec<TextChar>) -> Option<Self> {
        let bbox = chars
            .iter()
            .map(|c| c.bbox)
            .reduce(|a, b| a.union(&b))?;
        Some(Self { bbox, chars })
    }

    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.c).collect()
    }
}

/// A block of lines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextBlock {
    pub bbox: BBox,
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    pub fn from_lines(lines: Vec<TextLine>) -> Option<Self> {
        let bbox = lines
            .iter()
            .map(|l| l.bbox)
            .reduce(|a, b| a.union(&b))?;
        Some(Self { bbox, lines })
    }
}

/// The structured text of one page.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPage {
    pub blocks: Vec<TextBlock>,
}

impl TextPage {
    pub fn new(blocks: Vec<TextBlock>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.chars().next().is_none()
    }

    /// All lines in block order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// All glyphs in reading order.
    pub fn chars(&self) -> impl Iterator<Item = &TextChar> {
        self.lines().flat_map(|l| l.chars.iter())
    }

    /// Most common glyph size (rounded to the nearest point).
    ///
    /// Ties resolve to the smaller size. Returns [`DEFAULT_BODY_FONT_SIZE`]
    /// for a page without sized glyphs.
    pub fn body_font_size(&self) -> f64 {
        let mut counts: Vec<(i64, usize)> = Vec::new();
        for ch in self.chars() {
            if ch.size <= 0.0 || !ch.size.is_finite() || ch.is_whitespace() {
                continue;
            }
            let key = ch.size.round() as i64;
            match counts.iter_mut().find(|(k, _)| *k == key) {
                Some((_, n)) => *n += 1,
                None => counts.push((key, 1)),
            }
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map_or(DEFAULT_BODY_FONT_SIZE, |(k, _)| k as f64)
    }
}

fn is_punct_or_digit(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_numeric()
}

/// Extract spaced text for glyphs whose centre lies inside `rect`.
///
/// A space is inserted between consecutive glyphs when the vertical jump
/// exceeds `max(0.3 × size, 2)` or the horizontal gap exceeds
/// `max(0.5 × size, 3)`. Next to punctuation or digits those thresholds widen
/// to at least 10 and 8. The result is trimmed with NBSP normalized and runs
/// of spaces collapsed.
pub fn extract_text_in_rect(page: &TextPage, rect: &BBox) -> String {
    let mut buf = String::new();
    let mut prev: Option<&TextChar> = None;

    for ch in page.chars() {
        if ch.c == '\0' || ch.c == '\u{feff}' {
            continue;
        }
        let cx = (ch.bbox.x0 + ch.bbox.x1) / 2.0;
        let cy = (ch.bbox.top + ch.bbox.bottom) / 2.0;
        if !rect.contains_point(cx, cy, RECT_MARGIN) {
            continue;
        }

        if let Some(p) = prev {
            let y_diff = (ch.bbox.top - p.bbox.top).abs();
            let x_gap = ch.bbox.x0 - p.bbox.x1;
            let mut x_tol = (ch.size * 0.5).max(3.0);
            let mut y_tol = (ch.size * 0.3).max(2.0);
            if is_punct_or_digit(ch.c) || is_punct_or_digit(p.c) {
                x_tol = x_tol.max(8.0);
                y_tol = y_tol.max(10.0);
            }
            if y_diff > y_tol || x_gap > x_tol {
                buf.push(' ');
            }
        }
        buf.push(ch.c);
        prev = Some(ch);
    }

    let mut cleaned = String::with_capacity(buf.len());
    for c in buf.trim().chars() {
        let c = if c == '\u{a0}' { ' ' } else { c };
        if c == ' ' && cleaned.ends_with(' ') {
            continue;
        }
        cleaned.push(c);
    }
    cleaned
}

/// Whether `text` contains anything other than whitespace.
pub fn has_visible_text(text: &str) -> bool {
    text.chars().any(|c| !c.is_whitespace())
}
