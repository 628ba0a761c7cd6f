//! Approximate text metrics.
//!
//! Glyph advances are estimated per character class for a sans-serif face;
//! precise enough for margin and legend sizing.

use crate::primitives::{FontWeight, TextStyle};

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

fn advance(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | ' ' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.86,
        'A'..='Z' => 0.68,
        '0'..='9' => 0.56,
        c if c.is_ascii() => 0.54,
        // Greek, superscripts, symbols
        _ => 0.6,
    }
}

/// Measure `text` at `size_pt`.
pub fn measure_text(text: &str, size_pt: f64, weight: FontWeight) -> TextMetrics {
    let em: f64 = text.chars().map(advance).sum();
    let bold = if weight == FontWeight::Bold { 1.06 } else { 1.0 };
    TextMetrics { width: em * size_pt * bold, height: size_pt * 1.2, ascent: size_pt * 0.93 }
}

pub fn measure_styled(text: &str, style: &TextStyle) -> TextMetrics {
    measure_text(text, style.size, style.weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_hello() {
        let m = measure_text("Hello", 12.0, FontWeight::Regular);
        assert!(m.width > 20.0);
        assert!(m.height > 8.0);
        assert!(m.ascent > 0.0);
    }

    #[test]
    fn bold_wider_than_regular() {
        let r = measure_text("Test", 12.0, FontWeight::Regular);
        let b = measure_text("Test", 12.0, FontWeight::Bold);
        assert!(b.width > r.width);
    }

    #[test]
    fn empty_is_zero_width() {
        assert_eq!(measure_text("", 10.0, FontWeight::Regular).width, 0.0);
    }
}
