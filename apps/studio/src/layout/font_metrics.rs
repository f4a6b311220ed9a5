//! Static font-metric tables for the two faces the PDF is typeset in.
//!
//! Widths are in em units (glyph advance ÷ 1000 from the standard Helvetica
//! AFM files), so they are exact for the base-14 fonts the renderer embeds by
//! name. Tables cover ASCII 0x20..=0x7E (95 printable characters), index =
//! `(char as usize) - 32`. The handful of typographic characters the preview
//! uses outside ASCII (dashes, bullets, curly quotes) have explicit widths;
//! anything else falls back to `average_char_width`.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font face enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    /// Helvetica, used for weights below 600.
    Regular,
    /// Helvetica-Bold, used for semibold and heavier.
    Bold,
}

impl FontFace {
    pub fn for_weight(weight: u16) -> Self {
        if weight >= 600 {
            FontFace::Bold
        } else {
            FontFace::Regular
        }
    }

    /// PostScript name of the standard font.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name the page content streams refer to.
    pub fn resource_name(&self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"F1",
            FontFace::Bold => b"F2",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub face: FontFace,
    widths: [f32; 95],
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '\u{a0}' => self.space_width,
            '—' => 1.0,
            '–' => 0.556,
            '•' => 0.35,
            '‘' | '’' => 0.222,
            '“' | '”' => 0.333,
            '…' => 1.0,
            _ => self.average_char_width,
        }
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Width in px at `size` px, with `tracking_em` letter spacing after
    /// every character.
    pub fn measure_px(&self, s: &str, size: f32, tracking_em: f32) -> f32 {
        let chars = s.chars().count() as f32;
        (self.measure_str(s) + tracking_em * chars) * size
    }

    /// Greedy word wrap at `max_width` px. A word wider than the line is kept
    /// whole on a line of its own.
    pub fn wrap(&self, text: &str, size: f32, tracking_em: f32, max_width: f32) -> Vec<String> {
        let space = (self.space_width + tracking_em) * size;
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_w = self.measure_px(word, size, tracking_em);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + space + word_w > max_width + 0.01 {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_w;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::Regular,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::Bold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.611,
    space_width: 0.278,
};

/// Returns the static metric table for a given face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Regular => &HELVETICA_TABLE,
        FontFace::Bold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontFace::Regular);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFace::Regular);
        // "Rust" = R(0.722) + u(0.556) + s(0.500) + t(0.278) = 2.056
        let width = metrics.measure_str("Rust");
        assert!((width - 2.056).abs() < 1e-3, "Rust width should be ~2.056, got {width}");
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Frontend Engineer";
        let regular = get_metrics(FontFace::Regular).measure_str(text);
        let bold = get_metrics(FontFace::Bold).measure_str(text);
        assert!(bold > regular, "bold {bold} should exceed regular {regular}");
    }

    #[test]
    fn test_em_dash_and_fallback_widths() {
        let metrics = get_metrics(FontFace::Regular);
        assert!((metrics.measure_str("—") - 1.0).abs() < 1e-4);
        assert!((metrics.measure_str("é") - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_measure_px_applies_size_and_tracking() {
        let metrics = get_metrics(FontFace::Regular);
        let plain = metrics.measure_px("abc", 10.0, 0.0);
        let tracked = metrics.measure_px("abc", 10.0, 0.1);
        assert!((tracked - plain - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_single_word_is_one_line() {
        let metrics = get_metrics(FontFace::Regular);
        assert_eq!(metrics.wrap("Rust", 14.0, 0.0, 300.0), vec!["Rust"]);
        assert!(metrics.wrap("   ", 14.0, 0.0, 300.0).is_empty());
    }

    #[test]
    fn test_wrap_long_text_preserves_words() {
        let metrics = get_metrics(FontFace::Regular);
        let text = "Led development of resume builder UI with real-time updates from platform activities.";
        let lines = metrics.wrap(text, 14.0, 0.0, 200.0);
        assert!(lines.len() >= 2, "expected wrapping, got {lines:?}");
        assert_eq!(lines.join(" "), text);
        for line in &lines {
            let w = metrics.measure_px(line, 14.0, 0.0);
            assert!(w <= 200.01 || !line.contains(' '), "line too wide: {line} ({w})");
        }
    }

    #[test]
    fn test_oversized_word_gets_its_own_line() {
        let metrics = get_metrics(FontFace::Bold);
        let lines = metrics.wrap("a Supercalifragilistic b", 16.0, 0.0, 60.0);
        assert_eq!(lines, vec!["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn test_face_for_weight() {
        assert_eq!(FontFace::for_weight(400), FontFace::Regular);
        assert_eq!(FontFace::for_weight(500), FontFace::Regular);
        assert_eq!(FontFace::for_weight(600), FontFace::Bold);
        assert_eq!(FontFace::for_weight(900), FontFace::Bold);
    }
}
