//! Static font-metric tables for the two PDF built-in fonts we render with.
//!
//! Widths are in em units (AFM widths / 1000) and cover ASCII 0x20..=0x7E.
//! Index = (char as usize) - 32. Text is reduced to ASCII before rendering,
//! so the fallback width only matters for measuring unsanitized input.

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a built-in font.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside printable ASCII.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Greedy word-wrap at `max_width_em`.
    ///
    /// Whitespace runs collapse to one space. A word wider than a whole line
    /// (long URLs) is split across lines at character boundaries.
    pub fn wrap(&self, text: &str, max_width_em: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_w = self.measure_str(word);

            if word_w > max_width_em {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = self.split_long_word(word, max_width_em);
                // The last piece stays open so following words can join it.
                if let Some(last) = pieces.pop() {
                    lines.extend(pieces);
                    current_width = self.measure_str(&last);
                    current = last;
                }
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + self.space_width + word_w > max_width_em {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += self.space_width + word_w;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn split_long_word(&self, word: &str, max_width_em: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut width = 0.0_f32;
        for c in word.chars() {
            let w = self.measure_str(c.encode_utf8(&mut [0; 4]));
            if !piece.is_empty() && width + w > max_width_em {
                pieces.push(std::mem::take(&mut piece));
                width = 0.0;
            }
            piece.push(c);
            width += w;
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica — body text.
pub static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {     |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.56,
    space_width: 0.278,
};

/// Helvetica-Bold — headings.
pub static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {     |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.60,
    space_width: 0.278,
};
