//! Metrics of the panel's fixed-width bitmap font.

/// Glyph advance at scale 1
pub const GLYPH_WIDTH: i32 = 6;

/// Line height at scale 1
pub const GLYPH_HEIGHT: i32 = 8;

/// Width of `text` on one line.
pub fn measure(text: &str, scale: u8) -> i32 {
  text.chars().count() as i32 * GLYPH_WIDTH * i32::from(scale.max(1))
}

pub fn line_height(scale: u8) -> i32 {
  GLYPH_HEIGHT * i32::from(scale.max(1))
}

/// Greedy word wrap to `max_width` pixels.
///
/// Words wider than a whole line are split across lines, so every character
/// of the input ends up in the output.
pub fn wrap(text: &str, max_width: i32, scale: u8) -> Vec<String> {
  let advance = GLYPH_WIDTH * i32::from(scale.max(1));
  let per_line = (max_width / advance).max(1) as usize;

  let mut lines = Vec::new();
  let mut current = String::new();
  let mut current_len = 0usize;

  for word in text.split_whitespace() {
    let mut chars: Vec<char> = word.chars().collect();

    while chars.len() > per_line {
      if current_len > 0 {
        lines.push(std::mem::take(&mut current));
        current_len = 0;
      }
      let rest = chars.split_off(per_line);
      lines.push(chars.into_iter().collect());
      chars = rest;
    }

    let needed = if current_len == 0 {
      chars.len()
    } else {
      current_len + 1 + chars.len()
    };

    if needed > per_line {
      lines.push(std::mem::take(&mut current));
      current_len = 0;
    }

    if current_len > 0 {
      current.push(' ');
      current_len += 1;
    }
    current.extend(chars.iter());
    current_len += chars.len();
  }

  if current_len > 0 {
    lines.push(current);
  }

  lines
}
