//! Backend-free text measurement used for wrapping and truncation.
//!
//! Widths are estimates: narrow glyphs count as a fixed fraction of the font
//! size and East Asian wide glyphs as a full em. Good enough to keep lines
//! inside the page without asking a font backend.

pub const NARROW_GLYPH_EM: f64 = 0.55;
pub const WIDE_GLYPH_EM: f64 = 1.0;
pub const ELLIPSIS: char = '…';

#[must_use]
pub fn is_wide(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x3FFFD
    )
}

#[must_use]
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().map(|ch| glyph_width(ch, font_size)).sum()
}

fn glyph_width(ch: char, font_size: f64) -> f64 {
    if is_wide(ch) {
        WIDE_GLYPH_EM * font_size
    } else {
        NARROW_GLYPH_EM * font_size
    }
}

/// Cuts `text` so it fits `max_width`, marking the cut with an ellipsis.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: f64, font_size: f64) -> String {
    if estimate_text_width(text, font_size) <= max_width {
        return text.to_owned();
    }

    let budget = max_width - glyph_width(ELLIPSIS, font_size);
    let mut used = 0.0;
    let mut kept = String::new();
    for ch in text.chars() {
        used += glyph_width(ch, font_size);
        if used > budget {
            break;
        }
        kept.push(ch);
    }
    kept.truncate(kept.trim_end().len());
    kept.push(ELLIPSIS);
    kept
}

/// Greedy word wrap. Spaces are break points, every wide glyph is one too,
/// and words longer than a line are split by character.
#[must_use]
pub fn wrap_text(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0.0;
        for token in tokenize(paragraph) {
            let gap = if line.is_empty() || !token.space_before {
                ""
            } else {
                " "
            };
            let token_width = estimate_text_width(token.text, font_size);
            let gap_width = estimate_text_width(gap, font_size);

            if !line.is_empty() && line_width + gap_width + token_width > max_width {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
            } else {
                line.push_str(gap);
                line_width += gap_width;
            }

            for ch in token.text.chars() {
                let ch_width = glyph_width(ch, font_size);
                if !line.is_empty() && line_width + ch_width > max_width {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

struct Token<'a> {
    text: &'a str,
    space_before: bool,
}

fn tokenize(paragraph: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None::<usize>;
    let mut space_before = false;

    for (offset, ch) in paragraph.char_indices() {
        if ch.is_whitespace() {
            if let Some(begin) = start.take() {
                tokens.push(Token {
                    text: &paragraph[begin..offset],
                    space_before,
                });
            }
            space_before = true;
        } else if is_wide(ch) {
            if let Some(begin) = start.take() {
                tokens.push(Token {
                    text: &paragraph[begin..offset],
                    space_before,
                });
                space_before = false;
            }
            tokens.push(Token {
                text: &paragraph[offset..offset + ch.len_utf8()],
                space_before,
            });
            space_before = false;
        } else if start.is_none() {
            start = Some(offset);
        }
    }
    if let Some(begin) = start {
        tokens.push(Token {
            text: &paragraph[begin..],
            space_before,
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{estimate_text_width, truncate_to_width, wrap_text};

    #[test]
    fn wide_glyphs_count_a_full_em() {
        assert_relative_eq!(estimate_text_width("ab", 10.0), 11.0);
        assert_relative_eq!(estimate_text_width("合同", 10.0), 20.0);
    }

    #[test]
    fn wraps_on_spaces() {
        // Ten narrow glyphs fit at 5.5pt each.
        let lines = wrap_text("alpha beta gamma delta", 56.0, 10.0);
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn long_words_and_cjk_break_by_character() {
        let lines = wrap_text("abcdefghijklmnop", 56.0, 10.0);
        assert_eq!(lines, vec!["abcdefghij", "klmnop"]);
        let lines = wrap_text("合同金额分布", 40.0, 10.0);
        assert_eq!(lines, vec!["合同金额", "分布"]);
    }

    #[test]
    fn explicit_newlines_start_new_lines() {
        let lines = wrap_text("one\ntwo", 500.0, 10.0);
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn truncation_keeps_short_text_and_marks_cuts() {
        assert_eq!(truncate_to_width("short", 100.0, 10.0), "short");
        let cut = truncate_to_width("a very long line of text", 60.0, 10.0);
        assert!(cut.ends_with('…'));
        assert!(estimate_text_width(&cut, 10.0) <= 60.0);
    }
}
