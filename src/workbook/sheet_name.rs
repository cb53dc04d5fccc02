use std::collections::HashSet;

use crate::config::{ReportLabels, fill_template};

/// Hard limit Excel puts on worksheet names.
pub const MAX_SHEET_NAME_CHARS: usize = 31;
/// Titles up to this length are used as-is.
pub const VERBATIM_TITLE_MAX_CHARS: usize = 20;
/// Titles up to this length keep their text behind an index prefix.
pub const PREFIXED_TITLE_MAX_CHARS: usize = 25;

const FORBIDDEN_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
const RESERVED_NAMES: [&str; 1] = ["history"];

/// Sheet name for chart `index` (1-based) from its title length alone.
///
/// - up to 20 chars: the title itself
/// - 21 to 25 chars: `<prefix><index>-<title>`
/// - longer: the fallback label, e.g. `Chart 7`
#[must_use]
pub fn derive_sheet_name(index: usize, title: &str, labels: &ReportLabels) -> String {
    let title_len = title.chars().count();
    let name = if title_len <= VERBATIM_TITLE_MAX_CHARS {
        title.to_owned()
    } else if title_len <= PREFIXED_TITLE_MAX_CHARS {
        let head: String = title.chars().take(PREFIXED_TITLE_MAX_CHARS).collect();
        format!("{}{index}-{head}", labels.sheet_index_prefix)
    } else {
        fallback_name(index, labels)
    };
    truncate_chars(&name, MAX_SHEET_NAME_CHARS)
}

/// Hands out sheet names that Excel accepts and that never collide.
#[derive(Debug)]
pub struct SheetNamer<'a> {
    labels: &'a ReportLabels,
    used: HashSet<String>,
}

impl<'a> SheetNamer<'a> {
    /// `reserved` names (e.g. the summary sheet) are treated as taken.
    #[must_use]
    pub fn new(labels: &'a ReportLabels, reserved: &[&str]) -> Self {
        let used = reserved
            .iter()
            .map(|name| name.to_lowercase())
            .chain(RESERVED_NAMES.iter().map(|name| (*name).to_owned()))
            .collect();
        Self { labels, used }
    }

    pub fn assign(&mut self, index: usize, title: &str) -> String {
        let preferred = sanitize(&derive_sheet_name(index, title, self.labels));
        let fallback = sanitize(&fallback_name(index, self.labels));

        let used = &mut self.used;
        [preferred, fallback.clone()]
            .into_iter()
            .filter(|name| !name.is_empty())
            .chain((2..usize::MAX).map(|n| suffixed(&fallback, n)))
            .find(|candidate| used.insert(candidate.to_lowercase()))
            .unwrap_or_else(|| suffixed(&fallback, usize::MAX))
    }
}

fn fallback_name(index: usize, labels: &ReportLabels) -> String {
    truncate_chars(
        &fill_template(&labels.sheet_fallback, &[("index", index.to_string().as_str())]),
        MAX_SHEET_NAME_CHARS,
    )
}

fn suffixed(base: &str, n: usize) -> String {
    let suffix = format!(" ({n})");
    let room = MAX_SHEET_NAME_CHARS.saturating_sub(suffix.chars().count());
    format!("{}{suffix}", truncate_chars(base, room))
}

fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|ch| if FORBIDDEN_CHARS.contains(&ch) { '_' } else { ch })
        .collect();
    replaced
        .trim_matches(|ch: char| ch == '\'' || ch.is_whitespace())
        .to_owned()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::{MAX_SHEET_NAME_CHARS, SheetNamer, derive_sheet_name};
    use crate::config::ReportLabels;

    #[test]
    fn short_titles_are_verbatim() {
        let labels = ReportLabels::english();
        assert_eq!(derive_sheet_name(1, "Revenue", &labels), "Revenue");
        let twenty = "a".repeat(20);
        assert_eq!(derive_sheet_name(3, &twenty, &labels), twenty);
    }

    #[test]
    fn mid_length_titles_get_index_prefix() {
        let labels = ReportLabels::english();
        let title = "b".repeat(23);
        assert_eq!(derive_sheet_name(4, &title, &labels), format!("C4-{title}"));
    }

    #[test]
    fn long_titles_fall_back_to_chart_label() {
        let labels = ReportLabels::english();
        let title = "c".repeat(40);
        assert_eq!(derive_sheet_name(12, &title, &labels), "Chart 12");
        let labels = ReportLabels::chinese();
        assert_eq!(derive_sheet_name(12, &title, &labels), "图表12");
    }

    #[test]
    fn length_is_counted_in_characters() {
        let labels = ReportLabels::chinese();
        let title = "合同金额按季度分布";
        assert_eq!(derive_sheet_name(1, title, &labels), title);
    }

    #[test]
    fn forbidden_characters_are_replaced() {
        let labels = ReportLabels::english();
        let mut namer = SheetNamer::new(&labels, &["Summary"]);
        assert_eq!(namer.assign(1, "Q1/Q2 [draft]?"), "Q1_Q2 _draft__");
        assert_eq!(namer.assign(2, "'quoted'"), "quoted");
    }

    #[test]
    fn collisions_fall_back_to_numbered_labels() {
        let labels = ReportLabels::english();
        let mut namer = SheetNamer::new(&labels, &["Summary"]);
        assert_eq!(namer.assign(1, "Revenue"), "Revenue");
        assert_eq!(namer.assign(2, "revenue"), "Chart 2");
        assert_eq!(namer.assign(3, "Summary"), "Chart 3");
        assert_eq!(namer.assign(4, "Chart 2"), "Chart 4");
        assert_eq!(namer.assign(5, "Chart 5"), "Chart 5");
        assert_eq!(namer.assign(6, "Chart 5"), "Chart 6");
        assert_eq!(namer.assign(7, "Chart 7 (2)"), "Chart 7 (2)");
        assert_eq!(namer.assign(7, "Chart 7"), "Chart 7");
        assert_eq!(namer.assign(7, "Chart 7"), "Chart 7 (3)");
    }

    #[test]
    fn repeated_titles_keep_getting_unique_names() {
        let labels = ReportLabels::english();
        let mut namer = SheetNamer::new(&labels, &["Summary"]);
        let names: Vec<String> = (0..50).map(|_| namer.assign(9, "Revenue")).collect();
        assert_eq!(names[0], "Revenue");
        assert_eq!(names[1], "Chart 9");
        assert_eq!(names[2], "Chart 9 (2)");
        let unique: std::collections::HashSet<String> =
            names.iter().map(|name| name.to_lowercase()).collect();
        assert_eq!(unique.len(), names.len());
        assert!(names.iter().all(|name| name.chars().count() <= MAX_SHEET_NAME_CHARS));
    }

    #[test]
    fn blank_titles_use_fallback() {
        let labels = ReportLabels::english();
        let mut namer = SheetNamer::new(&labels, &[]);
        assert_eq!(namer.assign(1, "   "), "Chart 1");
        assert_eq!(namer.assign(2, "::"), "__");
        assert!(namer.assign(3, &"x".repeat(31)).chars().count() <= MAX_SHEET_NAME_CHARS);
    }
}
