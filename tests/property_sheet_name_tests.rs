use std::collections::HashSet;

use chart_export::ReportLabels;
use chart_export::workbook::{MAX_SHEET_NAME_CHARS, SheetNamer, VERBATIM_TITLE_MAX_CHARS};
use proptest::prelude::*;

proptest! {
    #[test]
    fn assigned_names_are_short_unique_and_legal(titles in prop::collection::vec(".{0,60}", 1..40)) {
        let labels = ReportLabels::english();
        let mut namer = SheetNamer::new(&labels, &[labels.summary_sheet.as_str()]);
        let mut seen = HashSet::new();
        seen.insert(labels.summary_sheet.to_lowercase());

        for (i, title) in titles.iter().enumerate() {
            let name = namer.assign(i + 1, title);
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().count() <= MAX_SHEET_NAME_CHARS);
            prop_assert!(!name.contains(['[', ']', ':', '*', '?', '/', '\\']));
            prop_assert!(!name.starts_with('\'') && !name.ends_with('\''));
            prop_assert!(seen.insert(name.to_lowercase()), "duplicate sheet name {}", name);
        }
    }

    #[test]
    fn short_plain_titles_are_used_verbatim(title in "[A-Za-z0-9][A-Za-z0-9 _-]{0,18}[A-Za-z0-9]") {
        prop_assume!(title.chars().count() <= VERBATIM_TITLE_MAX_CHARS);
        prop_assume!(!title.eq_ignore_ascii_case("history"));
        prop_assume!(!title.eq_ignore_ascii_case("summary"));
        let labels = ReportLabels::english();
        let mut namer = SheetNamer::new(&labels, &[labels.summary_sheet.as_str()]);
        prop_assert_eq!(namer.assign(1, &title), title);
    }
}
