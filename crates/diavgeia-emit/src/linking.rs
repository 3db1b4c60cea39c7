//! Legislation linker: decides whether a narrative entry references external
//! legislation or a prior decision, and renders the `ont:considers` line.

use crate::DECISION_BASE;
use diavgeia_model::{is_present, BodyEntry};

/// Prior-decision entries carry the `dvg` kind and an IUN; every other
/// non-empty kind needs both a year and a number to link.
pub(crate) fn has_legislation_linking(entry: &BodyEntry) -> bool {
    let kind = entry.kind.as_deref().unwrap_or("");
    let valid_dvg = kind == "dvg" && is_present(&entry.iun);
    let valid_leg =
        !kind.is_empty() && kind != "dvg" && is_present(&entry.year) && is_present(&entry.number);
    valid_leg || valid_dvg
}

/// Renders the `ont:considers` triple line for an entry that links.
///
/// Prior-decision references leave the version segment empty: the IUN may
/// resolve to a legacy PDF decision, which carries no version.
///
/// Legislation references use the `leg:` prefixed form with escaped slashes
/// (`\/`), the separator convention the store's IRI parser requires.
pub(crate) fn format_linking(entry: &BodyEntry) -> String {
    if entry.kind.as_deref() == Some("dvg") {
        let iun = crate::text(&entry.iun);
        return format!("\tont:considers <{DECISION_BASE}{iun}/>;\n");
    }

    let mut article_paragraph = String::new();
    if let Some(article) = entry.article.as_deref().filter(|s| !s.is_empty()) {
        article_paragraph = format!("\\/article\\/{article}");
        if let Some(paragraph) = entry.paragraph.as_deref().filter(|s| !s.is_empty()) {
            article_paragraph.push_str(&format!("\\/paragraph\\/{paragraph}"));
        }
    }
    format!(
        "\tont:considers leg:{}\\/{}\\/{}{};\n",
        crate::text(&entry.kind),
        crate::text(&entry.year),
        crate::text(&entry.number),
        article_paragraph
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str) -> BodyEntry {
        BodyEntry {
            kind: Some(kind.to_string()),
            ..BodyEntry::default()
        }
    }

    #[test]
    fn dvg_entry_links_on_iun_alone() {
        let mut e = entry("dvg");
        assert!(!has_legislation_linking(&e));
        e.iun = Some("ΒΞΛ9469Β7Γ-ΙΡΛ".to_string());
        assert!(has_legislation_linking(&e));
        assert_eq!(
            format_linking(&e),
            "\tont:considers <http://diavgeia.gov.gr/eli/decision/ΒΞΛ9469Β7Γ-ΙΡΛ/>;\n"
        );
    }

    #[test]
    fn legislation_entry_needs_year_and_number() {
        let mut e = entry("n");
        e.year = Some("2011".to_string());
        assert!(!has_legislation_linking(&e));
        e.number = Some("3861".to_string());
        assert!(has_legislation_linking(&e));
        assert_eq!(
            format_linking(&e),
            "\tont:considers leg:n\\/2011\\/3861;\n"
        );
    }

    #[test]
    fn article_and_paragraph_are_appended_with_escaped_slashes() {
        let mut e = entry("n");
        e.year = Some("2011".to_string());
        e.number = Some("3861".to_string());
        e.article = Some("4".to_string());
        assert_eq!(
            format_linking(&e),
            "\tont:considers leg:n\\/2011\\/3861\\/article\\/4;\n"
        );
        e.paragraph = Some("2".to_string());
        assert_eq!(
            format_linking(&e),
            "\tont:considers leg:n\\/2011\\/3861\\/article\\/4\\/paragraph\\/2;\n"
        );
    }

    #[test]
    fn paragraph_without_article_is_ignored() {
        let mut e = entry("pd");
        e.year = Some("2010".to_string());
        e.number = Some("28".to_string());
        e.paragraph = Some("3".to_string());
        assert_eq!(format_linking(&e), "\tont:considers leg:pd\\/2010\\/28;\n");
    }

    #[test]
    fn empty_kind_never_links() {
        let mut e = BodyEntry::default();
        e.year = Some("2011".to_string());
        e.number = Some("3861".to_string());
        assert!(!has_legislation_linking(&e));
    }
}
