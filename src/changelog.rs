//! Changelog section extraction.
//!
//! Changelogs are expected to follow the header-and-underline convention
//! used by reStructuredText (and plenty of hand-written CHANGELOG files):
//!
//! ```text
//! Changelog
//! =========
//!
//! v1.2.0
//! ------
//! - Faster startup
//!
//! v1.1.0
//! ------
//! - First public release
//! ```
//!
//! Splitting on the delimiters leaves the preamble in segment 0 and the
//! newest version's notes in segment 1, which is the only segment this
//! module cares about.

use regex::Regex;

/// A section delimiter is, in order: a newline, a non-empty header line
/// (one or more non-newline characters), a newline, an underline
/// consisting solely of one or more `-` characters, and a terminating
/// newline. This is a parsing contract, not an implementation accident:
/// anything between two delimiters (or between the last delimiter and the
/// end of the document) is one section, and the delimiter text itself
/// belongs to no section. A header at the very start of the document has
/// no preceding newline and therefore does not delimit, which is what
/// keeps the preamble in segment 0.
const SECTION_DELIMITER: &str = r"\n[^\n]+\n-+\n";

/// Returns the newest version's section from a full changelog document.
///
/// The document is split on [`SECTION_DELIMITER`] and the trimmed second
/// segment (index 1) is returned; segment 0 is the preamble before the
/// first header. A document with no delimiter has nothing to extract.
///
/// # Arguments
///
/// * `changelog` - The full changelog text
///
/// # Returns
///
/// * `Some(section)` - The trimmed text of the newest section; empty if
///   two delimiters were adjacent
/// * `None` - If the document contains no delimiter
pub fn latest_section(changelog: &str) -> Option<String> {
    let delimiter = Regex::new(SECTION_DELIMITER).ok()?;
    let section = delimiter.split(changelog).nth(1)?;
    Some(section.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "\
Changelog
=========

v1.2.0
------
- Faster startup
- Fewer crashes

v1.1.0
------
- Search got smarter

v1.0.0
------
- First stable release
";

    #[test]
    fn second_segment_is_latest_section() {
        let section = latest_section(CHANGELOG).unwrap();
        assert_eq!(section, "- Faster startup\n- Fewer crashes");
    }

    #[test]
    fn section_is_trimmed() {
        let text = "intro\nv2.0\n----\n\n  spaced out  \n\nv1.0\n----\nolder\n";
        assert_eq!(latest_section(text).unwrap(), "spaced out");
    }

    #[test]
    fn absent_without_delimiters() {
        assert_eq!(latest_section("just some prose\nwith lines\n"), None);
        assert_eq!(latest_section(""), None);
    }

    #[test]
    fn single_delimiter_returns_remainder() {
        let text = "intro\nv1.0\n----\neverything after the only header\n";
        assert_eq!(
            latest_section(text).unwrap(),
            "everything after the only header"
        );
    }

    #[test]
    fn header_at_document_start_does_not_delimit() {
        // No newline before the header, so nothing splits.
        assert_eq!(latest_section("v1.0\n----\nbody\n"), None);
    }

    #[test]
    fn underline_must_be_dashes_only() {
        assert_eq!(latest_section("intro\nv1.0\n-=-=\nbody\n"), None);
        assert_eq!(latest_section("intro\nv1.0\n----x\nbody\n"), None);
    }

    #[test]
    fn underline_may_be_a_single_dash() {
        let text = "intro\nv2\n-\nnewest\n\nv1\n-\nolder\n";
        assert_eq!(latest_section(text).unwrap(), "newest");
    }

    #[test]
    fn adjacent_delimiters_yield_empty_section() {
        let text = "intro\nv2.0\n----\n\nv1.0\n----\nolder\n";
        assert_eq!(latest_section(text).unwrap(), "");
    }

    #[test]
    fn equals_underlined_titles_do_not_delimit() {
        // The top-level title underlined with '=' is preamble, not a section.
        let section = latest_section(CHANGELOG).unwrap();
        assert!(!section.contains("Changelog"));
    }
}
