//! Version-precedence comparison.
//!
//! Registries like PyPI accept more than plain semver ("4.2", "1.0.0rc1",
//! "2.1.post1", "0.5.dev3"), so comparison here follows setuptools-style
//! precedence instead of strict semver. Parsing is total: any string
//! produces a comparable key, which keeps the surrounding check fail-soft
//! even when a registry or state file holds something unexpected.

use regex::Regex;

/// Parses a version string into a comparable key.
///
/// Keys are compared lexicographically element by element. Numeric fields
/// are zero-padded so they compare numerically, prerelease tags order as
/// `dev < alpha < beta < rc/pre/preview < final`, and post-release
/// suffixes sort after the release they follow.
///
/// # Arguments
///
/// * `version` - The version string to parse
///
/// # Returns
///
/// A vector of strings whose lexicographic ordering matches version
/// precedence. Never fails: unrecognised input still yields a key.
pub(crate) fn parse_version(version: &str) -> Vec<String> {
    let token_re = Regex::new(r"(\d+|[a-z]+|\.|-)").unwrap();
    let lowered = version.to_lowercase();
    let mut parts = Vec::new();

    for token in token_re.find_iter(&lowered) {
        let token = normalise_token(token.as_str());
        if token.is_empty() || token == "." {
            continue;
        }
        if token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            // Pad numbers so "10" sorts above "9"
            parts.push(format!("{:0>8}", token));
        } else {
            parts.push(format!("*{}", token));
        }
    }
    parts.push("*final".to_string());

    let mut key = Vec::new();
    for part in parts {
        if part.starts_with('*') {
            if part.as_str() < "*final" {
                // A prerelease tag cancels any "-" separator before it
                while key.last().map(String::as_str) == Some("*final-") {
                    key.pop();
                }
            }
            // Trailing zeros are insignificant: 1.0.0 == 1.0 == 1
            while key.last().map(String::as_str) == Some("00000000") {
                key.pop();
            }
        }
        key.push(part);
    }
    key
}

/// Maps the common prerelease spellings onto tokens that sort correctly
/// against `*final`; the bare `-` separator becomes a final marker so
/// "1.0-1" orders as a post release.
fn normalise_token(token: &str) -> String {
    match token {
        "rc" | "pre" | "preview" => "c".to_string(),
        "dev" => "@".to_string(),
        "alpha" => "a".to_string(),
        "beta" => "b".to_string(),
        "-" => "final-".to_string(),
        other => other.to_string(),
    }
}
