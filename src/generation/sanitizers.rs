//! Sanitizers for free-form document text carried into generated output

use once_cell::sync::Lazy;
use regex::Regex;

// Smart quotes and em-dashes
static UNICODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{2018}\u{2019}\u{201C}\u{201D}\u{2014}]").expect("valid unicode pattern")
});
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Splits description text into lines suitable for line comments.
///
/// This function:
/// - Replaces smart quotes with regular quotes
/// - Replaces em-dashes with regular dashes
/// - Collapses whitespace inside each line
/// - Drops leading/trailing blank lines and collapses runs of blank lines
///
/// # Examples
/// ```
/// use bindsmith::generation::sanitizers::doc_lines;
///
/// let lines = doc_lines("  Returns a \u{201C}pet\u{201D}.\n\n\n  Requires   auth. ");
/// assert_eq!(lines, vec!["Returns a \"pet\".", "", "Requires auth."]);
/// ```
pub fn doc_lines(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in input.lines() {
        let line = UNICODE_RE.replace_all(line, |caps: &regex::Captures| match &caps[0] {
            "\u{2018}" | "\u{2019}" => "'",
            "\u{201C}" | "\u{201D}" => "\"",
            "\u{2014}" => "-",
            _ => "",
        });
        let line = WHITESPACE_RE.replace_all(line.trim(), " ").to_string();

        if line.is_empty() && lines.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }

    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines
}
