//! Numeric display formatting shared by the fixers.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new("[0-9]+").expect("digit run pattern is valid"));

/// Insert thousands separators into every run of digits, trim, and drop a
/// trailing zero-cents suffix.
///
/// Each maximal run of ASCII digits is grouped on its own, counting from its
/// least-significant digit, so surrounding text is left alone:
///
/// ```
/// use storylet_fixers::numbers::number_with_commas;
///
/// assert_eq!(number_with_commas("1234567"), "1,234,567");
/// assert_eq!(number_with_commas(" 1000.00 "), "1,000");
/// assert_eq!(number_with_commas("1,000"), "1,000");
/// ```
///
/// Digits after a decimal point form their own run, so `"1234.5678"` becomes
/// `"1,234.5,678"`. Only whole-number amounts reach this in practice.
pub fn number_with_commas(raw: &str) -> String {
	let grouped = DIGIT_RUN.replace_all(raw, |caps: &Captures| group_digits(&caps[0]));
	let trimmed = grouped.trim();

	match trimmed.strip_suffix(".00") {
		Some(whole) if whole.ends_with(|c: char| c.is_ascii_digit()) => whole.to_string(),
		_ => trimmed.to_string(),
	}
}

/// Group a run of ASCII digits in threes.
fn group_digits(run: &str) -> String {
	let len = run.len();
	let mut out = String::with_capacity(len + len / 3);

	for (i, c) in run.chars().enumerate() {
		if i > 0 && (len - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}

	out
}
