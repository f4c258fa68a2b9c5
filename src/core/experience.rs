use crate::models::{ExperienceClaim, PlusMarker};
use regex::{CaptureMatches, Regex};
use std::sync::LazyLock;

/// Years-of-experience requirement, e.g. "3-5 years", "2+ yoe", "4 or more
/// professional years"
///
/// Groups: 1 = lower bound, 2 = range upper bound, 3 = plus marker. Up to two
/// filler words may sit between the number and "year(s)"/"yoe". Note the
/// trailing `years?` has no word boundary, so "yearly" also ends a claim.
static EXPERIENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([0-9]+)\s*(?:(?:-|to)\s*([0-9]+))?\s*(?:(\+|plus|or\s+more))?\s*(?:(?:\w+)\s+){0,2}(?:years?|yoe)",
    )
    .expect("experience pattern is valid")
});

/// How many characters before a claim are checked for a negating word
const NEGATION_WINDOW_CHARS: usize = 15;

/// Word that turns a claim into a deadline ("ramp up within 2 years")
const NEGATION_WORD: &str = "within";

/// Lazily scan lowercased description text for experience claims
///
/// Claims preceded by "within" are skipped. Each call re-scans from the
/// start of the text.
pub fn extract_experience_claims(description_lower: &str) -> ExperienceClaims<'_> {
    ExperienceClaims {
        text: description_lower,
        captures: EXPERIENCE_PATTERN.captures_iter(description_lower),
    }
}

/// Iterator over the non-negated experience claims of one text
pub struct ExperienceClaims<'t> {
    text: &'t str,
    captures: CaptureMatches<'static, 't>,
}

impl<'t> Iterator for ExperienceClaims<'t> {
    type Item = ExperienceClaim;

    fn next(&mut self) -> Option<Self::Item> {
        for caps in self.captures.by_ref() {
            let whole = caps.get(0)?;
            if is_negated(self.text, whole.start()) {
                tracing::trace!("Ignoring negated experience claim: {:?}", whole.as_str());
                continue;
            }

            let min_years = caps.get(1).map(|m| parse_years(m.as_str()))?;
            let max_years = caps.get(2).map(|m| parse_years(m.as_str()));
            let plus_marker = caps.get(3).map(|m| match m.as_str() {
                "+" => PlusMarker::Symbol,
                "plus" => PlusMarker::Plus,
                _ => PlusMarker::OrMore,
            });

            return Some(ExperienceClaim {
                min_years,
                max_years,
                plus_marker,
                offset: whole.start(),
            });
        }
        None
    }
}

/// Digits only; values too large for u32 saturate and always exceed a ceiling
#[inline]
fn parse_years(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

/// True when the trimmed text just before `start` ends with "within"
fn is_negated(text: &str, start: usize) -> bool {
    let before = &text[..start];
    let window_start = before
        .char_indices()
        .rev()
        .nth(NEGATION_WINDOW_CHARS - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    before[window_start..].trim().ends_with(NEGATION_WORD)
}
