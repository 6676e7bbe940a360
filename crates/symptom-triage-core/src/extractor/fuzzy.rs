//! Approximate phrase matching against token n-grams.
//!
//! Scores are the Ratcliff/Obershelp ratio `2*M/T`, where `M` is the number
//! of matched characters and `T` the combined length of both strings.

use difflib::sequencematcher::SequenceMatcher;

/// Minimum ratio for a window to count as a match.
pub const FUZZY_CUTOFF: f64 = 0.85;

/// Close matches kept per phrase.
pub const FUZZY_MAX_MATCHES: usize = 2;

/// Largest n-gram window compared against phrases.
const MAX_WINDOW: usize = 3;

/// Tokens of the text plus every 2- and 3-token window.
pub fn candidate_windows(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut windows: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

    for n in 2..=MAX_WINDOW {
        if tokens.len() < n {
            break;
        }
        windows.extend(tokens.windows(n).map(|w| w.join(" ")));
    }

    windows
}

/// Best windows scoring at least `cutoff` against the phrase, highest first.
///
/// A zero `limit` or a cutoff outside 0.0 - 1.0 matches nothing.
pub fn close_matches<'a>(
    phrase: &str,
    windows: &'a [String],
    cutoff: f64,
    limit: usize,
) -> Vec<&'a str> {
    if limit == 0 || !(0.0..=1.0).contains(&cutoff) || windows.is_empty() {
        return Vec::new();
    }
    let candidates: Vec<&'a str> = windows.iter().map(String::as_str).collect();
    difflib::get_close_matches(phrase, candidates, limit, cutoff as f32)
}

/// Whether a phrase occurs in the text, exactly or approximately.
pub fn phrase_matches(text: &str, windows: &[String], phrase: &str) -> bool {
    // Exact substring shortcut
    if text.contains(phrase) {
        return true;
    }
    !close_matches(phrase, windows, FUZZY_CUTOFF, FUZZY_MAX_MATCHES).is_empty()
}

/// Ratcliff/Obershelp similarity in 0.0 - 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let mut matcher = SequenceMatcher::new(a, b);
    f64::from(matcher.ratio())
}
