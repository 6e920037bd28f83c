//! Answer matching for fill-in-blank rounds.
//!
//! A definition may pack several accepted variants into one string
//! ("chien、狗" or "cat / feline"). A submission counts as correct when
//! it equals any variant after normalization; there is no substring or
//! edit-distance tolerance. Multiple-choice rounds are judged by strict
//! equality against the selected option and never come through here.

/// Delimiters that separate accepted variants inside a definition.
pub const VARIANT_DELIMITERS: [char; 4] = ['、', '/', '；', ';'];

/// Punctuation stripped during normalization: ASCII plus the full-width
/// forms common in Chinese and Japanese definitions.
const STRIPPED_PUNCTUATION: [char; 28] = [
    '.', ',', '!', '?', ';', ':', '(', ')', '/', '[', ']', '-', '。', '．', '，', '、', '！', '？',
    '；', '：', '（', '）', '／', '［', '］', '【', '】', '－',
];

/// Lower-case a string and strip all whitespace and punctuation.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

/// Accepted variants of a definition, in written order. Variants that
/// normalize to nothing are dropped.
pub fn variants(definition: &str) -> Vec<String> {
    definition
        .split(&VARIANT_DELIMITERS[..])
        .map(str::trim)
        .filter(|v| !normalize(v).is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a free-text submission matches any accepted variant of the
/// definition. Empty or effectively-empty input on either side never
/// matches.
pub fn matches(submitted: &str, definition: &str) -> bool {
    let submitted = normalize(submitted);
    if submitted.is_empty() {
        return false;
    }
    definition
        .split(&VARIANT_DELIMITERS[..])
        .map(normalize)
        .any(|variant| !variant.is_empty() && variant == submitted)
}
