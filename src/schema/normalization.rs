use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold text for case- and diacritic-insensitive comparison.
///
/// Lowercases, decomposes (NFD) and drops combining marks, so "Élodie",
/// "ELODIE" and "elodie" all fold to "elodie".
pub fn fold_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
