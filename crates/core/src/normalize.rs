//! Accent and case folding for name comparisons.
//!
//! Two names are considered the same when their normalized forms are equal:
//! "Puebla", "puebla" and "Púebla" all fold to `puebla`. The folded form is
//! only used as a comparison key; names are always stored as entered.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lower-case `s`, decompose it (NFD) and drop every combining mark.
///
/// Lower-casing happens first so that characters whose lower-case form
/// decomposes (e.g. `İ`) are folded in a single pass, which keeps the
/// function idempotent.
///
/// ```
/// use client_directory_core::normalize;
///
/// assert_eq!(normalize("México"), "mexico");
/// assert_eq!(normalize("SAN ANDRÉS CHOLULA"), "san andres cholula");
/// ```
#[must_use]
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_accents_and_case() {
        assert_eq!(normalize("México"), "mexico");
        assert_eq!(normalize("mexico"), "mexico");
        assert_eq!(normalize("MÉXICO"), "mexico");
        assert_eq!(normalize("Querétaro"), "queretaro");
        assert_eq!(normalize("Nuevo León"), "nuevo leon");
    }

    #[test]
    fn test_tilde_n_and_dieresis() {
        assert_eq!(normalize("Peñón"), "penon");
        assert_eq!(normalize("Güémez"), "guemez");
    }

    #[test]
    fn test_precomposed_and_decomposed_agree() {
        // "é" as U+00E9 versus "e" + U+0301
        assert_eq!(normalize("Jos\u{e9}"), normalize("Jose\u{301}"));
    }

    #[test]
    fn test_idempotent() {
        for input in ["México", "Púebla", "İstanbul", "Ñuñoa", "already plain", ""] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_keeps_whitespace_and_punctuation() {
        assert_eq!(normalize("  Villa  Álvarez-Norte "), "  villa  alvarez-norte ");
    }
}
