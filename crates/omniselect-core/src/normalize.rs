//! Canonical query strings for caching and provider requests.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Toggles for [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    pub strip_accents: bool,
    pub fold_case: bool,
}

impl NormalizeOptions {
    pub const fn new(strip_accents: bool, fold_case: bool) -> Self {
        Self {
            strip_accents,
            fold_case,
        }
    }
}

/// Turn raw typed text into the query used as cache key and sent to the provider.
///
/// Never mutates the raw text; callers keep that for display.
pub fn normalize(raw: &str, opts: NormalizeOptions) -> String {
    let mut out = if opts.strip_accents {
        strip_accents(raw)
    } else {
        raw.to_string()
    };
    if opts.fold_case {
        out = out.to_lowercase();
    }
    out
}

/// Remove diacritics: decompose (NFD), drop combining marks, recompose.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}
