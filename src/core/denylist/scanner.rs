// Content scanner - plain substring containment against the effective set.

use super::denylist_models::Glyph;
use std::collections::HashSet;

/// Returns the first banned glyph found in `text`, if any.
///
/// Empty glyphs are skipped since they would match every text.
pub fn find_banned<'a>(text: &str, banned: &'a HashSet<Glyph>) -> Option<&'a Glyph> {
    banned
        .iter()
        .find(|glyph| !glyph.is_empty() && text.contains(glyph.as_str()))
}

/// True iff any glyph of `banned` occurs in `text`.
pub fn contains_banned(text: &str, banned: &HashSet<Glyph>) -> bool {
    find_banned(text, banned).is_some()
}
