// Umpire identity normalization.

use deunicode::deunicode;

/// Canonical grouping key for an umpire name.
///
/// Transliterates to the closest ASCII equivalent (so "Ángel Hernández"
/// becomes "angel hernandez"), lowercases, and trims surrounding whitespace.
/// Applying it to an already-normalized name returns the name unchanged.
pub fn normalize_identity(raw: &str) -> String {
    deunicode(raw).trim().to_lowercase()
}
