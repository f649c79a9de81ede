//! Fuzzy shop name matching.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Generic venue words that carry no identity.
static GENERIC_SUFFIXES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(店|餐厅|馆|酒楼|烧烤|面馆)").unwrap());

/// Two-tier match between a requested shop and an indexed one.
///
/// Case-insensitive containment in either direction matches first. Failing
/// that, generic venue words are removed from both names and the remaining
/// whitespace-separated keywords must overlap.
pub fn shop_matches(wanted: &str, indexed: &str) -> bool {
    let wanted = wanted.to_lowercase();
    let indexed = indexed.to_lowercase();
    if indexed.contains(&wanted) || wanted.contains(&indexed) {
        return true;
    }

    let wanted_core = GENERIC_SUFFIXES.replace_all(&wanted, "");
    let indexed_core = GENERIC_SUFFIXES.replace_all(&indexed, "");
    let wanted_keys: HashSet<&str> = wanted_core.split_whitespace().collect();
    indexed_core
        .split_whitespace()
        .any(|k| wanted_keys.contains(k))
}
