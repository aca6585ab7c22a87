//! Free-text station resolution.

use tracing::debug;

use crate::domain::StationCode;
use crate::timetable::StationIndex;

/// Default minimum similarity for a fuzzy match.
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.75;

/// How a mention was matched to a station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    /// The mention was already a known code.
    Code,
    /// The mention equals a station name.
    Name,
    /// The mention is close to a station name.
    Fuzzy { score: f64 },
    /// The mention is contained in a station name.
    Substring,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    pub code: &'a StationCode,
    pub kind: MatchKind,
}

/// Maps station mentions to codes using a borrowed, read-only index.
///
/// Precedence is strict: exact code, exact name, fuzzy name, substring of a
/// name. Every tie is broken by lexicographic station name, so the result
/// never depends on insertion order.
#[derive(Debug, Clone, Copy)]
pub struct StationResolver<'a> {
    index: &'a StationIndex,
    cutoff: f64,
}

impl<'a> StationResolver<'a> {
    /// Create a resolver with the default fuzzy cutoff.
    pub fn new(index: &'a StationIndex) -> Self {
        Self {
            index,
            cutoff: DEFAULT_FUZZY_CUTOFF,
        }
    }

    /// Set a custom fuzzy cutoff in `0.0..=1.0`.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff.clamp(0.0, 1.0);
        self
    }

    /// Returns the fuzzy cutoff.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Resolve a mention to a station code.
    pub fn resolve(&self, text: &str) -> Option<&'a StationCode> {
        self.resolve_detailed(text).map(|r| r.code)
    }

    /// Resolve a mention, reporting how it matched.
    pub fn resolve_detailed(&self, text: &str) -> Option<Resolved<'a>> {
        let needle = normalize(text);
        if needle.is_empty() {
            return None;
        }

        if let Some(code) = self.index.known_code(&needle) {
            return Some(Resolved {
                code,
                kind: MatchKind::Code,
            });
        }

        if let Some(code) = self.index.code_for_name(&needle) {
            return Some(Resolved {
                code,
                kind: MatchKind::Name,
            });
        }

        if let Some((code, score)) = self.best_fuzzy(&needle) {
            return Some(Resolved {
                code,
                kind: MatchKind::Fuzzy { score },
            });
        }

        if let Some(code) = self.best_substring(&needle) {
            return Some(Resolved {
                code,
                kind: MatchKind::Substring,
            });
        }

        debug!(mention = %needle, "could not resolve station");
        None
    }

    /// Highest-scoring name at or above the cutoff.
    fn best_fuzzy(&self, needle: &str) -> Option<(&'a StationCode, f64)> {
        let mut best: Option<(&'a StationCode, f64)> = None;

        // Names iterate in lexicographic order; a strict comparison keeps
        // the first of any equally-scored names.
        for (name, code) in self.index.names() {
            let score = similarity(needle, name);
            if score < self.cutoff {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((code, score));
            }
        }

        best
    }

    /// Shortest name containing the needle.
    fn best_substring(&self, needle: &str) -> Option<&'a StationCode> {
        let mut best: Option<(usize, &'a StationCode)> = None;

        for (name, code) in self.index.names() {
            if !name.contains(needle) {
                continue;
            }
            let len = name.chars().count();
            if best.is_none_or(|(best_len, _)| len < best_len) {
                best = Some((len, code));
            }
        }

        best.map(|(_, code)| code)
    }
}

/// Canonical comparison form of a mention.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Similarity ratio in `0.0..=1.0`, 1.0 meaning identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn index() -> StationIndex {
        let mut index = StationIndex::default();
        for (name, code) in [
            ("NEW DELHI", "NDLS"),
            ("CHENNAI CENTRAL", "MAS"),
            ("HOWRAH JN", "HWH"),
            ("BANGALORE CITY JN", "SBC"),
        ] {
            index.insert(name.to_string(), StationCode::parse(code).unwrap());
        }
        index
    }

    proptest! {
        /// Resolution ignores letter case.
        #[test]
        fn case_insensitive(s in "[a-zA-Z ]{0,20}") {
            let index = index();
            let resolver = StationResolver::new(&index);
            prop_assert_eq!(
                resolver.resolve(&s.to_lowercase()),
                resolver.resolve(&s.to_uppercase())
            );
        }

        /// Any resolution yields a known code.
        #[test]
        fn resolves_to_known_codes(s in "[a-zA-Z ]{0,20}") {
            let index = index();
            let resolver = StationResolver::new(&index);
            if let Some(code) = resolver.resolve(&s) {
                prop_assert!(index.codes().any(|c| c == code));
            }
        }
    }
}
