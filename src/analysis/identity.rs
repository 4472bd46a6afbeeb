//! Contributor identity resolution.
//!
//! History often contains one human under several email addresses: a work
//! account, a personal account, a provider-generated noreply address. The
//! resolver clusters observed (email, name) pairs by name similarity and
//! collapses each cluster onto one canonical address. Everything downstream
//! rewrites emails through the resulting [`NormalizationMap`].
//!
//! Grouping is greedy and order-dependent: emails are visited in first-seen
//! order, each unassigned email seeds a group, and every other unassigned
//! email whose name matches the seed's joins it immediately. An email
//! consumed by one group is never reconsidered for another, so the result
//! is not a transitive closure. Report output depends on this exact
//! behavior; do not replace it with union-find style clustering.

use std::collections::{HashMap, HashSet};

use similar::TextDiff;

use crate::analysis::git::HistorySource;
use crate::types::Identity;

/// Names with a similarity ratio above this are treated as the same person.
const NAME_SIMILARITY_THRESHOLD: f32 = 0.6;

/// Addresses containing this marker are provider-generated and only become
/// canonical when a group holds nothing else.
const NOREPLY_MARKER: &str = "noreply.github.com";

/// Lookup from non-canonical email to its group's canonical email.
///
/// Canonical emails are absent from the map; [`NormalizationMap::normalize`]
/// falls back to the input. Built once per run, read-only afterwards, and
/// recomputed from current history on the next run.
#[derive(Debug, Clone, Default)]
pub struct NormalizationMap {
    entries: HashMap<String, String>,
}

impl NormalizationMap {
    /// Resolve an email to its canonical form.
    pub fn normalize<'a>(&'a self, email: &'a str) -> &'a str {
        self.entries.get(email).map(String::as_str).unwrap_or(email)
    }

    /// Whether any email gets rewritten at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-canonical emails with a rewrite entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over (non-canonical, canonical) pairs, unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(original, canonical)| (original.as_str(), canonical.as_str()))
    }

    /// Build the map from a history source. When the identity query fails
    /// the map degrades to empty and every email passes through untouched;
    /// the run itself continues.
    pub fn from_source(source: &dyn HistorySource) -> Self {
        match source.list_identities() {
            Ok(identities) => resolve_identities(&identities),
            Err(err) => {
                eprintln!("warning: identity query failed ({err}); emails will not be merged");
                Self::default()
            }
        }
    }
}

/// Cluster observed identities into contributor groups and produce the
/// normalization map.
///
/// Duplicate emails in the input collapse to one entry keeping their first
/// position, with the most recently seen name winning. Groups that end up
/// with a single member are discarded; those emails get no map entry.
pub fn resolve_identities(identities: &[Identity]) -> NormalizationMap {
    let ordered = fold_identities(identities);

    let mut entries = HashMap::new();
    let mut assigned: HashSet<usize> = HashSet::new();

    for seed in 0..ordered.len() {
        if assigned.contains(&seed) {
            continue;
        }
        let seed_name = ordered[seed].name.to_lowercase();
        let mut group = vec![seed];

        for candidate in 0..ordered.len() {
            if candidate == seed || assigned.contains(&candidate) {
                continue;
            }
            let candidate_name = ordered[candidate].name.to_lowercase();
            if same_person(&seed_name, &candidate_name) {
                group.push(candidate);
                assigned.insert(candidate);
            }
        }

        if group.len() > 1 {
            let canonical = canonical_email(&ordered, &group);
            for &member in &group {
                if ordered[member].email != canonical {
                    entries.insert(ordered[member].email.clone(), canonical.clone());
                }
            }
            assigned.insert(seed);
        }
    }

    NormalizationMap { entries }
}

/// Collapse raw observations into one entry per email, keeping first-seen
/// order while the most recent name for an email wins.
fn fold_identities(identities: &[Identity]) -> Vec<Identity> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ordered: Vec<Identity> = Vec::new();

    for identity in identities {
        match index.get(identity.email.as_str()) {
            Some(&at) => ordered[at].name = identity.name.clone(),
            None => {
                index.insert(identity.email.as_str(), ordered.len());
                ordered.push(identity.clone());
            }
        }
    }
    ordered
}

/// Whether two case-folded names plausibly belong to the same person:
/// one contains the other, or the character-level sequence-matcher ratio
/// clears the threshold.
fn same_person(a: &str, b: &str) -> bool {
    if a.contains(b) || b.contains(a) {
        return true;
    }
    TextDiff::from_chars(a, b).ratio() > NAME_SIMILARITY_THRESHOLD
}

/// Pick the canonical address for a group: the shortest member that is not
/// a provider noreply address, or the shortest overall when every member is
/// one. Length ties keep the earliest member.
fn canonical_email(ordered: &[Identity], group: &[usize]) -> String {
    let member_emails = || group.iter().map(|&at| ordered[at].email.as_str());

    shortest(member_emails().filter(|email| !email.contains(NOREPLY_MARKER)))
        .or_else(|| shortest(member_emails()))
        .unwrap_or_default()
        .to_string()
}

/// First shortest element, ties resolved toward the earliest.
fn shortest<'a>(mut candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let first = candidates.next()?;
    Some(candidates.fold(first, |best, email| {
        if email.len() < best.len() {
            email
        } else {
            best
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use pretty_assertions::assert_eq;

    fn identities(pairs: &[(&str, &str)]) -> Vec<Identity> {
        pairs
            .iter()
            .map(|(email, name)| Identity::new(*email, *name))
            .collect()
    }

    #[test]
    fn merges_case_folded_equal_names() {
        let map = resolve_identities(&identities(&[
            ("a@x.com", "Jane Doe"),
            ("a2@x.com", "jane doe"),
            ("b@y.com", "Bob Roe"),
        ]));

        assert_eq!(map.len(), 1);
        assert_eq!(map.normalize("a2@x.com"), "a@x.com");
        assert_eq!(map.normalize("b@y.com"), "b@y.com");
    }

    #[test]
    fn merges_substring_names() {
        let map = resolve_identities(&identities(&[
            ("jane@work.com", "Jane Elizabeth Doe"),
            ("jd@home.net", "jane doe"),
        ]));

        // "jane doe" is not a substring of the longer name, but the ratio
        // clears 0.6; either way they end up in one group.
        assert_eq!(map.normalize("jane@work.com"), "jd@home.net");
    }

    #[test]
    fn contained_name_always_matches() {
        let map = resolve_identities(&identities(&[
            ("j@x.com", "J"),
            ("jane.doe@long-company-domain.example.com", "Jane Doe"),
        ]));

        // "j" is contained in "jane doe"; the shorter email wins canonical.
        assert_eq!(
            map.normalize("jane.doe@long-company-domain.example.com"),
            "j@x.com"
        );
    }

    #[test]
    fn unrelated_names_stay_distinct() {
        let map = resolve_identities(&identities(&[
            ("bob@y.com", "Bob Roe"),
            ("jane@x.com", "Jane Doe"),
        ]));

        assert!(map.is_empty());
    }

    #[test]
    fn noreply_deprioritized_even_when_shorter() {
        let map = resolve_identities(&identities(&[
            ("a@noreply.github.com", "Sam Poe"),
            ("ab@company.com", "sam poe"),
        ]));

        assert_eq!(map.normalize("a@noreply.github.com"), "ab@company.com");
        assert_eq!(map.normalize("ab@company.com"), "ab@company.com");
    }

    #[test]
    fn all_noreply_group_falls_back_to_shortest() {
        let map = resolve_identities(&identities(&[
            ("xy@noreply.github.com", "Sam Poe"),
            ("x@noreply.github.com", "sam poe"),
        ]));

        assert_eq!(map.normalize("xy@noreply.github.com"), "x@noreply.github.com");
    }

    #[test]
    fn last_seen_name_wins_for_duplicate_email() {
        // The first observation of a2@x.com would not match; the later one
        // does, and it keeps the email's original position.
        let map = resolve_identities(&identities(&[
            ("a@x.com", "Jane Doe"),
            ("a2@x.com", "Completely Different"),
            ("a2@x.com", "Jane Doe"),
        ]));

        assert_eq!(map.normalize("a2@x.com"), "a@x.com");
    }

    #[test]
    fn grouping_is_greedy_not_transitive() {
        // "maria garcia" absorbs "maria garcia lopez" on the first pass.
        // "garcia lopez" would have matched the absorbed name, but that
        // email is already assigned, and it does not match the seed, so it
        // ends up alone. First-match-wins, not transitive closure.
        let map = resolve_identities(&identities(&[
            ("a@x.com", "Maria Garcia"),
            ("b@x.com", "maria garcia lopez"),
            ("c@x.com", "Garcia Lopez"),
        ]));

        assert_eq!(map.normalize("b@x.com"), "a@x.com");
        assert_eq!(map.normalize("c@x.com"), "c@x.com");
    }

    #[test]
    fn equal_length_canonical_tie_keeps_earliest() {
        let map = resolve_identities(&identities(&[
            ("a@x.com", "Maria Garcia"),
            ("b@x.com", "maria garcia"),
        ]));

        assert_eq!(map.normalize("b@x.com"), "a@x.com");
        assert_eq!(map.normalize("a@x.com"), "a@x.com");
    }

    #[test]
    fn seed_consumes_match_on_first_encounter() {
        // bob@x.com seeds first and immediately absorbs bobby@x.com; the
        // unrelated name in between is left alone.
        let map = resolve_identities(&identities(&[
            ("bob@x.com", "Bob Roe"),
            ("jane@x.com", "Jane Doe"),
            ("bobby@x.com", "bob roe"),
        ]));

        assert_eq!(map.normalize("bobby@x.com"), "bob@x.com");
        assert_eq!(map.normalize("jane@x.com"), "jane@x.com");
    }

    #[test]
    fn canonical_is_never_a_map_key() {
        let map = resolve_identities(&identities(&[
            ("jane.doe@company.com", "Jane Doe"),
            ("jd@home.net", "jane doe"),
            ("12345+jd@users.noreply.github.com", "Jane Doe"),
        ]));

        for (original, canonical) in map.iter() {
            assert_ne!(original, canonical);
            assert_eq!(map.normalize(canonical), canonical);
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let input = identities(&[
            ("jane.doe@company.com", "Jane Doe"),
            ("jd@home.net", "jane doe"),
            ("bob@y.com", "Bob Roe"),
            ("12345+jd@users.noreply.github.com", "Jane Doe"),
        ]);

        let first = resolve_identities(&input);
        let second = resolve_identities(&input);

        let mut a: Vec<_> = first.iter().collect();
        let mut b: Vec<_> = second.iter().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let map = resolve_identities(&[]);
        assert!(map.is_empty());
        assert_eq!(map.normalize("anyone@x.com"), "anyone@x.com");
    }

    struct FailingSource;

    impl HistorySource for FailingSource {
        fn list_identities(&self) -> Result<Vec<Identity>, ReportError> {
            Err(ReportError::Git {
                command: "git log".to_string(),
                stderr: "fatal: not a git repository".to_string(),
            })
        }

        fn list_commits(&self) -> Result<String, ReportError> {
            unreachable!("not used by this test")
        }

        fn list_numeric_changes(&self) -> Result<String, ReportError> {
            unreachable!("not used by this test")
        }
    }

    #[test]
    fn failed_identity_query_degrades_to_empty_map() {
        let map = NormalizationMap::from_source(&FailingSource);
        assert!(map.is_empty());
        assert_eq!(map.normalize("a@x.com"), "a@x.com");
    }
}
