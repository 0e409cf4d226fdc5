//! Nested boolean filter expressions over a track list
//!
//! A [`FilterNode`] combines its leaf predicates and up to two nested groups
//! with a single combinator. Evaluation builds one boolean per track (a mask)
//! and then keeps the tracks whose entry is `true`. Every string comparison
//! ignores case.
//!
//! A filter can be written as JSON:
//!
//! ```json
//! {
//!   "leaves": [{ "kind": "song_and", "keywords": ["a", "e"] }],
//!   "and": {
//!     "leaves": [{ "kind": "artist_or", "keywords": ["lil", "big"] }],
//!     "or": { "negate": true, "leaves": [{ "kind": "song_or", "keywords": ["no", "yes"] }] }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::types::Track;
use crate::error::{CoreError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    #[default]
    Or,
}

impl Combinator {
    /// Starting mask value that leaves the first operand unchanged.
    fn identity(self) -> bool {
        match self {
            Combinator::And => true,
            Combinator::Or => false,
        }
    }

    fn combine(self, left: &[bool], right: &[bool]) -> Result<Vec<bool>> {
        debug_assert_eq!(left.len(), right.len(), "masks must cover the same tracks");
        if left.len() != right.len() {
            return Err(CoreError::LengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        Ok(left
            .iter()
            .zip(right)
            .map(|(&l, &r)| match self {
                Combinator::And => l && r,
                Combinator::Or => l || r,
            })
            .collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    /// Every keyword is one of the track's artists.
    ArtistsAnd,
    /// At least one keyword is one of the track's artists.
    ArtistsOr,
    /// Some single artist name contains every keyword.
    ArtistAnd,
    /// Some single artist name contains at least one keyword.
    ArtistOr,
    /// The title is exactly one of the keywords.
    SongExact,
    /// The title contains every keyword.
    SongAnd,
    /// The title contains at least one keyword.
    SongOr,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPredicate {
    pub kind: PredicateKind,
    pub keywords: Vec<String>,
}

impl LeafPredicate {
    pub fn new<S: Into<String>>(kind: PredicateKind, keywords: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, track: &Track) -> bool {
        let keywords: Vec<String> = self.keywords.iter().map(|k| k.to_lowercase()).collect();
        let title = track.title.to_lowercase();
        let artists: Vec<String> = track.artists.iter().map(|a| a.to_lowercase()).collect();

        match self.kind {
            PredicateKind::ArtistsAnd => keywords.iter().all(|k| artists.contains(k)),
            PredicateKind::ArtistsOr => keywords.iter().any(|k| artists.contains(k)),
            PredicateKind::ArtistAnd => artists
                .iter()
                .any(|artist| keywords.iter().all(|k| artist.contains(k.as_str()))),
            PredicateKind::ArtistOr => artists
                .iter()
                .any(|artist| keywords.iter().any(|k| artist.contains(k.as_str()))),
            PredicateKind::SongExact => keywords.iter().any(|k| *k == title),
            PredicateKind::SongAnd => keywords.iter().all(|k| title.contains(k.as_str())),
            PredicateKind::SongOr => keywords.iter().any(|k| title.contains(k.as_str())),
        }
    }

    fn mask(&self, tracks: &[Track]) -> Vec<bool> {
        tracks.iter().map(|track| self.matches(track)).collect()
    }
}

/// One level of a filter expression.
///
/// `combinator` is `None` when unspecified: the root and `or` groups then
/// combine with OR. An `and` group always combines with AND, whatever it says.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combinator: Option<Combinator>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub negate: bool,
    #[serde(rename = "and", skip_serializing_if = "Option::is_none")]
    pub and_group: Option<Box<FilterNode>>,
    #[serde(rename = "or", skip_serializing_if = "Option::is_none")]
    pub or_group: Option<Box<FilterNode>>,
    pub leaves: Vec<LeafPredicate>,
}

impl FilterNode {
    pub fn or() -> Self {
        Self {
            combinator: Some(Combinator::Or),
            ..Self::default()
        }
    }

    pub fn and() -> Self {
        Self {
            combinator: Some(Combinator::And),
            ..Self::default()
        }
    }

    pub fn with_leaf(mut self, leaf: LeafPredicate) -> Self {
        self.leaves.push(leaf);
        self
    }

    pub fn with_and_group(mut self, group: FilterNode) -> Self {
        self.and_group = Some(Box::new(group));
        self
    }

    pub fn with_or_group(mut self, group: FilterNode) -> Self {
        self.or_group = Some(Box::new(group));
        self
    }

    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Per-track result of `expr`, aligned index for index with `tracks`.
pub fn build_mask(tracks: &[Track], expr: &FilterNode) -> Result<Vec<bool>> {
    mask_with(tracks, expr, expr.combinator.unwrap_or_default())
}

fn mask_with(tracks: &[Track], node: &FilterNode, combinator: Combinator) -> Result<Vec<bool>> {
    let or_mask = match &node.or_group {
        Some(group) => Some(mask_with(tracks, group, group.combinator.unwrap_or(Combinator::Or))?),
        None => None,
    };
    let and_mask = match &node.and_group {
        Some(group) => Some(mask_with(tracks, group, Combinator::And)?),
        None => None,
    };

    let mut mask = vec![combinator.identity(); tracks.len()];
    if let Some(or_mask) = or_mask {
        mask = combinator.combine(&or_mask, &mask)?;
    }
    if let Some(and_mask) = and_mask {
        mask = combinator.combine(&and_mask, &mask)?;
    }
    for leaf in &node.leaves {
        mask = combinator.combine(&mask, &leaf.mask(tracks))?;
    }

    if node.negate {
        mask.iter_mut().for_each(|m| *m = !*m);
    }
    Ok(mask)
}

/// Tracks matching `expr`, in input order. The input is left untouched.
pub fn filter(tracks: &[Track], expr: &FilterNode) -> Result<Vec<Track>> {
    let mask = build_mask(tracks, expr)?;
    Ok(tracks
        .iter()
        .zip(mask)
        .filter_map(|(track, keep)| keep.then(|| track.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs() -> Vec<Track> {
        vec![
            Track::new("Yesterday", vec!["The Beatles".into()], "1"),
            Track::new("Yesterday Once More", vec!["Carpenters".into()], "2"),
            Track::new("Under Pressure", vec!["Queen".into(), "David Bowie".into()], "3"),
            Track::new("Big Poppa", vec!["The Notorious B.I.G.".into()], "4"),
            Track::new("Lollipop", vec!["Lil Wayne".into(), "Static Major".into()], "5"),
        ]
    }

    fn ids(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.id.as_str()).collect()
    }

    fn leaf(kind: PredicateKind, keywords: &[&str]) -> LeafPredicate {
        LeafPredicate::new(kind, keywords.iter().copied())
    }

    fn all_leaves() -> Vec<LeafPredicate> {
        vec![
            leaf(PredicateKind::ArtistsAnd, &["queen", "DAVID BOWIE"]),
            leaf(PredicateKind::ArtistsOr, &["carpenters", "queen"]),
            leaf(PredicateKind::ArtistAnd, &["lil", "wayne"]),
            leaf(PredicateKind::ArtistOr, &["beat", "static"]),
            leaf(PredicateKind::SongExact, &["big poppa", "lollipop"]),
            leaf(PredicateKind::SongAnd, &["yes", "more"]),
            leaf(PredicateKind::SongOr, &["pressure", "pop"]),
        ]
    }

    #[test]
    fn song_exact_excludes_longer_titles() {
        let expr = FilterNode::or().with_leaf(leaf(PredicateKind::SongExact, &["yesterday"]));
        assert_eq!(ids(&filter(&songs(), &expr).unwrap()), vec!["1"]);
    }

    #[test]
    fn artist_or_matches_substrings() {
        let expr = FilterNode::or().with_leaf(leaf(PredicateKind::ArtistOr, &["beat"]));
        assert_eq!(ids(&filter(&songs(), &expr).unwrap()), vec!["1"]);
    }

    #[test]
    fn leaf_rules() {
        let tracks = songs();
        let expected: [&[&str]; 7] = [
            &["3"],
            &["2", "3"],
            &["5"],
            &["1", "5"],
            &["4", "5"],
            &["2"],
            &["3", "4", "5"],
        ];
        for (leaf, want) in all_leaves().into_iter().zip(expected) {
            let got = filter(&tracks, &FilterNode::or().with_leaf(leaf.clone())).unwrap();
            assert_eq!(ids(&got), want.to_vec(), "{:?}", leaf.kind);
        }
    }

    #[test]
    fn artists_and_needs_whole_names() {
        let tracks = songs();
        let partial = FilterNode::or().with_leaf(leaf(PredicateKind::ArtistsAnd, &["queen", "bowie"]));
        assert!(filter(&tracks, &partial).unwrap().is_empty());
    }

    #[test]
    fn artist_and_needs_a_single_artist() {
        // "queen" and "bowie" are split across two artists of the same track.
        let expr = FilterNode::or().with_leaf(leaf(PredicateKind::ArtistAnd, &["queen", "bowie"]));
        assert!(filter(&songs(), &expr).unwrap().is_empty());
    }

    #[test]
    fn single_leaf_or_node_is_the_leaf() {
        let tracks = songs();
        for leaf in all_leaves() {
            let direct: Vec<bool> = tracks.iter().map(|t| leaf.matches(t)).collect();
            let mask = build_mask(&tracks, &FilterNode::or().with_leaf(leaf)).unwrap();
            assert_eq!(mask, direct);
        }
    }

    #[test]
    fn negated_single_leaf_and_node_is_the_complement() {
        let tracks = songs();
        for leaf in all_leaves() {
            let complement: Vec<bool> = tracks.iter().map(|t| !leaf.matches(t)).collect();
            let mask = build_mask(&tracks, &FilterNode::and().with_leaf(leaf).negated()).unwrap();
            assert_eq!(mask, complement);
        }
    }

    #[test]
    fn de_morgan_over_leaf_pairs() {
        let tracks = songs();
        let leaves = all_leaves();
        for p in &leaves {
            for q in &leaves {
                let any = build_mask(&tracks, &FilterNode::or().with_leaf(p.clone()).with_leaf(q.clone())).unwrap();
                let not_all = build_mask(&tracks, &FilterNode::and().with_leaf(p.clone()).with_leaf(q.clone()).negated()).unwrap();
                let not_p_and_not_q: Vec<bool> = tracks.iter().map(|t| !p.matches(t) && !q.matches(t)).collect();
                let any_complement: Vec<bool> = any.iter().map(|b| !b).collect();

                assert_eq!(any_complement, not_p_and_not_q);
                let either_missing: Vec<bool> = tracks.iter().map(|t| !p.matches(t) || !q.matches(t)).collect();
                assert_eq!(not_all, either_missing);
            }
        }
    }

    #[test]
    fn empty_nodes_use_identity() {
        let tracks = songs();
        assert_eq!(build_mask(&tracks, &FilterNode::default()).unwrap(), vec![false; 5]);
        assert_eq!(build_mask(&tracks, &FilterNode::and()).unwrap(), vec![true; 5]);
        assert!(build_mask(&[], &FilterNode::and()).unwrap().is_empty());
    }

    #[test]
    fn and_group_is_forced_to_and() {
        let tracks = songs();
        // The group says OR but sits in the AND slot.
        let group = FilterNode::or()
            .with_leaf(leaf(PredicateKind::SongOr, &["yesterday"]))
            .with_leaf(leaf(PredicateKind::ArtistOr, &["carpenters"]));
        let expr = FilterNode::default().with_and_group(group);
        assert_eq!(ids(&filter(&tracks, &expr).unwrap()), vec!["2"]);
    }

    #[test]
    fn or_group_respects_its_own_combinator() {
        let tracks = songs();
        let group = FilterNode::and()
            .with_leaf(leaf(PredicateKind::SongOr, &["yesterday"]))
            .with_leaf(leaf(PredicateKind::ArtistOr, &["beatles"]));
        let expr = FilterNode::default().with_or_group(group);
        assert_eq!(ids(&filter(&tracks, &expr).unwrap()), vec!["1"]);

        let unspecified = FilterNode {
            leaves: vec![
                leaf(PredicateKind::SongOr, &["yesterday"]),
                leaf(PredicateKind::ArtistOr, &["beatles"]),
            ],
            ..FilterNode::default()
        };
        let expr = FilterNode::default().with_or_group(unspecified);
        assert_eq!(ids(&filter(&tracks, &expr).unwrap()), vec!["1", "2"]);
    }

    #[test]
    fn groups_and_leaves_share_the_node_combinator() {
        let tracks = songs();
        // song has "yesterday" AND NOT (artist contains "beat")
        let expr = FilterNode::and()
            .with_leaf(leaf(PredicateKind::SongOr, &["yesterday"]))
            .with_or_group(FilterNode::or().with_leaf(leaf(PredicateKind::ArtistOr, &["beat"])).negated());
        assert_eq!(ids(&filter(&tracks, &expr).unwrap()), vec!["2"]);
    }

    #[test]
    fn deeply_nested_expression() {
        let tracks = songs();
        // every vowel in the title, or (an artist with "lil" or "big" and no "no"/"yes" in the title)
        let expr = FilterNode::default()
            .with_leaf(leaf(PredicateKind::SongAnd, &["a", "e", "i", "o", "u"]))
            .with_and_group(
                FilterNode::default()
                    .with_leaf(leaf(PredicateKind::ArtistOr, &["lil", "big"]))
                    .with_or_group(FilterNode::default().with_leaf(leaf(PredicateKind::SongOr, &["no", "yes"])).negated()),
            );
        assert_eq!(ids(&filter(&tracks, &expr).unwrap()), vec!["5"]);
    }

    #[test]
    fn filter_preserves_input() {
        let tracks = songs();
        let before = tracks.clone();
        let expr = FilterNode::or().with_leaf(leaf(PredicateKind::SongOr, &["o"])).negated();
        let _ = filter(&tracks, &expr).unwrap();
        assert_eq!(tracks, before);
    }

    #[test]
    fn combine_rejects_unequal_lengths() {
        let result = std::panic::catch_unwind(|| Combinator::Or.combine(&[true], &[true, false]));
        match result {
            Ok(Err(CoreError::LengthMismatch { left: 1, right: 2 })) => {}
            Ok(other) => panic!("unexpected result {:?}", other),
            Err(_) => assert!(cfg!(debug_assertions)),
        }
    }

    #[test]
    fn parses_json_expression() {
        let json = r#"{
            "leaves": [{ "kind": "song_exact", "keywords": ["Yesterday"] }],
            "and": { "negate": true, "leaves": [{ "kind": "artists_or", "keywords": ["queen"] }] }
        }"#;
        let expr = FilterNode::from_json(json).unwrap();
        assert_eq!(expr.combinator, None);
        assert_eq!(expr.leaves[0].kind, PredicateKind::SongExact);
        let group = expr.and_group.as_ref().unwrap();
        assert!(group.negate);
        assert!(expr.or_group.is_none());

        let text = serde_json::to_string(&expr).unwrap();
        assert_eq!(FilterNode::from_json(&text).unwrap(), expr);
    }

    #[test]
    fn rejects_unknown_predicate_kind() {
        let json = r#"{ "leaves": [{ "kind": "album_or", "keywords": ["x"] }] }"#;
        assert!(FilterNode::from_json(json).is_err());
    }
}
