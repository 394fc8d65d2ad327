//! Core ranked-list model.
//!
//! A tier list is an ordered mapping from [`Tier`] to the games ranked in
//! that band. Tier precedence (S first, F last) is the declaration order of
//! the enum, so a `BTreeMap<Tier, _>` iterates bands in render order for
//! free.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use image::Rgb;
use serde::{Deserialize, Serialize};

/// One ranked band of the tier list, S (best) through F (worst).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

/// All tiers in render precedence order.
pub const TIER_ORDER: [Tier; 7] = [
    Tier::S,
    Tier::A,
    Tier::B,
    Tier::C,
    Tier::D,
    Tier::E,
    Tier::F,
];

impl Tier {
    /// Parse a single tier letter, case-insensitively.
    ///
    /// Returns `None` for letters outside the fixed S–F enumeration; the
    /// document parser logs and skips those lines.
    pub fn from_letter(letter: char) -> Option<Tier> {
        match letter.to_ascii_uppercase() {
            'S' => Some(Tier::S),
            'A' => Some(Tier::A),
            'B' => Some(Tier::B),
            'C' => Some(Tier::C),
            'D' => Some(Tier::D),
            'E' => Some(Tier::E),
            'F' => Some(Tier::F),
            _ => None,
        }
    }

    /// The single-letter label drawn in the tier's label column.
    pub fn letter(self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::E => "E",
            Tier::F => "F",
        }
    }

    /// TierMaker-style band color for this tier.
    pub fn color(self) -> Rgb<u8> {
        match self {
            Tier::S => Rgb([0xff, 0x7f, 0x7f]),
            Tier::A => Rgb([0xff, 0xbf, 0x7f]),
            Tier::B => Rgb([0xff, 0xdf, 0x7f]),
            Tier::C => Rgb([0xbf, 0xff, 0x7f]),
            Tier::D => Rgb([0x7f, 0xff, 0x7f]),
            Tier::E => Rgb([0x7f, 0xff, 0xff]),
            Tier::F => Rgb([0x7f, 0x7f, 0xff]),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Ordered mapping from tier to the games ranked in it.
///
/// In-tier order is document order. Tiers with no games are simply absent
/// from the map; nothing in the crate renders an empty band.
pub type RankedList = BTreeMap<Tier, Vec<String>>;

/// Total number of games across all tiers.
pub fn total_games(list: &RankedList) -> usize {
    list.values().map(Vec::len).sum()
}

/// All game names in tier precedence order, flattened.
pub fn all_games(list: &RankedList) -> Vec<String> {
    list.values().flatten().cloned().collect()
}

/// Keep only the games present in `matched`, dropping tiers that end up
/// empty. In-tier order is preserved.
pub fn filter_to_matched(list: &RankedList, matched: &BTreeSet<String>) -> RankedList {
    let mut filtered = RankedList::new();
    for (tier, games) in list {
        let kept: Vec<String> = games
            .iter()
            .filter(|game| matched.contains(*game))
            .cloned()
            .collect();
        if !kept.is_empty() {
            filtered.insert(*tier, kept);
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_order_matches_declaration_order() {
        let mut sorted = TIER_ORDER;
        sorted.sort();
        assert_eq!(sorted, TIER_ORDER);
        assert!(Tier::S < Tier::A);
        assert!(Tier::E < Tier::F);
    }

    #[test]
    fn from_letter_is_case_insensitive() {
        assert_eq!(Tier::from_letter('s'), Some(Tier::S));
        assert_eq!(Tier::from_letter('B'), Some(Tier::B));
        assert_eq!(Tier::from_letter('g'), None);
        assert_eq!(Tier::from_letter('1'), None);
    }

    #[test]
    fn ranked_list_iterates_in_precedence_order() {
        let mut list = RankedList::new();
        list.insert(Tier::F, vec!["Worst".to_string()]);
        list.insert(Tier::S, vec!["Best".to_string()]);
        list.insert(Tier::B, vec!["Mid".to_string()]);

        let tiers: Vec<Tier> = list.keys().copied().collect();
        assert_eq!(tiers, vec![Tier::S, Tier::B, Tier::F]);
    }

    #[test]
    fn filter_to_matched_drops_empty_tiers_and_keeps_order() {
        let mut list = RankedList::new();
        list.insert(
            Tier::S,
            vec!["Hades".to_string(), "Balatro".to_string(), "Noita".to_string()],
        );
        list.insert(Tier::A, vec!["Downwell".to_string()]);

        let matched: BTreeSet<String> =
            ["Noita".to_string(), "Hades".to_string()].into_iter().collect();
        let filtered = filter_to_matched(&list, &matched);

        assert_eq!(
            filtered.get(&Tier::S).unwrap(),
            &vec!["Hades".to_string(), "Noita".to_string()]
        );
        assert!(!filtered.contains_key(&Tier::A));
    }

    #[test]
    fn total_games_sums_all_tiers() {
        let mut list = RankedList::new();
        list.insert(Tier::S, vec!["a".into(), "b".into()]);
        list.insert(Tier::C, vec!["c".into()]);
        assert_eq!(total_games(&list), 3);
        assert_eq!(all_games(&list), vec!["a", "b", "c"]);
    }
}
