//! Secret santa pairing.
//!
//! Two ways to assign gift givers to receivers:
//! - [`random_pairings`]: shuffle everyone and hand each person the next one
//!   along, which always yields a single cycle.
//! - [`solve`] / [`Solver`]: search an [`ExclusionGraph`] for a Hamiltonian
//!   cycle, so that forbidden giver/receiver combinations never appear.
//!
//! Both produce the same shape: an ordered list of [`Pairing`]s where each
//! receiver is the giver of the next pair, and the last receiver is the first
//! giver.
//!
//! # Examples
//!
//! ```rust
//! use secret_santa::pairing::{is_hamiltonian_cycle, ExclusionGraph, Solver};
//! use std::collections::BTreeMap;
//!
//! let people = ["Charlie", "Karen", "Anne", "Sam", "Bob"];
//! let mut exclusions = BTreeMap::new();
//! exclusions.insert("Bob", vec!["Sam"]);
//! exclusions.insert("Sam", vec!["Bob"]);
//!
//! let graph = ExclusionGraph::from_exclusions(&people, &exclusions).unwrap();
//! let pairs = Solver::with_seed(7).solve(&graph).unwrap();
//!
//! assert_eq!(pairs.len(), 5);
//! assert!(is_hamiltonian_cycle(&graph, &pairs));
//! ```

pub mod exclusion;
pub mod random;
pub mod solver;

pub use exclusion::ExclusionGraph;
pub use random::random_pairings;
pub use solver::{solve, Solver, SolverConfig};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One giver handing a gift to one receiver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pairing<T> {
    pub giver: T,
    pub receiver: T,
}

impl<T> Pairing<T> {
    pub fn new(giver: T, receiver: T) -> Self {
        Self { giver, receiver }
    }
}

impl<T> From<(T, T)> for Pairing<T> {
    fn from((giver, receiver): (T, T)) -> Self {
        Self { giver, receiver }
    }
}

impl<T> From<Pairing<T>> for (T, T) {
    fn from(pairing: Pairing<T>) -> Self {
        (pairing.giver, pairing.receiver)
    }
}

impl<T: fmt::Display> fmt::Display for Pairing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.giver, self.receiver)
    }
}

/// Checks that `pairs` is a single cycle over exactly `participants`.
///
/// Every participant gives once and receives once, nobody gives to
/// themself, and walking giver -> receiver from any participant visits
/// everyone before coming back.
pub fn is_single_cycle<T: Ord>(participants: &[T], pairs: &[Pairing<T>]) -> bool {
    let n = participants.len();
    if n < 2 || pairs.len() != n {
        return false;
    }

    let members: BTreeSet<&T> = participants.iter().collect();
    if members.len() != n {
        return false;
    }

    let mut next: BTreeMap<&T, &T> = BTreeMap::new();
    let mut receivers: BTreeSet<&T> = BTreeSet::new();
    for pair in pairs {
        if pair.giver == pair.receiver
            || !members.contains(&pair.giver)
            || !members.contains(&pair.receiver)
        {
            return false;
        }
        if next.insert(&pair.giver, &pair.receiver).is_some() {
            return false;
        }
        if !receivers.insert(&pair.receiver) {
            return false;
        }
    }

    // A permutation with no fixed points can still split into sub-cycles.
    let start = &pairs[0].giver;
    let mut current = start;
    for hop in 1..=n {
        current = match next.get(current) {
            Some(receiver) => *receiver,
            None => return false,
        };
        if current == start {
            return hop == n;
        }
    }
    false
}

/// Checks that `pairs` is a Hamiltonian cycle of `graph`: a single cycle over
/// all of its participants using only allowed edges.
pub fn is_hamiltonian_cycle<T>(graph: &ExclusionGraph<T>, pairs: &[Pairing<T>]) -> bool
where
    T: Ord + Clone + fmt::Debug,
{
    let participants: Vec<T> = graph.participants().cloned().collect();
    is_single_cycle(&participants, pairs)
        && pairs
            .iter()
            .all(|pair| graph.allows(&pair.giver, &pair.receiver))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&'static str, &'static str)]) -> Vec<Pairing<&'static str>> {
        raw.iter().copied().map(Pairing::from).collect()
    }

    #[test]
    fn test_display() {
        assert_eq!(Pairing::new("Anne", "Bob").to_string(), "Anne -> Bob");
    }

    #[test]
    fn test_tuple_conversion() {
        let pair: Pairing<u32> = (1, 2).into();
        assert_eq!(pair.giver, 1);
        assert_eq!(pair.receiver, 2);
        assert_eq!(<(u32, u32)>::from(pair), (1, 2));
    }

    #[test]
    fn test_single_cycle_accepts_rotation() {
        let people = ["A", "B", "C"];
        assert!(is_single_cycle(
            &people,
            &pairs(&[("B", "C"), ("C", "A"), ("A", "B")])
        ));
    }

    #[test]
    fn test_single_cycle_rejects_sub_cycles() {
        // Two disjoint swaps: a valid derangement, but not one cycle.
        let people = ["A", "B", "C", "D"];
        assert!(!is_single_cycle(
            &people,
            &pairs(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")])
        ));
    }

    #[test]
    fn test_single_cycle_rejects_malformed() {
        let people = ["A", "B", "C"];
        // self-pair
        assert!(!is_single_cycle(
            &people,
            &pairs(&[("A", "A"), ("B", "C"), ("C", "B")])
        ));
        // receiver twice
        assert!(!is_single_cycle(
            &people,
            &pairs(&[("A", "B"), ("B", "C"), ("C", "B")])
        ));
        // too short
        assert!(!is_single_cycle(&people, &pairs(&[("A", "B"), ("B", "A")])));
        // stranger
        assert!(!is_single_cycle(
            &people,
            &pairs(&[("A", "B"), ("B", "Z"), ("Z", "A")])
        ));
        // a lone participant never forms a cycle
        assert!(!is_single_cycle(&["A"], &pairs(&[("A", "A")])));
    }

    #[test]
    fn test_hamiltonian_cycle_respects_edges() {
        let people = ["A", "B", "C"];
        let mut exclusions = BTreeMap::new();
        exclusions.insert("A", vec!["B"]);
        let graph = ExclusionGraph::from_exclusions(&people, &exclusions).unwrap();

        assert!(!is_hamiltonian_cycle(
            &graph,
            &pairs(&[("A", "B"), ("B", "C"), ("C", "A")])
        ));
        assert!(is_hamiltonian_cycle(
            &graph,
            &pairs(&[("A", "C"), ("C", "B"), ("B", "A")])
        ));
    }
}
