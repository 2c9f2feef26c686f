//! # Exclusion Graph
//!
//! Directed graph over the participants of a gift exchange. An edge `A -> B`
//! means "A may give a gift to B". The graph is built once from the
//! participant list and everyone's exclusions, then only read.
//!
//! Invariants held by every constructed graph:
//! - no participant has an edge to themself
//! - every edge target is one of the participants
//!
//! Adjacency is kept in ordered maps so that iteration is deterministic and a
//! seeded search reproduces the same assignment.
//!
//! ## Example Usage
//! ```rust
//! use secret_santa::pairing::ExclusionGraph;
//! use std::collections::BTreeMap;
//!
//! let people = ["Anne", "Bob", "Sam"];
//! let mut exclusions = BTreeMap::new();
//! exclusions.insert("Bob", vec!["Sam"]);
//!
//! let graph = ExclusionGraph::from_exclusions(&people, &exclusions).unwrap();
//! assert!(graph.allows(&"Bob", &"Anne"));
//! assert!(!graph.allows(&"Bob", &"Sam"));
//! assert!(graph.allows(&"Sam", &"Bob"));
//! assert_eq!(graph.edge_count(), 5);
//! ```

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionGraph<T>
where
    T: Ord + Clone + Debug,
{
    /// participant -> everyone they are allowed to give to
    adj: BTreeMap<T, BTreeSet<T>>,
}

impl<T> ExclusionGraph<T>
where
    T: Ord + Clone + Debug,
{
    /// Builds the graph where each participant may give to every other
    /// participant except the ones listed in their exclusions.
    ///
    /// Participants missing from `exclusions` are unconstrained. Listing
    /// oneself as an exclusion is allowed and changes nothing.
    ///
    /// Fails with [`Error::DuplicateParticipant`] if a participant appears
    /// twice, or [`Error::UnknownParticipant`] if `exclusions` mentions
    /// anyone outside `participants`. Fewer than two participants is accepted
    /// here and reported when solving.
    pub fn from_exclusions(participants: &[T], exclusions: &BTreeMap<T, Vec<T>>) -> Result<Self> {
        let members = unique_members(participants)?;

        for (giver, excluded) in exclusions {
            if !members.contains(giver) {
                return Err(Error::unknown(giver));
            }
            if let Some(stranger) = excluded.iter().find(|p| !members.contains(*p)) {
                return Err(Error::unknown(stranger));
            }
        }

        let adj = members
            .iter()
            .map(|giver| {
                let excluded = exclusions.get(giver);
                let allowed: BTreeSet<T> = members
                    .iter()
                    .filter(|receiver| *receiver != giver)
                    .filter(|receiver| excluded.map_or(true, |ex| !ex.contains(*receiver)))
                    .cloned()
                    .collect();
                (giver.clone(), allowed)
            })
            .collect();

        Ok(Self { adj })
    }

    /// Builds the graph from an explicit allowed-edge map.
    ///
    /// The keys are the participants. Fails with [`Error::SelfLoop`] if
    /// anyone may give to themself, or [`Error::UnknownParticipant`] if an
    /// edge points outside the key set.
    pub fn from_allowed(adj: BTreeMap<T, BTreeSet<T>>) -> Result<Self> {
        for (giver, allowed) in &adj {
            if allowed.contains(giver) {
                return Err(Error::self_loop(giver));
            }
            if let Some(stranger) = allowed.iter().find(|r| !adj.contains_key(*r)) {
                return Err(Error::unknown(stranger));
            }
        }
        Ok(Self { adj })
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.adj.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Participants in ascending order.
    pub fn participants(&self) -> impl Iterator<Item = &T> + '_ {
        self.adj.keys()
    }

    pub fn contains(&self, participant: &T) -> bool {
        self.adj.contains_key(participant)
    }

    /// Everyone `giver` may give to, or `None` if `giver` is not a participant.
    pub fn allowed(&self, giver: &T) -> Option<&BTreeSet<T>> {
        self.adj.get(giver)
    }

    /// Whether `giver -> receiver` is an edge.
    pub fn allows(&self, giver: &T, receiver: &T) -> bool {
        self.adj
            .get(giver)
            .is_some_and(|allowed| allowed.contains(receiver))
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adj.values().map(BTreeSet::len).sum()
    }
}

fn unique_members<T>(participants: &[T]) -> Result<BTreeSet<T>>
where
    T: Ord + Clone + Debug,
{
    let mut members = BTreeSet::new();
    for p in participants {
        if !members.insert(p.clone()) {
            return Err(Error::duplicate(p));
        }
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_exclusions() -> BTreeMap<&'static str, Vec<&'static str>> {
        BTreeMap::new()
    }

    #[test]
    fn test_complete_graph_without_exclusions() {
        let people = ["Charlie", "Karen", "Anne", "Sam", "Bob"];
        let graph = ExclusionGraph::from_exclusions(&people, &no_exclusions()).unwrap();

        assert_eq!(graph.len(), 5);
        assert_eq!(graph.edge_count(), 20);
        for giver in &people {
            assert!(!graph.allows(giver, giver));
            assert_eq!(graph.allowed(giver).unwrap().len(), 4);
        }
    }

    #[test]
    fn test_mutual_exclusion() {
        let people = ["Charlie", "Karen", "Anne", "Sam", "Bob"];
        let mut exclusions = no_exclusions();
        exclusions.insert("Bob", vec!["Sam"]);
        exclusions.insert("Sam", vec!["Bob"]);
        let graph = ExclusionGraph::from_exclusions(&people, &exclusions).unwrap();

        assert!(!graph.allows(&"Bob", &"Sam"));
        assert!(!graph.allows(&"Sam", &"Bob"));
        assert!(graph.allows(&"Bob", &"Anne"));
        assert_eq!(graph.edge_count(), 18);
    }

    #[test]
    fn test_self_exclusion_is_harmless() {
        let people = ["A", "B"];
        let mut exclusions = no_exclusions();
        exclusions.insert("A", vec!["A"]);
        let graph = ExclusionGraph::from_exclusions(&people, &exclusions).unwrap();
        assert!(graph.allows(&"A", &"B"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_participants_are_sorted() {
        let people = ["Sam", "Anne", "Karen"];
        let graph = ExclusionGraph::from_exclusions(&people, &no_exclusions()).unwrap();
        let order: Vec<_> = graph.participants().copied().collect();
        assert_eq!(order, vec!["Anne", "Karen", "Sam"]);
    }

    #[test]
    fn test_duplicate_participant() {
        let people = ["A", "B", "A"];
        let err = ExclusionGraph::from_exclusions(&people, &no_exclusions()).unwrap_err();
        assert_eq!(err, Error::DuplicateParticipant("\"A\"".to_string()));
    }

    #[test]
    fn test_unknown_participant_in_exclusions() {
        let people = ["A", "B"];

        let mut unknown_giver = no_exclusions();
        unknown_giver.insert("Z", vec!["A"]);
        assert_eq!(
            ExclusionGraph::from_exclusions(&people, &unknown_giver),
            Err(Error::UnknownParticipant("\"Z\"".to_string()))
        );

        let mut unknown_receiver = no_exclusions();
        unknown_receiver.insert("A", vec!["Y"]);
        assert_eq!(
            ExclusionGraph::from_exclusions(&people, &unknown_receiver),
            Err(Error::UnknownParticipant("\"Y\"".to_string()))
        );
    }

    #[test]
    fn test_small_graphs_are_constructible() {
        let empty: [&str; 0] = [];
        assert!(ExclusionGraph::from_exclusions(&empty, &no_exclusions())
            .unwrap()
            .is_empty());
        assert_eq!(
            ExclusionGraph::from_exclusions(&["A"], &no_exclusions())
                .unwrap()
                .edge_count(),
            0
        );
    }

    #[test]
    fn test_from_allowed() {
        let mut adj = BTreeMap::new();
        adj.insert(1, BTreeSet::from([2]));
        adj.insert(2, BTreeSet::from([3]));
        adj.insert(3, BTreeSet::from([1]));
        let graph = ExclusionGraph::from_allowed(adj).unwrap();
        assert!(graph.allows(&1, &2));
        assert!(!graph.allows(&2, &1));
        assert!(!graph.allows(&4, &1));
        assert!(graph.allowed(&4).is_none());
        assert!(graph.contains(&3));
        assert!(!graph.contains(&4));
    }

    #[test]
    fn test_from_allowed_rejects_self_loop() {
        let mut adj = BTreeMap::new();
        adj.insert(1, BTreeSet::from([1, 2]));
        adj.insert(2, BTreeSet::from([1]));
        assert_eq!(
            ExclusionGraph::from_allowed(adj),
            Err(Error::SelfLoop("1".to_string()))
        );
    }

    #[test]
    fn test_from_allowed_rejects_dangling_edge() {
        let mut adj = BTreeMap::new();
        adj.insert(1, BTreeSet::from([2]));
        adj.insert(2, BTreeSet::from([9]));
        assert_eq!(
            ExclusionGraph::from_allowed(adj),
            Err(Error::UnknownParticipant("9".to_string()))
        );
    }
}
