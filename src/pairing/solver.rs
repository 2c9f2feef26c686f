//! Randomized backtracking search for a Hamiltonian cycle in an
//! [`ExclusionGraph`].
//!
//! For each starting participant (in shuffled order) the search walks
//! allowed edges depth first, never revisiting anyone, and closes the cycle
//! only when everybody has been reached and the last person may give back to
//! the start. Candidate receivers are shuffled at every branch point, so
//! repeated runs land on different valid cycles. The search is exhaustive: if
//! a cycle exists it is found.
//!
//! The depth-first walk keeps its own stack of frames rather than recursing,
//! which bounds native stack use and lets every extension be counted against
//! an optional step budget.
//!
//! Worst case is exponential in the number of participants, which is fine for
//! the group sizes a gift exchange has.
//!
//! # Example
//! ```
//! use secret_santa::pairing::{ExclusionGraph, Solver, SolverConfig};
//! use secret_santa::Error;
//! use std::collections::BTreeMap;
//!
//! let mut exclusions = BTreeMap::new();
//! exclusions.insert("A", vec!["B"]);
//! exclusions.insert("B", vec!["A"]);
//! let graph = ExclusionGraph::from_exclusions(&["A", "B"], &exclusions).unwrap();
//!
//! let mut solver = Solver::new(SolverConfig::new().with_seed(1));
//! assert_eq!(solver.solve(&graph), Err(Error::Infeasible));
//! ```

use crate::error::{Error, Result};
use crate::pairing::{ExclusionGraph, Pairing};
use log::{debug, trace, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

/// Configuration options for the cycle search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Seed for the solver's generator. `None` seeds from system entropy.
    pub seed: Option<u64>,
    /// Upper bound on path extensions tried before giving up with
    /// [`Error::StepBudgetExhausted`]. `None` searches until done.
    pub max_steps: Option<u64>,
}

impl SolverConfig {
    /// Unseeded, unbounded search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Customize the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Customize the step budget.
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// Cycle search with its own random number generator.
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
    rng: ChaCha20Rng,
}

impl Solver {
    /// Create a solver from the given configuration
    pub fn new(config: SolverConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Create an unbounded solver with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SolverConfig::new().with_seed(seed))
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a gift-giving cycle through every participant of `graph`.
    ///
    /// # Returns
    /// - `Ok(pairs)`: `n` pairings forming a single cycle over allowed edges,
    ///   in cycle order.
    /// - `Err(Error::TooFewParticipants)`: fewer than two participants.
    /// - `Err(Error::Infeasible)`: the exclusions rule out every cycle.
    /// - `Err(Error::StepBudgetExhausted)`: the configured budget ran out.
    pub fn solve<T>(&mut self, graph: &ExclusionGraph<T>) -> Result<Vec<Pairing<T>>>
    where
        T: Ord + Clone + Debug,
    {
        search(graph, &mut self.rng, self.config.max_steps)
    }

    /// Like [`Solver::solve`], but tries every start concurrently.
    ///
    /// Each start gets its own generator, seeded from this solver's, and its
    /// own visited set; the graph is shared read-only. Whichever start finds
    /// a cycle first wins, so the result is not reproducible even with a
    /// seed. The step budget applies to each start separately.
    pub fn solve_parallel<T>(&mut self, graph: &ExclusionGraph<T>) -> Result<Vec<Pairing<T>>>
    where
        T: Ord + Clone + Debug + Sync,
    {
        let indexed = IndexedGraph::prepare(graph)?;
        let attempts: Vec<(usize, u64)> = (0..indexed.len()).map(|s| (s, self.rng.gen())).collect();
        let max_steps = self.config.max_steps;
        let exhausted = AtomicBool::new(false);
        let refuted = AtomicBool::new(false);

        debug!(
            "parallel search over {} participants ({} edges)",
            indexed.len(),
            graph.edge_count()
        );

        let found = attempts.into_par_iter().find_map_any(|(start, seed)| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut budget = Budget::new(max_steps);
            match indexed.attempt(start, &mut rng, &mut budget) {
                Ok(Some(path)) => Some(path),
                Ok(None) => {
                    refuted.store(true, Ordering::Relaxed);
                    None
                }
                Err(_) => {
                    exhausted.store(true, Ordering::Relaxed);
                    None
                }
            }
        });

        match found {
            Some(path) => Ok(indexed.pairings(&path)),
            None if refuted.load(Ordering::Relaxed) => Err(Error::Infeasible),
            None if exhausted.load(Ordering::Relaxed) => Err(Error::StepBudgetExhausted {
                steps: max_steps.unwrap_or_default(),
            }),
            None => Err(Error::Infeasible),
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// Finds a gift-giving cycle through every participant of `graph`, drawing
/// randomness from `rng`.
///
/// See [`Solver::solve`] for the possible outcomes; this entry point never
/// runs out of budget.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
/// use secret_santa::pairing::{is_hamiltonian_cycle, solve, ExclusionGraph};
/// use std::collections::BTreeMap;
///
/// let people = ["Charlie", "Karen", "Anne", "Sam", "Bob"];
/// let graph = ExclusionGraph::from_exclusions(&people, &BTreeMap::new()).unwrap();
/// let pairs = solve(&graph, &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
/// assert!(is_hamiltonian_cycle(&graph, &pairs));
/// ```
pub fn solve<T, R>(graph: &ExclusionGraph<T>, rng: &mut R) -> Result<Vec<Pairing<T>>>
where
    T: Ord + Clone + Debug,
    R: Rng + ?Sized,
{
    search(graph, rng, None)
}

fn search<T, R>(
    graph: &ExclusionGraph<T>,
    rng: &mut R,
    max_steps: Option<u64>,
) -> Result<Vec<Pairing<T>>>
where
    T: Ord + Clone + Debug,
    R: Rng + ?Sized,
{
    let indexed = IndexedGraph::prepare(graph)?;
    let mut starts: Vec<usize> = (0..indexed.len()).collect();
    starts.shuffle(rng);
    let mut budget = Budget::new(max_steps);

    debug!(
        "searching for a cycle through {} participants ({} edges)",
        indexed.len(),
        graph.edge_count()
    );

    // A cycle passes through every participant, so once any start has been
    // searched to the end without one, the graph is known to be infeasible.
    let mut refuted = false;

    // TODO: remember failed (node, visited) states; every start re-explores
    // the same dead ends.
    for start in starts {
        trace!("starting from {:?}", indexed.nodes[start]);
        match indexed.attempt(start, rng, &mut budget) {
            Ok(Some(path)) => {
                debug!(
                    "found a cycle from {:?} after {} steps",
                    indexed.nodes[start], budget.spent
                );
                let pairs = indexed.pairings(&path);
                debug_assert!(crate::pairing::is_hamiltonian_cycle(graph, &pairs));
                return Ok(pairs);
            }
            Ok(None) => refuted = true,
            Err(Error::StepBudgetExhausted { .. }) if refuted => {
                debug!("budget ran out after a start was already refuted");
                return Err(Error::Infeasible);
            }
            Err(err) => return Err(err),
        }
    }

    debug!("no cycle exists, gave up after {} steps", budget.spent);
    Err(Error::Infeasible)
}

/// The graph relabelled with dense indices for the search.
struct IndexedGraph<'a, T> {
    nodes: Vec<&'a T>,
    /// Allowed receivers per node, in participant order.
    adj: Vec<Vec<usize>>,
    /// `edge[u][v]` is true if `u` may give to `v`.
    edge: Vec<Vec<bool>>,
}

/// One level of the depth-first walk: the receivers still to try from the
/// node at the same depth of the path.
struct Frame {
    candidates: Vec<usize>,
    next: usize,
}

struct Budget {
    limit: Option<u64>,
    spent: u64,
}

impl Budget {
    fn new(limit: Option<u64>) -> Self {
        Self { limit, spent: 0 }
    }

    fn spend(&mut self) -> Result<()> {
        self.spent += 1;
        match self.limit {
            Some(limit) if self.spent > limit => {
                warn!("cycle search stopped after {limit} steps");
                Err(Error::StepBudgetExhausted { steps: limit })
            }
            _ => Ok(()),
        }
    }
}

impl<'a, T> IndexedGraph<'a, T>
where
    T: Ord + Clone + Debug,
{
    /// Relabels `graph` and rejects inputs that cannot contain a cycle
    /// without searching: fewer than two participants, or someone with no
    /// allowed receiver or no allowed giver.
    fn prepare(graph: &'a ExclusionGraph<T>) -> Result<Self> {
        let nodes: Vec<&T> = graph.participants().collect();
        let n = nodes.len();
        if n < 2 {
            return Err(Error::TooFewParticipants { found: n });
        }

        let index: BTreeMap<&T, usize> = nodes.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        let mut adj = vec![Vec::new(); n];
        let mut edge = vec![vec![false; n]; n];
        let mut in_degree = vec![0usize; n];

        for (u, giver) in nodes.iter().enumerate() {
            for receiver in graph.allowed(giver).into_iter().flatten() {
                if let Some(&v) = index.get(receiver) {
                    adj[u].push(v);
                    edge[u][v] = true;
                    in_degree[v] += 1;
                }
            }
        }

        for (i, node) in nodes.iter().enumerate() {
            if adj[i].is_empty() {
                debug!("{node:?} is not allowed to give to anyone");
                return Err(Error::Infeasible);
            }
            if in_degree[i] == 0 {
                debug!("nobody is allowed to give to {node:?}");
                return Err(Error::Infeasible);
            }
        }

        Ok(Self { nodes, adj, edge })
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn frame<R: Rng + ?Sized>(&self, node: usize, visited: &[bool], rng: &mut R) -> Frame {
        let mut candidates: Vec<usize> = self.adj[node]
            .iter()
            .copied()
            .filter(|&c| !visited[c])
            .collect();
        candidates.shuffle(rng);
        Frame {
            candidates,
            next: 0,
        }
    }

    /// Looks for a cycle that starts and ends at `start`.
    ///
    /// Returns the visiting order (beginning with `start`) on success,
    /// `None` once every branch is exhausted.
    fn attempt<R: Rng + ?Sized>(
        &self,
        start: usize,
        rng: &mut R,
        budget: &mut Budget,
    ) -> Result<Option<Vec<usize>>> {
        let n = self.len();
        // `start` counts as visited so it is never a candidate; it may only
        // appear again as the closing receiver.
        let mut visited = vec![false; n];
        visited[start] = true;
        let mut path = Vec::with_capacity(n);
        path.push(start);
        let mut frames = vec![self.frame(start, &visited, rng)];

        while let Some(frame) = frames.last_mut() {
            let Some(&next) = frame.candidates.get(frame.next) else {
                // dead end: undo this node and resume its parent
                frames.pop();
                if let Some(node) = path.pop() {
                    visited[node] = false;
                }
                continue;
            };
            frame.next += 1;
            budget.spend()?;

            if path.len() + 1 == n {
                if self.edge[next][start] {
                    path.push(next);
                    return Ok(Some(path));
                }
                continue;
            }

            visited[next] = true;
            path.push(next);
            let child = self.frame(next, &visited, rng);
            frames.push(child);
        }

        Ok(None)
    }

    fn pairings(&self, path: &[usize]) -> Vec<Pairing<T>> {
        let n = path.len();
        (0..n)
            .map(|i| {
                Pairing::new(
                    self.nodes[path[i]].clone(),
                    self.nodes[path[(i + 1) % n]].clone(),
                )
            })
            .collect()
    }
}
