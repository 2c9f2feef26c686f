use crate::error::{Error, Result};
use crate::pairing::Pairing;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Pairs everyone up at random, ignoring any exclusions.
///
/// Shuffles a copy of `participants`, then has the person at position `i`
/// give to the person at position `(i + 1) % n`. The result is always one
/// cycle through all `n` participants, so nobody draws themself.
///
/// # Arguments
/// - `participants`: the people taking part, each listed once.
/// - `rng`: source of randomness for the shuffle.
///
/// # Returns
/// `n` pairings, or [`Error::TooFewParticipants`] when fewer than two people
/// are given, or [`Error::DuplicateParticipant`] when someone is listed twice.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
/// use secret_santa::pairing::{is_single_cycle, random_pairings};
///
/// let people = ["Charlie", "Karen", "Anne", "Sam", "Bob"];
/// let mut rng = ChaCha20Rng::seed_from_u64(42);
/// let pairs = random_pairings(&people, &mut rng).unwrap();
/// assert_eq!(pairs.len(), 5);
/// assert!(is_single_cycle(&people, &pairs));
/// ```
pub fn random_pairings<T, R>(participants: &[T], rng: &mut R) -> Result<Vec<Pairing<T>>>
where
    T: Ord + Clone + Debug,
    R: Rng + ?Sized,
{
    if participants.len() < 2 {
        return Err(Error::TooFewParticipants {
            found: participants.len(),
        });
    }
    let mut seen = BTreeSet::new();
    for p in participants {
        if !seen.insert(p) {
            return Err(Error::duplicate(p));
        }
    }

    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);

    let n = shuffled.len();
    Ok((0..n)
        .map(|i| Pairing::new(shuffled[i].clone(), shuffled[(i + 1) % n].clone()))
        .collect())
}
