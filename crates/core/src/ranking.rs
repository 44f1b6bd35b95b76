//! Dense ranking shared by every leaderboard.

use serde::{Deserialize, Serialize};

/// A leaderboard row: the ranked item plus its 1-based dense rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    pub rank: i64,
    #[serde(flatten)]
    pub item: T,
}

/// Assigns dense ranks to items already sorted best-first. Equal keys share a
/// rank and the next distinct key gets the following rank (1, 1, 2, ...).
pub fn dense_rank<T, K, F>(sorted: Vec<T>, key: F) -> Vec<Ranked<T>>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut ranked = Vec::with_capacity(sorted.len());
    let mut rank = 0;
    let mut previous: Option<K> = None;
    for item in sorted {
        let k = key(&item);
        if previous.as_ref() != Some(&k) {
            rank += 1;
            previous = Some(k);
        }
        ranked.push(Ranked { rank, item });
    }
    ranked
}
