//! Non-repeating question selection across the regular and rare pools.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::models::{PoolKind, Question, QuestionBank};

/// Questions already served in the current session, keyed by pool and position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedSet {
    entries: HashSet<(PoolKind, usize)>,
}

impl UsedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a served question. Returns `false` if it was already present.
    pub fn insert(&mut self, kind: PoolKind, index: usize) -> bool {
        self.entries.insert((kind, index))
    }

    pub fn contains(&self, kind: PoolKind, index: usize) -> bool {
        self.entries.contains(&(kind, index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Result of asking the selector for the next question.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A fresh question and the pool it came from.
    Question {
        question: Question,
        kind: PoolKind,
        index: usize,
    },
    /// Every question of both pools has been served.
    Exhausted,
}

/// Picks unused questions, preferring the rare pool with a configurable chance.
#[derive(Debug, Clone)]
pub struct QuestionSelector<R> {
    bank: QuestionBank,
    rng: R,
}

impl<R: Rng> QuestionSelector<R> {
    pub fn new(bank: QuestionBank, rng: R) -> Self {
        Self { bank, rng }
    }

    /// Select a question that is not yet in `used` and mark it as used.
    ///
    /// The rare pool is targeted when a uniform draw falls below
    /// `rare_chance` or the regular pool is empty. An empty or fully used
    /// target falls back to the other pool; when both have nothing left the
    /// call returns [`Selection::Exhausted`].
    pub fn select_next(&mut self, rare_chance: f64, used: &mut UsedSet) -> Selection {
        let draw: f64 = self.rng.gen();
        let mut kind = if draw < rare_chance || self.bank.pool(PoolKind::Regular).is_empty() {
            PoolKind::Rare
        } else {
            PoolKind::Regular
        };
        if self.bank.pool(kind).is_empty() {
            kind = kind.other();
        }

        // One attempt per pool.
        for _ in 0..2 {
            let available = self.available(kind, used);
            if !available.is_empty() {
                let index = available[self.rng.gen_range(0..available.len())];
                let inserted = used.insert(kind, index);
                debug_assert!(inserted, "selected question was already used");
                debug!(pool = %kind, index, remaining = available.len() - 1, "Question selected");
                return Selection::Question {
                    question: self.bank.pool(kind)[index].clone(),
                    kind,
                    index,
                };
            }
            kind = kind.other();
        }

        debug!(served = used.len(), "Both question pools exhausted");
        Selection::Exhausted
    }

    /// Number of questions across both pools not yet in `used`.
    pub fn remaining(&self, used: &UsedSet) -> usize {
        [PoolKind::Regular, PoolKind::Rare]
            .into_iter()
            .map(|kind| self.available(kind, used).len())
            .sum()
    }

    /// Whether no question can be served any more.
    pub fn is_exhausted(&self, used: &UsedSet) -> bool {
        self.remaining(used) == 0
    }

    fn available(&self, kind: PoolKind, used: &UsedSet) -> Vec<usize> {
        (0..self.bank.pool(kind).len())
            .filter(|index| !used.contains(kind, *index))
            .collect()
    }
}
