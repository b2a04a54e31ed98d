use crate::cell::{Cell, all_cells};
use crate::error::KnowledgeError;
use crate::sentence::Sentence;
use itertools::iproduct;
use rand::Rng;
use rand::prelude::IndexedRandom;
use std::collections::{BTreeSet, HashSet};

const LOG_KNOWLEDGE: &str = "knowledge";
const LOG_INFERENCE: &str = "inference";

/// Upper bound on inference passes per call to [`KnowledgeBase::infer`].
pub const DEFAULT_PASS_LIMIT: usize = 1_000;

/// Everything the agent knows about the board.
///
/// The knowledge base exclusively owns its sentences and the three cell sets.
/// It maintains that:
/// - every probed cell is safe, and no cell is both safe and a mine;
/// - resolved cells (safe or mine) never appear in a sentence;
/// - no sentence is empty, and no two sentences are equal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    sentences: Vec<Sentence>,
    pass_limit: usize,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        KnowledgeBase {
            height,
            width,
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            sentences: Vec::new(),
            pass_limit: DEFAULT_PASS_LIMIT,
        }
    }

    pub fn with_pass_limit(mut self, pass_limit: usize) -> Self {
        self.pass_limit = pass_limit;
        self
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Deserializes a knowledge base from bytes.
    pub fn deserialize(bts: &[u8]) -> anyhow::Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    /// Serializes the knowledge base to bytes.
    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    /// Records the board's answer for a freshly probed `cell`: `count` of its
    /// neighbors are mines.
    ///
    /// 1. Marks the cell as probed and safe.
    /// 2. Adds a sentence over its neighbors that are not yet resolved, with
    ///    known mines already subtracted from `count`.
    /// 3. Runs inference until nothing more can be concluded.
    ///
    /// Probing the same cell twice is a no-op.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<(), KnowledgeError> {
        if !cell.in_bounds(self.height, self.width) {
            return Err(KnowledgeError::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            });
        }
        if self.mines.contains(&cell) {
            return Err(KnowledgeError::ProbedMine(cell));
        }
        if self.moves_made.contains(&cell) {
            log::debug!(target: LOG_KNOWLEDGE, "Ignoring repeated probe of {cell}.");
            return Ok(());
        }

        // Validate the observation before touching any state.
        let sentence = self.observation(cell, count)?;

        log::debug!(target: LOG_KNOWLEDGE, "Probed {cell} with {count} adjacent mines: {sentence}");

        // Work on a copy so a failed observation leaves no trace.
        let mut next = self.clone();
        next.moves_made.insert(cell);
        next.mark_safe(cell)?;
        next.insert_sentence(sentence);

        let passes = next.settle()?;
        log::debug!(
            target: LOG_KNOWLEDGE,
            "Settled after {passes} passes: {} mines, {} safes, {} sentences.",
            next.mines.len(),
            next.safes.len(),
            next.sentences.len()
        );

        *self = next;
        Ok(())
    }

    /// Builds the sentence for `count` mines around `cell`, leaving out
    /// neighbors already resolved.
    fn observation(&self, cell: Cell, count: usize) -> Result<Sentence, KnowledgeError> {
        let inconsistent = KnowledgeError::InconsistentCount { cell, count };

        let mut unresolved = BTreeSet::new();
        let mut remaining = count;
        for neighbor in cell.neighbors(self.height, self.width) {
            if self.mines.contains(&neighbor) {
                remaining = remaining.checked_sub(1).ok_or_else(|| inconsistent.clone())?;
            } else if !self.safes.contains(&neighbor) {
                unresolved.insert(neighbor);
            }
        }

        Sentence::new(unresolved, remaining).ok_or(inconsistent)
    }

    /// Adds `sentence` unless it is empty or already known.
    fn insert_sentence(&mut self, sentence: Sentence) -> bool {
        if sentence.is_empty() || self.sentences.contains(&sentence) {
            return false;
        }
        self.sentences.push(sentence);
        true
    }

    /// Marks `cell` as a mine everywhere. Returns whether it was news.
    fn mark_mine(&mut self, cell: Cell) -> Result<bool, KnowledgeError> {
        if self.safes.contains(&cell)
            || self
                .sentences
                .iter()
                .any(|s| s.count() == 0 && s.contains(&cell))
        {
            return Err(KnowledgeError::Contradiction(cell));
        }

        let fresh = self.mines.insert(cell);
        for sentence in &mut self.sentences {
            sentence.mark_mine(cell)?;
        }
        Ok(fresh)
    }

    /// Marks `cell` as safe everywhere. Returns whether it was news.
    fn mark_safe(&mut self, cell: Cell) -> Result<bool, KnowledgeError> {
        if self.mines.contains(&cell)
            || self
                .sentences
                .iter()
                .any(|s| s.count() == s.len() && s.contains(&cell))
        {
            return Err(KnowledgeError::Contradiction(cell));
        }

        let fresh = self.safes.insert(cell);
        for sentence in &mut self.sentences {
            sentence.mark_safe(cell);
        }
        Ok(fresh)
    }

    /// Applies inference passes until one changes nothing.
    ///
    /// Returns how many passes made progress, so an already settled knowledge
    /// base reports zero. At most `pass_limit` passes may make progress. On
    /// error the knowledge base is left as it was.
    pub fn infer(&mut self) -> Result<usize, KnowledgeError> {
        let mut next = self.clone();
        let passes = next.settle()?;
        *self = next;
        Ok(passes)
    }

    fn settle(&mut self) -> Result<usize, KnowledgeError> {
        for progress in 0..=self.pass_limit {
            if !self.inference_pass()? {
                return Ok(progress);
            }
        }
        Err(KnowledgeError::PassLimit(self.pass_limit))
    }

    /// A single round of deduction. Discoveries and derived sentences are
    /// gathered from a snapshot of the sentences and applied afterwards.
    fn inference_pass(&mut self) -> Result<bool, KnowledgeError> {
        let mut changed = false;

        // --- 1. Collect certainties ---
        let mut found_mines = BTreeSet::new();
        let mut found_safes = BTreeSet::new();
        for sentence in &self.sentences {
            found_mines.extend(sentence.known_mines());
            found_safes.extend(sentence.known_safes());
        }
        if let Some(&cell) = found_mines.intersection(&found_safes).next() {
            return Err(KnowledgeError::Contradiction(cell));
        }

        // --- 2. Purge known mines that slipped into a sentence ---
        let mines = &self.mines;
        for sentence in &mut self.sentences {
            let stale: Vec<Cell> = sentence.cells().intersection(mines).copied().collect();
            for cell in stale {
                sentence.discard(&cell);
                if sentence.count() > sentence.len() {
                    return Err(KnowledgeError::Contradiction(cell));
                }
                changed = true;
            }
        }

        // --- 3. Propagate certainties ---
        for &cell in &found_mines {
            changed |= self.mark_mine(cell)?;
        }
        for &cell in &found_safes {
            changed |= self.mark_safe(cell)?;
        }

        // --- 4. Drop empty sentences and duplicates left by marking ---
        let mut seen = HashSet::new();
        self.sentences
            .retain(|sentence| !sentence.is_empty() && seen.insert(sentence.clone()));

        // --- 5. Subset inference ---
        let mut derived: Vec<Sentence> = Vec::new();
        for (superset, subset) in iproduct!(&self.sentences, &self.sentences) {
            if superset.cells() == subset.cells() {
                if superset.count() != subset.count() {
                    return Err(impossible(superset, subset));
                }
                continue;
            }
            if !subset.is_subset_of(superset) {
                continue;
            }

            let inference = superset
                .difference(subset)
                .ok_or_else(|| impossible(superset, subset))?;
            if !self.sentences.contains(&inference) && !derived.contains(&inference) {
                log::trace!(target: LOG_INFERENCE, "{superset} minus {subset} gives {inference}");
                derived.push(inference);
            }
        }
        changed |= !derived.is_empty();
        self.sentences.extend(derived);

        log::trace!(
            target: LOG_INFERENCE,
            "Pass found {} mines and {} safes, {} sentences remain.",
            found_mines.len(),
            found_safes.len(),
            self.sentences.len()
        );

        Ok(changed)
    }

    /// A probed cell's worth of safety: known safe, not yet probed.
    ///
    /// Pure query. Picks the lowest such cell in row-major order.
    pub fn safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).next().copied()
    }

    /// Any cell that is neither probed nor a known mine, chosen with `rng`.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = all_cells(self.height, self.width)
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .collect();
        candidates.choose(rng).copied()
    }
}

fn impossible(superset: &Sentence, subset: &Sentence) -> KnowledgeError {
    KnowledgeError::ImpossibleInference {
        superset: superset.to_string(),
        subset: subset.to_string(),
    }
}
