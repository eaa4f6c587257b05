use serde::Serialize;

use crate::catalog::store::HashStore;
use crate::core::hash::{HashVector, DEFAULT_THRESHOLD};
use crate::core::record::HashRecord;
use crate::core::types::MatchMode;
use crate::matching::distance::{bounded_distance, distance};

/// A reference record and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Index of the reference record in its store
    pub index: usize,
    /// Distance between the query and that record
    pub distance: u64,
}

/// Classification of one candidate against the reference store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    /// A reference record is within the threshold
    Matched(Match),
    /// No reference record is within the threshold
    NoMatch,
    /// Score-only mode: the closest record, with no threshold applied.
    /// `None` when the reference store is empty.
    Scored { closest: Option<Match> },
}

impl Decision {
    /// The matched record, if this decision is a match
    pub fn matched(&self) -> Option<&Match> {
        match self {
            Self::Matched(m) => Some(m),
            _ => None,
        }
    }

    /// Distance reported for this decision.
    ///
    /// Score-only decisions against an empty store report 0.
    pub fn reported_distance(&self) -> Option<u64> {
        match self {
            Self::Matched(m) => Some(m.distance),
            Self::NoMatch => None,
            Self::Scored { closest } => Some(closest.map_or(0, |m| m.distance)),
        }
    }
}

/// Decision for one candidate record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateResult {
    /// Index of the candidate in its store
    pub index: usize,
    /// Candidate name
    pub name: String,
    pub decision: Decision,
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Copy)]
pub struct MatchingConfig {
    /// Classification strategy
    pub mode: MatchMode,
    /// Maximum distance counted as a match (ignored in score-only mode).
    /// A negative threshold admits nothing.
    pub threshold: i64,
    /// Classify candidates on the rayon thread pool
    pub parallel: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::First,
            threshold: DEFAULT_THRESHOLD,
            parallel: false,
        }
    }
}

/// How a scan over the reference store proceeds
#[derive(Debug, Clone, Copy)]
enum Scan {
    /// Stop at the first record within the limit, pruning each record's sum
    FirstWithin(u64),
    /// Visit every record and keep the closest
    Closest,
}

/// Linear matcher over one reference store
pub struct MatchingEngine<'a> {
    references: &'a HashStore,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(references: &'a HashStore) -> Self {
        Self {
            references,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(references: &'a HashStore, config: MatchingConfig) -> Self {
        Self { references, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn references(&self) -> &'a HashStore {
        self.references
    }

    /// Lowest-index reference whose distance is `<= threshold`.
    ///
    /// Each record's sum is abandoned as soon as it passes the threshold.
    pub fn find_first_match(&self, query: &HashVector, threshold: u64) -> Option<Match> {
        self.scan(query, Scan::FirstWithin(threshold))
    }

    /// Closest reference overall; ties go to the lowest index.
    ///
    /// Returns `None` only when the store is empty.
    pub fn find_best_match(&self, query: &HashVector) -> Option<Match> {
        self.scan(query, Scan::Closest)
    }

    /// Classify one query with the configured mode
    pub fn classify(&self, query: &HashVector) -> Decision {
        let limit = u64::try_from(self.config.threshold).ok();
        match self.config.mode {
            MatchMode::First => limit
                .and_then(|limit| self.find_first_match(query, limit))
                .map_or(Decision::NoMatch, Decision::Matched),
            MatchMode::Best => limit
                .and_then(|limit| self.find_best_match(query).filter(|m| m.distance <= limit))
                .map_or(Decision::NoMatch, Decision::Matched),
            MatchMode::Score => Decision::Scored {
                closest: self.find_best_match(query),
            },
        }
    }

    /// Classify every candidate, in candidate order
    pub fn classify_all(&self, candidates: &HashStore) -> Vec<CandidateResult> {
        if self.config.parallel {
            return self.classify_all_parallel(candidates);
        }

        candidates
            .iter()
            .enumerate()
            .map(|(index, record)| self.classify_record(index, record))
            .collect()
    }

    /// Parallel classification; results stay in candidate order
    #[cfg(feature = "parallel")]
    fn classify_all_parallel(&self, candidates: &HashStore) -> Vec<CandidateResult> {
        use rayon::prelude::*;

        candidates
            .records()
            .par_iter()
            .enumerate()
            .map(|(index, record)| self.classify_record(index, record))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn classify_all_parallel(&self, candidates: &HashStore) -> Vec<CandidateResult> {
        tracing::debug!("Built without the parallel feature; classifying sequentially");
        candidates
            .iter()
            .enumerate()
            .map(|(index, record)| self.classify_record(index, record))
            .collect()
    }

    fn classify_record(&self, index: usize, record: &HashRecord) -> CandidateResult {
        CandidateResult {
            index,
            name: record.name.clone(),
            decision: self.classify(&record.hash),
        }
    }

    fn scan(&self, query: &HashVector, scan: Scan) -> Option<Match> {
        let mut closest: Option<Match> = None;

        for (index, record) in self.references.iter().enumerate() {
            match scan {
                Scan::FirstWithin(limit) => {
                    if let Some(distance) = bounded_distance(query, &record.hash, limit) {
                        return Some(Match { index, distance });
                    }
                }
                Scan::Closest => {
                    let distance = distance(query, &record.hash);
                    // Strictly smaller only, so earlier records win ties
                    if closest.map_or(true, |c| distance < c.distance) {
                        closest = Some(Match { index, distance });
                    }
                }
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store of single-value hashes; each record's distance from `[0]` is
    /// the square of its value.
    fn store_at_distances(distances: &[u64]) -> HashStore {
        let records = distances
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let root = (d as f64).sqrt() as u64;
                assert_eq!(root * root, d, "test distances must be perfect squares");
                let value = u8::try_from(root).unwrap();
                HashRecord::new(format!("ref{i}"), HashVector::new(vec![value]))
            })
            .collect();
        HashStore::from_records(records, 1).unwrap()
    }

    fn store_of<const N: usize>(hashes: &[[u8; N]]) -> HashStore {
        let records = hashes
            .iter()
            .enumerate()
            .map(|(i, h)| HashRecord::new(format!("ref{i}"), HashVector::new(h.to_vec())))
            .collect();
        HashStore::from_records(records, N).unwrap()
    }

    fn origin(len: usize) -> HashVector {
        HashVector::new(vec![0u8; len])
    }

    fn engine(store: &HashStore, mode: MatchMode, threshold: i64) -> MatchingEngine<'_> {
        MatchingEngine::with_config(
            store,
            MatchingConfig {
                mode,
                threshold,
                parallel: false,
            },
        )
    }

    #[test]
    fn test_first_match_returns_first_qualifying_not_closest() {
        // Distances 50, 30 and 9999 from the origin
        let store = store_of(&[[7, 1, 0, 0], [5, 2, 1, 0], [99, 14, 1, 1]]);
        let engine = engine(&store, MatchMode::First, 100);
        let query = origin(4);

        assert_eq!(
            engine.find_first_match(&query, 100),
            Some(Match {
                index: 0,
                distance: 50
            })
        );
        assert_eq!(
            engine.classify(&query),
            Decision::Matched(Match {
                index: 0,
                distance: 50
            })
        );
    }

    #[test]
    fn test_best_match_returns_global_minimum() {
        let store = store_of(&[[7, 1, 0, 0], [5, 2, 1, 0], [99, 14, 1, 1]]);
        let engine = engine(&store, MatchMode::Best, 100);
        let query = origin(4);

        assert_eq!(
            engine.find_best_match(&query),
            Some(Match {
                index: 1,
                distance: 30
            })
        );
        assert_eq!(
            engine.classify(&query),
            Decision::Matched(Match {
                index: 1,
                distance: 30
            })
        );
    }

    #[test]
    fn test_best_match_tie_goes_to_lowest_index() {
        let store = store_at_distances(&[100, 25, 25, 25]);
        let engine = MatchingEngine::new(&store);
        let best = engine.find_best_match(&origin(1)).unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.distance, 25);
    }

    #[test]
    fn test_first_match_threshold_is_inclusive() {
        let store = store_at_distances(&[400, 100]);
        let engine = MatchingEngine::new(&store);
        assert_eq!(
            engine.find_first_match(&origin(1), 100),
            Some(Match {
                index: 1,
                distance: 100
            })
        );
        assert_eq!(engine.find_first_match(&origin(1), 99), None);
    }

    #[test]
    fn test_first_match_agrees_with_unpruned_scan() {
        let store = store_of(&[[30, 30], [10, 12], [3, 4], [0, 9], [1, 1]]);
        let query = HashVector::new(vec![2, 2]);
        let engine = MatchingEngine::new(&store);

        for threshold in [0, 1, 5, 40, 60, 100, 500, 2000] {
            let unpruned = store
                .iter()
                .enumerate()
                .map(|(index, r)| Match {
                    index,
                    distance: distance(&query, &r.hash),
                })
                .find(|m| m.distance <= threshold);
            assert_eq!(engine.find_first_match(&query, threshold), unpruned);
        }
    }

    #[test]
    fn test_best_mode_applies_threshold_after_search() {
        let store = store_at_distances(&[400, 144]);
        let engine = engine(&store, MatchMode::Best, 100);

        // The closest record is still found, but it is outside the threshold
        assert_eq!(engine.find_best_match(&origin(1)).map(|m| m.index), Some(1));
        assert_eq!(engine.classify(&origin(1)), Decision::NoMatch);
    }

    #[test]
    fn test_negative_threshold_matches_nothing() {
        let store = store_at_distances(&[0, 1]);
        let query = origin(1);

        assert_eq!(
            engine(&store, MatchMode::First, -5).classify(&query),
            Decision::NoMatch
        );
        assert_eq!(
            engine(&store, MatchMode::Best, -1).classify(&query),
            Decision::NoMatch
        );
        assert_eq!(
            engine(&store, MatchMode::Score, -5).classify(&query),
            Decision::Scored {
                closest: Some(Match {
                    index: 0,
                    distance: 0
                })
            }
        );
    }

    #[test]
    fn test_score_mode_ignores_threshold() {
        let store = store_at_distances(&[400, 144]);
        let engine = engine(&store, MatchMode::Score, 0);
        let decision = engine.classify(&origin(1));

        assert_eq!(
            decision,
            Decision::Scored {
                closest: Some(Match {
                    index: 1,
                    distance: 144
                })
            }
        );
        assert_eq!(decision.reported_distance(), Some(144));
    }

    #[test]
    fn test_empty_reference_store() {
        let store = HashStore::empty(1);
        let query = origin(1);

        assert_eq!(
            engine(&store, MatchMode::First, 100).classify(&query),
            Decision::NoMatch
        );
        assert_eq!(
            engine(&store, MatchMode::Best, 100).classify(&query),
            Decision::NoMatch
        );
        assert_eq!(MatchingEngine::new(&store).find_best_match(&query), None);

        let scored = engine(&store, MatchMode::Score, 100).classify(&query);
        assert_eq!(scored, Decision::Scored { closest: None });
        assert_eq!(scored.reported_distance(), Some(0));
    }

    #[test]
    fn test_classify_all_keeps_candidate_order() {
        let references = store_of(&[[0, 0], [4, 0]]);
        let candidates = store_of(&[[0, 0], [4, 0], [200, 200]]);

        let engine = engine(&references, MatchMode::First, 20);
        let results = engine.classify_all(&candidates);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].name, "ref0");
        assert_eq!(
            results[0].decision.matched().map(|m| (m.index, m.distance)),
            Some((0, 0))
        );
        // The first reference is already within the threshold
        assert_eq!(
            results[1].decision.matched().map(|m| (m.index, m.distance)),
            Some((0, 16))
        );
        assert_eq!(results[2].index, 2);
        assert_eq!(results[2].decision, Decision::NoMatch);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let references = store_of(&[[10, 10], [50, 60], [0, 3], [255, 0]]);
        let candidates = store_of(&[[0, 0], [49, 61], [250, 2], [128, 128], [11, 9]]);

        for mode in [MatchMode::First, MatchMode::Best, MatchMode::Score] {
            let sequential = engine(&references, mode, 300).classify_all(&candidates);
            let parallel = MatchingEngine::with_config(
                &references,
                MatchingConfig {
                    mode,
                    threshold: 300,
                    parallel: true,
                },
            )
            .classify_all(&candidates);
            assert_eq!(sequential, parallel);
        }
    }
}
