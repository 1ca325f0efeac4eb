use std::path::PathBuf;

use thiserror::Error;

/// Reasons a puzzle catalog can be refused at load time.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog has no domains")]
    NoDomains,
    #[error("levelsToWin must be at least 1")]
    InvalidWinThreshold,
    #[error("domain {domain:?} repeats puzzle id {id:?}")]
    DuplicatePuzzleId { domain: String, id: String },
    #[error("puzzle {puzzle:?} repeats step id {id:?}")]
    DuplicateStepId { puzzle: String, id: String },
    #[error("puzzle {puzzle:?} has no steps")]
    EmptyPuzzle { puzzle: String },
    #[error("puzzle {puzzle:?}: shuffled steps are not a permutation of the correct steps")]
    MismatchedSteps { puzzle: String },
}
