//! Read-only puzzle catalog: domains, stages, puzzles and their steps.
//!
//! The JSON shape is the one the game data has always used:
//! `{ levelsToWin, domains: [ { name, stages: [ { name?, puzzles: [...] } ] } ] }`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::CatalogError;

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    Initiation,
    Execution,
    Settlement,
    #[default]
    Other,
}

impl Phase {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "initiation" => Phase::Initiation,
            "execution" => Phase::Execution,
            "settlement" => Phase::Settlement,
            _ => Phase::Other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Initiation => "Initiation",
            Phase::Execution => "Execution",
            Phase::Settlement => "Settlement",
            Phase::Other => "Other",
        }
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(Phase::from_tag).unwrap_or_default())
    }
}

// Game data files mix numeric and string ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Step {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phase: Phase,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub question: String,
    pub correct_steps: Vec<Step>,
    #[serde(default)]
    pub shuffled_steps: Vec<Step>,
}

impl Puzzle {
    fn validate(&self) -> Result<(), CatalogError> {
        if self.correct_steps.is_empty() {
            return Err(CatalogError::EmptyPuzzle {
                puzzle: self.id.clone(),
            });
        }
        let mut correct_ids = HashSet::with_capacity(self.correct_steps.len());
        for step in &self.correct_steps {
            if !correct_ids.insert(step.id.as_str()) {
                return Err(CatalogError::DuplicateStepId {
                    puzzle: self.id.clone(),
                    id: step.id.clone(),
                });
            }
        }
        let shuffled_ids: HashSet<&str> =
            self.shuffled_steps.iter().map(|step| step.id.as_str()).collect();
        if self.shuffled_steps.len() != self.correct_steps.len() || shuffled_ids != correct_ids {
            return Err(CatalogError::MismatchedSteps {
                puzzle: self.id.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Stage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub puzzles: Vec<Puzzle>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Domain {
    /// Every puzzle in the domain, stage boundaries ignored.
    pub fn puzzles(&self) -> impl Iterator<Item = &Puzzle> {
        self.stages.iter().flat_map(|stage| stage.puzzles.iter())
    }

    #[cfg(test)]
    pub fn puzzle_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.puzzles.len()).sum()
    }

    pub fn puzzle(&self, id: &str) -> Option<&Puzzle> {
        self.puzzles().find(|puzzle| puzzle.id == id)
    }

    pub fn stage_of(&self, puzzle_id: &str) -> Option<&Stage> {
        self.stages
            .iter()
            .find(|stage| stage.puzzles.iter().any(|puzzle| puzzle.id == puzzle_id))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub levels_to_win: u32,
    pub domains: Vec<Domain>,
}

impl Catalog {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|domain| domain.name == name)
    }

    pub fn first_domain(&self) -> Option<&Domain> {
        self.domains.first()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.domains.is_empty() {
            return Err(CatalogError::NoDomains);
        }
        if self.levels_to_win == 0 {
            return Err(CatalogError::InvalidWinThreshold);
        }
        for domain in &self.domains {
            let mut seen = HashSet::new();
            for puzzle in domain.puzzles() {
                if !seen.insert(puzzle.id.as_str()) {
                    return Err(CatalogError::DuplicatePuzzleId {
                        domain: domain.name.clone(),
                        id: puzzle.id.clone(),
                    });
                }
                puzzle.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_json(shuffled: &str) -> String {
        format!(
            r#"{{
                "levelsToWin": 2,
                "domains": [{{
                    "name": "Lending",
                    "stages": [{{
                        "name": "Origination",
                        "puzzles": [{{
                            "id": 1,
                            "question": "Order the loan steps",
                            "correctSteps": [
                                {{ "id": "a", "title": "Apply", "description": "", "phase": "initiation" }},
                                {{ "id": "b", "title": "Approve", "description": "", "phase": "Execution" }}
                            ],
                            "shuffledSteps": {shuffled}
                        }}]
                    }}]
                }}]
            }}"#
        )
    }

    #[test]
    fn parses_numeric_ids_and_phase_tags() {
        let raw = catalog_json(
            r#"[{ "id": "b", "title": "Approve", "phase": "execution" },
                { "id": "a", "title": "Apply", "phase": "weird" }]"#,
        );
        let catalog = Catalog::from_json(&raw).unwrap();
        let domain = catalog.domain("Lending").unwrap();
        let puzzle = domain.puzzle("1").unwrap();
        assert_eq!(puzzle.correct_steps[0].phase, Phase::Initiation);
        assert_eq!(puzzle.correct_steps[1].phase, Phase::Execution);
        assert_eq!(puzzle.shuffled_steps[1].phase, Phase::Other);
        assert_eq!(domain.stage_of("1").map(|s| s.name.as_str()), Some("Origination"));
    }

    #[test]
    fn rejects_shuffled_steps_that_are_not_a_permutation() {
        let raw = catalog_json(r#"[{ "id": "a", "title": "Apply" }, { "id": "c", "title": "X" }]"#);
        assert!(matches!(
            Catalog::from_json(&raw),
            Err(CatalogError::MismatchedSteps { .. })
        ));
    }

    #[test]
    fn rejects_missing_shuffled_steps() {
        let raw = catalog_json("[]");
        assert!(matches!(
            Catalog::from_json(&raw),
            Err(CatalogError::MismatchedSteps { .. })
        ));
    }

    #[test]
    fn rejects_empty_catalog() {
        let raw = r#"{ "levelsToWin": 1, "domains": [] }"#;
        assert!(matches!(Catalog::from_json(raw), Err(CatalogError::NoDomains)));
    }

    const VALID_SHUFFLE: &str = r#"[{ "id": "b", "title": "Approve" }, { "id": "a", "title": "Apply" }]"#;

    fn single_puzzle_json(correct: &str, shuffled: &str) -> String {
        format!(
            r#"{{ "levelsToWin": 1, "domains": [{{ "name": "D", "stages": [{{ "puzzles": [
                {{ "id": "p", "correctSteps": {correct}, "shuffledSteps": {shuffled} }}
            ] }}] }}] }}"#
        )
    }

    #[test]
    fn rejects_zero_win_threshold() {
        let raw = catalog_json(VALID_SHUFFLE).replace(r#""levelsToWin": 2"#, r#""levelsToWin": 0"#);
        assert!(matches!(
            Catalog::from_json(&raw),
            Err(CatalogError::InvalidWinThreshold)
        ));
    }

    #[test]
    fn rejects_puzzle_ids_repeated_across_stages() {
        let puzzle = r#"{ "id": "p", "correctSteps": [{ "id": "a", "title": "A" }],
                          "shuffledSteps": [{ "id": "a", "title": "A" }] }"#;
        let raw = format!(
            r#"{{ "levelsToWin": 1, "domains": [{{ "name": "D", "stages": [
                {{ "name": "One", "puzzles": [{puzzle}] }},
                {{ "name": "Two", "puzzles": [{puzzle}] }}
            ] }}] }}"#
        );
        match Catalog::from_json(&raw) {
            Err(CatalogError::DuplicatePuzzleId { domain, id }) => {
                assert_eq!(domain, "D");
                assert_eq!(id, "p");
            }
            other => panic!("expected a duplicate puzzle id, got {other:?}"),
        }
    }

    #[test]
    fn same_puzzle_id_in_two_domains_is_allowed() {
        let puzzle = r#"{ "id": "p", "correctSteps": [{ "id": "a", "title": "A" }],
                          "shuffledSteps": [{ "id": "a", "title": "A" }] }"#;
        let raw = format!(
            r#"{{ "levelsToWin": 1, "domains": [
                {{ "name": "D", "stages": [{{ "puzzles": [{puzzle}] }}] }},
                {{ "name": "E", "stages": [{{ "puzzles": [{puzzle}] }}] }}
            ] }}"#
        );
        assert!(Catalog::from_json(&raw).is_ok());
    }

    #[test]
    fn rejects_repeated_step_ids() {
        let steps = r#"[{ "id": "a", "title": "A" }, { "id": "a", "title": "Again" }]"#;
        match Catalog::from_json(&single_puzzle_json(steps, steps)) {
            Err(CatalogError::DuplicateStepId { puzzle, id }) => {
                assert_eq!(puzzle, "p");
                assert_eq!(id, "a");
            }
            other => panic!("expected a duplicate step id, got {other:?}"),
        }
    }

    #[test]
    fn rejects_puzzle_without_steps() {
        match Catalog::from_json(&single_puzzle_json("[]", "[]")) {
            Err(CatalogError::EmptyPuzzle { puzzle }) => assert_eq!(puzzle, "p"),
            other => panic!("expected an empty puzzle, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = Path::new("/nonexistent/puzzle-race/catalog.json");
        match Catalog::load(path) {
            Err(CatalogError::Io { path: reported, source }) => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected an io error, got {other:?}"),
        }
    }

    #[test]
    fn bundled_catalog_is_valid() {
        let catalog = Catalog::bundled().unwrap();
        assert!(catalog.levels_to_win >= 1);
        for domain in &catalog.domains {
            assert!(domain.puzzle_count() >= catalog.levels_to_win as usize);
        }
    }
}
