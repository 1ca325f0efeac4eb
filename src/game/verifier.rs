use super::catalog::Step;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Exact positional match of ids; a right set in the wrong order fails.
pub fn check_order(arranged: &[Step], canonical: &[Step]) -> Verdict {
    let matches = arranged.len() == canonical.len()
        && arranged
            .iter()
            .zip(canonical)
            .all(|(placed, expected)| placed.id == expected.id);
    if matches {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

/// Per-slot marks, only meaningful once every step is placed.
pub fn slot_feedback(arranged: &[Step], canonical: &[Step]) -> Option<Vec<bool>> {
    if arranged.len() != canonical.len() {
        return None;
    }
    Some(
        arranged
            .iter()
            .zip(canonical)
            .map(|(placed, expected)| placed.id == expected.id)
            .collect(),
    )
}
