use std::collections::HashSet;

use rand::Rng;

use super::catalog::{Domain, Puzzle};

#[derive(Debug)]
pub enum Selection<'a> {
    Puzzle(&'a Puzzle),
    Exhausted,
}

/// Picks uniformly among the domain's puzzles not yet in `completed`.
pub fn pick_puzzle<'a, R: Rng>(
    domain: &'a Domain,
    completed: &HashSet<String>,
    rng: &mut R,
) -> Selection<'a> {
    let available: Vec<&Puzzle> = domain
        .puzzles()
        .filter(|puzzle| !completed.contains(&puzzle.id))
        .collect();
    if available.is_empty() {
        return Selection::Exhausted;
    }
    let index = rng.random_range(0..available.len());
    Selection::Puzzle(available[index])
}
