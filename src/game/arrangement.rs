use super::catalog::Step;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Pending,
    Arranged,
}

impl Zone {
    pub fn other(self) -> Zone {
        match self {
            Zone::Pending => Zone::Arranged,
            Zone::Arranged => Zone::Pending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Ignored,
}

/// The two step containers of the active puzzle. Every step lives in exactly
/// one of them.
#[derive(Clone, Debug, Default)]
pub struct Board {
    pub pending: Vec<Step>,
    pub arranged: Vec<Step>,
}

impl Board {
    pub fn new(presentation: &[Step]) -> Self {
        Board {
            pending: presentation.to_vec(),
            arranged: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.arranged.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.arranged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn zone_mut(&mut self, zone: Zone) -> &mut Vec<Step> {
        match zone {
            Zone::Pending => &mut self.pending,
            Zone::Arranged => &mut self.arranged,
        }
    }

    /// Takes `step_id` out of `from` and appends it to `to`. A stale id or a
    /// same-zone drop leaves the board untouched.
    pub fn move_step(&mut self, step_id: &str, from: Zone, to: Zone) -> MoveOutcome {
        if from == to {
            return MoveOutcome::Ignored;
        }
        let source = self.zone_mut(from);
        let Some(index) = source.iter().position(|step| step.id == step_id) else {
            return MoveOutcome::Ignored;
        };
        let step = source.remove(index);
        self.zone_mut(to).push(step);
        MoveOutcome::Moved
    }

    #[cfg(test)]
    pub fn arranged_ids(&self) -> Vec<&str> {
        self.arranged.iter().map(|step| step.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::game::catalog::Phase;

    fn steps(ids: &[&str]) -> Vec<Step> {
        ids.iter()
            .map(|id| Step {
                id: id.to_string(),
                title: id.to_uppercase(),
                description: String::new(),
                phase: Phase::Other,
            })
            .collect()
    }

    fn all_ids(board: &Board) -> Vec<String> {
        let mut ids: Vec<String> = board
            .pending
            .iter()
            .chain(board.arranged.iter())
            .map(|step| step.id.clone())
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn moves_append_to_the_end_of_the_target() {
        let mut board = Board::new(&steps(&["c", "a", "b"]));
        assert_eq!(board.move_step("a", Zone::Pending, Zone::Arranged), MoveOutcome::Moved);
        assert_eq!(board.move_step("c", Zone::Pending, Zone::Arranged), MoveOutcome::Moved);
        assert_eq!(board.arranged_ids(), vec!["a", "c"]);
        assert_eq!(board.move_step("a", Zone::Arranged, Zone::Pending), MoveOutcome::Moved);
        let pending: Vec<&str> = board.pending.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(pending, vec!["b", "a"]);
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut board = Board::new(&steps(&["a", "b"]));
        assert_eq!(board.move_step("a", Zone::Arranged, Zone::Pending), MoveOutcome::Ignored);
        assert_eq!(board.move_step("zzz", Zone::Pending, Zone::Arranged), MoveOutcome::Ignored);
        assert_eq!(board.move_step("a", Zone::Pending, Zone::Pending), MoveOutcome::Ignored);
        assert_eq!(board.pending.len(), 2);
        assert!(board.arranged.is_empty());
    }

    #[test]
    fn moves_preserve_the_step_set() {
        let original = steps(&["a", "b", "c", "d"]);
        let mut board = Board::new(&original);
        let script = [
            ("b", Zone::Pending),
            ("d", Zone::Pending),
            ("b", Zone::Arranged),
            ("b", Zone::Pending),
            ("x", Zone::Pending),
            ("a", Zone::Arranged),
            ("c", Zone::Pending),
        ];
        for (id, from) in script {
            board.move_step(id, from, from.other());
            assert_eq!(all_ids(&board), vec!["a", "b", "c", "d"]);
            let unique: HashSet<String> = all_ids(&board).into_iter().collect();
            assert_eq!(unique.len(), board.len());
        }
    }
}
