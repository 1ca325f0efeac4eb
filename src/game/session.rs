//! Session state machine for one play-through.
//!
//! Every input is an [`Event`]; handling it mutates the session and returns the
//! [`Effect`]s the host has to carry out. Delayed follow-ups come back through
//! [`Session::fire`] and are dropped when their generation no longer matches,
//! so a reset always wins over anything scheduled before it.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::arrangement::{Board, MoveOutcome, Zone};
use super::catalog::{Catalog, Puzzle, Step};
use super::notice::Notification;
use super::rules::{Rules, is_critical};
use super::selector::{Selection, pick_puzzle};
use super::verifier::{Verdict, check_order, slot_feedback};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Menu,
    Playing,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    SelectDomain(String),
    Start,
    Move { step_id: String, from: Zone, to: Zone },
    Submit,
    Reset,
    BackToMenu,
    Tick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    LoadNextPuzzle,
    ReturnToMenu,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub generation: u64,
    pub delay_ms: u64,
    pub deferred: Deferred,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Notify(Notification),
    Schedule(ScheduledTask),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitRejection {
    NotPlaying,
    AwaitingTransition,
    OutOfTime,
    Incomplete { placed: usize, required: usize },
}

#[derive(Clone, Debug)]
pub struct ActivePuzzle {
    pub id: String,
    pub question: String,
    pub stage: String,
    pub canonical: Vec<Step>,
}

pub struct Session<R = StdRng> {
    catalog: Catalog,
    rules: Rules,
    rng: R,
    mode: Mode,
    selected_domain: Option<String>,
    score: u32,
    seconds_left: u32,
    completed_count: u32,
    completed_ids: HashSet<String>,
    mastered: Vec<(String, String)>,
    active: Option<ActivePuzzle>,
    board: Board,
    generation: u64,
    pending: Option<Deferred>,
    notice: Option<Notification>,
}

impl Session<StdRng> {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, StdRng::from_os_rng())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(catalog: Catalog, rng: R) -> Self {
        let rules = Rules::with_levels_to_win(catalog.levels_to_win);
        let selected_domain = catalog.first_domain().map(|domain| domain.name.clone());
        Session {
            catalog,
            rules,
            rng,
            mode: Mode::Menu,
            selected_domain,
            score: 0,
            seconds_left: rules.puzzle_seconds,
            completed_count: 0,
            completed_ids: HashSet::new(),
            mastered: Vec::new(),
            active: None,
            board: Board::default(),
            generation: 0,
            pending: None,
            notice: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected_domain(&self) -> Option<&str> {
        self.selected_domain.as_deref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn completed_count(&self) -> u32 {
        self.completed_count
    }

    pub fn levels_to_win(&self) -> u32 {
        self.rules.levels_to_win
    }

    pub fn completed_ids(&self) -> &HashSet<String> {
        &self.completed_ids
    }

    pub fn active(&self) -> Option<&ActivePuzzle> {
        self.active.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn notice(&self) -> Option<&Notification> {
        self.notice.as_ref()
    }

    /// True while a notification is on screen and its follow-up has not run.
    pub fn is_locked(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_submit(&self) -> bool {
        self.submit_precondition().is_ok()
    }

    pub fn slot_feedback(&self) -> Option<Vec<bool>> {
        let active = self.active.as_ref()?;
        slot_feedback(&self.board.arranged, &active.canonical)
    }

    /// Puzzles solved this session, grouped by the domain they came from and
    /// listed in the order they were solved.
    pub fn mastered_by_domain(&self) -> Vec<(&str, Vec<&Puzzle>)> {
        self.catalog
            .domains
            .iter()
            .filter_map(|domain| {
                let puzzles: Vec<&Puzzle> = self
                    .mastered
                    .iter()
                    .filter(|(name, _)| *name == domain.name)
                    .filter_map(|(_, id)| domain.puzzle(id))
                    .collect();
                (!puzzles.is_empty()).then_some((domain.name.as_str(), puzzles))
            })
            .collect()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::SelectDomain(name) => {
                self.select_domain(&name);
                Vec::new()
            }
            Event::Start => self.start(),
            Event::Move { step_id, from, to } => {
                self.move_step(&step_id, from, to);
                Vec::new()
            }
            Event::Submit => match self.submit() {
                Ok(effects) => effects,
                Err(rejection) => {
                    debug!(?rejection, "submission rejected");
                    Vec::new()
                }
            },
            Event::Reset => {
                self.reset();
                Vec::new()
            }
            Event::BackToMenu => {
                self.back_to_menu();
                Vec::new()
            }
            Event::Tick => self.tick(),
        }
    }

    pub fn select_domain(&mut self, name: &str) -> bool {
        if self.mode == Mode::Playing {
            return false;
        }
        if self.catalog.domain(name).is_none() {
            warn!(domain = name, "unknown domain selected");
            return false;
        }
        self.selected_domain = Some(name.to_string());
        true
    }

    pub fn start(&mut self) -> Vec<Effect> {
        if self.mode == Mode::Playing {
            return Vec::new();
        }
        if self.selected_domain.is_none() {
            self.selected_domain = self.catalog.first_domain().map(|d| d.name.clone());
        }
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
        self.notice = None;
        self.score = 0;
        self.completed_count = 0;
        self.completed_ids.clear();
        self.mastered.clear();
        info!(
            domain = self.selected_domain.as_deref().unwrap_or_default(),
            generation = self.generation,
            "session started"
        );
        self.load_next_puzzle()
    }

    pub fn move_step(&mut self, step_id: &str, from: Zone, to: Zone) -> MoveOutcome {
        if self.mode != Mode::Playing || self.is_locked() || self.seconds_left == 0 {
            return MoveOutcome::Ignored;
        }
        let outcome = self.board.move_step(step_id, from, to);
        match outcome {
            MoveOutcome::Moved => debug!(step_id, ?from, ?to, "step moved"),
            MoveOutcome::Ignored => warn!(step_id, ?from, ?to, "stale move ignored"),
        }
        outcome
    }

    pub fn submit(&mut self) -> Result<Vec<Effect>, SubmitRejection> {
        self.submit_precondition()?;
        let Some(active) = self.active.as_ref() else {
            return Err(SubmitRejection::NotPlaying);
        };

        match check_order(&self.board.arranged, &active.canonical) {
            Verdict::Correct => {
                let award = self.rules.award_for(self.seconds_left);
                self.score = self.score.saturating_add(award);
                let puzzle_id = active.id.clone();
                self.completed_ids.insert(puzzle_id.clone());
                let domain = self.selected_domain.clone().unwrap_or_default();
                self.mastered.push((domain.clone(), puzzle_id.clone()));
                self.completed_count += 1;
                info!(
                    puzzle = puzzle_id.as_str(),
                    award,
                    score = self.score,
                    completed = self.completed_count,
                    "correct order"
                );

                if self.completed_count >= self.rules.levels_to_win {
                    info!(score = self.score, "win threshold reached");
                    let notice =
                        Notification::victory(self.rules.levels_to_win, &domain, self.score);
                    Ok(self.defer(notice, Deferred::Complete, self.rules.victory_delay_ms))
                } else {
                    Ok(self.defer(
                        Notification::correct_order(),
                        Deferred::LoadNextPuzzle,
                        self.rules.next_puzzle_delay_ms,
                    ))
                }
            }
            Verdict::Incorrect => {
                self.score = self.rules.apply_penalty(self.score);
                info!(puzzle = active.id.as_str(), score = self.score, "incorrect order");
                Ok(self.defer(
                    Notification::incorrect_order(),
                    Deferred::ReturnToMenu,
                    self.rules.game_over_delay_ms,
                ))
            }
        }
    }

    pub fn tick(&mut self) -> Vec<Effect> {
        if self.mode != Mode::Playing || self.is_locked() || self.seconds_left == 0 {
            return Vec::new();
        }
        self.seconds_left -= 1;
        if self.seconds_left > 0 {
            if is_critical(self.seconds_left) {
                debug!(seconds_left = self.seconds_left, "clock critical");
            }
            return Vec::new();
        }
        info!(generation = self.generation, "puzzle timer expired");
        self.defer(
            Notification::times_up(),
            Deferred::ReturnToMenu,
            self.rules.game_over_delay_ms,
        )
    }

    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.mode = Mode::Menu;
        self.selected_domain = self.catalog.first_domain().map(|d| d.name.clone());
        self.score = 0;
        self.seconds_left = self.rules.puzzle_seconds;
        self.completed_count = 0;
        self.completed_ids.clear();
        self.mastered.clear();
        self.active = None;
        self.board.clear();
        self.pending = None;
        self.notice = None;
        info!(generation = self.generation, "session reset");
    }

    /// Leaves the completed screen for the menu. The chosen domain and the
    /// final tally stay until the next start.
    pub fn back_to_menu(&mut self) -> bool {
        if self.mode != Mode::Completed {
            return false;
        }
        self.mode = Mode::Menu;
        info!(score = self.score, "back to menu");
        true
    }

    /// Runs a follow-up scheduled by an earlier effect.
    pub fn fire(&mut self, task: ScheduledTask) -> Vec<Effect> {
        if task.generation != self.generation || self.pending != Some(task.deferred) {
            warn!(
                task_generation = task.generation,
                generation = self.generation,
                deferred = ?task.deferred,
                "dropping stale deferred task"
            );
            return Vec::new();
        }
        self.pending = None;
        self.notice = None;
        match task.deferred {
            Deferred::LoadNextPuzzle => self.load_next_puzzle(),
            Deferred::ReturnToMenu => {
                self.mode = Mode::Menu;
                self.active = None;
                self.board.clear();
                info!(score = self.score, "returned to menu");
                Vec::new()
            }
            Deferred::Complete => {
                self.mode = Mode::Completed;
                self.active = None;
                self.board.clear();
                info!(score = self.score, "session completed");
                Vec::new()
            }
        }
    }

    fn submit_precondition(&self) -> Result<(), SubmitRejection> {
        if self.mode != Mode::Playing {
            return Err(SubmitRejection::NotPlaying);
        }
        if self.is_locked() {
            return Err(SubmitRejection::AwaitingTransition);
        }
        if self.seconds_left == 0 {
            return Err(SubmitRejection::OutOfTime);
        }
        let required = self.active.as_ref().map_or(0, |a| a.canonical.len());
        let placed = self.board.arranged.len();
        if placed != required || required == 0 {
            return Err(SubmitRejection::Incomplete { placed, required });
        }
        Ok(())
    }

    fn load_next_puzzle(&mut self) -> Vec<Effect> {
        let domain_name = self.selected_domain.clone().unwrap_or_default();
        let picked = match self.catalog.domain(&domain_name) {
            Some(domain) => match pick_puzzle(domain, &self.completed_ids, &mut self.rng) {
                Selection::Puzzle(puzzle) => {
                    let stage = domain
                        .stage_of(&puzzle.id)
                        .map(|stage| stage.name.clone())
                        .unwrap_or_default();
                    Some((puzzle.clone(), stage))
                }
                Selection::Exhausted => None,
            },
            None => None,
        };

        let Some((puzzle, stage)) = picked else {
            info!(domain = domain_name.as_str(), "puzzle pool exhausted");
            self.active = None;
            self.board.clear();
            return self.defer(
                Notification::exhausted(),
                Deferred::ReturnToMenu,
                self.rules.game_over_delay_ms,
            );
        };

        info!(
            domain = domain_name.as_str(),
            stage = stage.as_str(),
            puzzle = puzzle.id.as_str(),
            "puzzle loaded"
        );
        self.board = Board::new(&puzzle.shuffled_steps);
        self.active = Some(ActivePuzzle {
            id: puzzle.id,
            question: puzzle.question,
            stage,
            canonical: puzzle.correct_steps,
        });
        self.seconds_left = self.rules.puzzle_seconds;
        self.mode = Mode::Playing;
        Vec::new()
    }

    fn defer(&mut self, notice: Notification, deferred: Deferred, delay_ms: u64) -> Vec<Effect> {
        self.pending = Some(deferred);
        self.notice = Some(notice.clone());
        vec![
            Effect::Notify(notice),
            Effect::Schedule(ScheduledTask {
                generation: self.generation,
                delay_ms,
                deferred,
            }),
        ]
    }
}
