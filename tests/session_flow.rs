//! End-to-end sessions driven through the public event API.

use std::collections::HashSet;

use puzzle_race::{
    Catalog, Deferred, Effect, Event, Mode, NoticeCategory, ScheduledTask, Session,
    SubmitRejection, Zone,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn puzzle_json(id: &str, steps: &[&str]) -> String {
    let correct: Vec<String> = steps
        .iter()
        .map(|s| format!(r#"{{ "id": "{s}", "title": "{s}", "phase": "execution" }}"#))
        .collect();
    let shuffled: Vec<String> = correct.iter().rev().cloned().collect();
    format!(
        r#"{{ "id": "{id}", "question": "Order {id}", "correctSteps": [{}], "shuffledSteps": [{}] }}"#,
        correct.join(","),
        shuffled.join(",")
    )
}

fn catalog(levels_to_win: u32, puzzle_ids: &[&str]) -> Catalog {
    let puzzles: Vec<String> = puzzle_ids
        .iter()
        .map(|id| {
            let a = format!("{id}-a");
            let b = format!("{id}-b");
            let c = format!("{id}-c");
            puzzle_json(id, &[&a, &b, &c])
        })
        .collect();
    let raw = format!(
        r#"{{ "levelsToWin": {levels_to_win}, "domains": [
            {{ "name": "Lending", "stages": [
                {{ "name": "First", "puzzles": [{}] }},
                {{ "name": "Second", "puzzles": [] }}
            ] }},
            {{ "name": "Payments", "stages": [] }}
        ] }}"#,
        puzzles.join(",")
    );
    Catalog::from_json(&raw).unwrap()
}

fn session(levels_to_win: u32, puzzle_ids: &[&str]) -> Session {
    Session::with_rng(catalog(levels_to_win, puzzle_ids), StdRng::seed_from_u64(42))
}

fn canonical_ids(session: &Session) -> Vec<String> {
    session
        .active()
        .unwrap()
        .canonical
        .iter()
        .map(|step| step.id.clone())
        .collect()
}

fn arrange(session: &mut Session, ids: &[String]) {
    for id in ids {
        session.handle(Event::Move {
            step_id: id.clone(),
            from: Zone::Pending,
            to: Zone::Arranged,
        });
    }
}

fn solve(session: &mut Session) -> Vec<Effect> {
    let ids = canonical_ids(session);
    arrange(session, &ids);
    session.handle(Event::Submit)
}

fn task(effects: &[Effect]) -> ScheduledTask {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Schedule(task) => Some(*task),
            Effect::Notify(_) => None,
        })
        .expect("a follow-up was scheduled")
}

fn notice_category(effects: &[Effect]) -> NoticeCategory {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Notify(notice) => Some(notice.category),
            Effect::Schedule(_) => None,
        })
        .expect("a notification was emitted")
}

#[test]
fn reaching_the_threshold_completes_the_session() {
    let mut session = session(2, &["p1", "p2", "p3"]);
    session.handle(Event::Start);

    let effects = solve(&mut session);
    assert_eq!(notice_category(&effects), NoticeCategory::Success);
    let next = task(&effects);
    assert_eq!(next.deferred, Deferred::LoadNextPuzzle);
    assert_eq!(next.delay_ms, 2000);
    session.fire(next);
    assert_eq!(session.mode(), Mode::Playing);

    let effects = solve(&mut session);
    assert_eq!(notice_category(&effects), NoticeCategory::Victory);
    let done = task(&effects);
    assert_eq!(done.deferred, Deferred::Complete);
    session.fire(done);

    assert_eq!(session.mode(), Mode::Completed);
    assert_eq!(session.completed_count(), 2);
    assert_eq!(session.score(), 2 * (1000 + 18));
    assert_eq!(session.completed_ids().len(), 2);
    let mastered = session.mastered_by_domain();
    assert_eq!(mastered.len(), 1);
    assert_eq!(mastered[0].0, "Lending");
    assert_eq!(mastered[0].1.len(), 2);

    for _ in 0..5 {
        assert!(session.handle(Event::Tick).is_empty());
        session.handle(Event::Submit);
    }
    assert_eq!(session.mode(), Mode::Completed);

    session.handle(Event::Start);
    assert_eq!(session.mode(), Mode::Playing);
    assert_eq!(session.score(), 0);
}

#[test]
fn solved_puzzles_are_not_repeated() {
    let mut session = session(3, &["p1", "p2", "p3"]);
    session.handle(Event::Start);
    let mut seen = HashSet::new();
    for _ in 0..3 {
        let id = session.active().unwrap().id.clone();
        assert!(seen.insert(id));
        let effects = solve(&mut session);
        session.fire(task(&effects));
    }
    assert_eq!(session.mode(), Mode::Completed);
}

#[test]
fn time_bonus_uses_whole_tens_of_seconds() {
    let mut session = session(5, &["p1", "p2"]);
    session.handle(Event::Start);
    for _ in 0..133 {
        session.handle(Event::Tick);
    }
    assert_eq!(session.seconds_left(), 47);
    solve(&mut session);
    assert_eq!(session.score(), 1004);
}

#[test]
fn wrong_order_ends_the_session_and_floors_the_score() {
    let mut session = session(2, &["p1", "p2"]);
    session.handle(Event::Start);
    let mut ids = canonical_ids(&session);
    ids.swap(0, 1);
    arrange(&mut session, &ids);

    let effects = session.handle(Event::Submit);
    assert_eq!(notice_category(&effects), NoticeCategory::Failure);
    assert_eq!(session.score(), 0);
    assert_eq!(session.completed_count(), 0);
    assert_eq!(session.slot_feedback(), Some(vec![false, false, true]));

    let back = task(&effects);
    assert_eq!(back.deferred, Deferred::ReturnToMenu);
    assert_eq!(back.delay_ms, 3000);
    session.fire(back);
    assert_eq!(session.mode(), Mode::Menu);
}

#[test]
fn wrong_order_after_a_win_subtracts_the_penalty() {
    let mut session = session(3, &["p1", "p2", "p3"]);
    session.handle(Event::Start);
    let effects = solve(&mut session);
    session.fire(task(&effects));

    let mut ids = canonical_ids(&session);
    ids.reverse();
    arrange(&mut session, &ids);
    session.handle(Event::Submit);
    assert_eq!(session.score(), 1018 - 50);
}

#[test]
fn incomplete_arrangement_cannot_be_submitted() {
    let mut session = session(1, &["p1"]);
    session.handle(Event::Start);
    let ids = canonical_ids(&session);
    arrange(&mut session, &ids[..2]);
    assert!(!session.can_submit());
    assert_eq!(
        session.submit(),
        Err(SubmitRejection::Incomplete {
            placed: 2,
            required: 3
        })
    );
    assert!(session.handle(Event::Submit).is_empty());
    assert_eq!(session.mode(), Mode::Playing);
}

#[test]
fn reset_cancels_a_scheduled_puzzle_load() {
    let mut session = session(3, &["p1", "p2", "p3"]);
    session.handle(Event::Start);
    let effects = solve(&mut session);
    let stale = task(&effects);

    session.handle(Event::Reset);
    assert_eq!(session.mode(), Mode::Menu);
    assert!(session.fire(stale).is_empty());
    assert_eq!(session.mode(), Mode::Menu);
    assert!(session.active().is_none());
    assert_eq!(session.score(), 0);
    assert_eq!(session.completed_count(), 0);
    assert!(session.board().is_empty());
}

#[test]
fn stale_task_does_not_touch_a_new_session() {
    let mut session = session(3, &["p1", "p2", "p3"]);
    session.handle(Event::Start);
    let stale = task(&solve(&mut session));
    session.handle(Event::Reset);
    session.handle(Event::Start);
    let active = session.active().unwrap().id.clone();

    assert!(session.fire(stale).is_empty());
    assert_eq!(session.active().unwrap().id, active);
    assert_eq!(session.completed_count(), 0);
}

#[test]
fn exhausting_the_pool_returns_to_menu() {
    let mut session = session(3, &["p1", "p2"]);
    session.handle(Event::Start);
    for _ in 0..2 {
        let effects = solve(&mut session);
        assert_eq!(task(&effects).deferred, Deferred::LoadNextPuzzle);
        let after = session.fire(task(&effects));
        if session.active().is_none() {
            assert_eq!(notice_category(&after), NoticeCategory::Warning);
            session.fire(task(&after));
        }
    }
    assert_eq!(session.mode(), Mode::Menu);
    assert_eq!(session.completed_count(), 2);
}

#[test]
fn empty_domain_is_exhausted_immediately() {
    let mut session = session(1, &["p1"]);
    session.handle(Event::SelectDomain("Payments".to_string()));
    let effects = session.handle(Event::Start);
    assert_eq!(notice_category(&effects), NoticeCategory::Warning);
    assert!(session.active().is_none());
    session.fire(task(&effects));
    assert_eq!(session.mode(), Mode::Menu);
}

#[test]
fn timeout_fires_once_and_returns_to_menu() {
    let mut session = session(1, &["p1"]);
    session.handle(Event::Start);
    let mut scheduled = Vec::new();
    for _ in 0..240 {
        for effect in session.handle(Event::Tick) {
            if let Effect::Schedule(task) = effect {
                scheduled.push(task);
            }
        }
    }
    assert_eq!(scheduled.len(), 1);
    assert_eq!(session.seconds_left(), 0);
    assert!(!session.can_submit());

    session.fire(scheduled[0]);
    assert_eq!(session.mode(), Mode::Menu);
    session.handle(Event::Tick);
    assert_eq!(session.seconds_left(), 0);
}

#[test]
fn reset_restores_the_first_domain() {
    let mut session = session(1, &["p1"]);
    session.handle(Event::SelectDomain("Payments".to_string()));
    assert_eq!(session.selected_domain(), Some("Payments"));
    session.handle(Event::SelectDomain("Nowhere".to_string()));
    assert_eq!(session.selected_domain(), Some("Payments"));
    session.handle(Event::Reset);
    assert_eq!(session.selected_domain(), Some("Lending"));
    assert_eq!(session.seconds_left(), 180);
}

#[test]
fn bundled_catalog_plays_through() {
    let catalog = Catalog::bundled().unwrap();
    let levels = catalog.levels_to_win;
    let mut session = Session::with_rng(catalog, StdRng::seed_from_u64(7));
    session.handle(Event::Start);
    for _ in 0..levels {
        let effects = solve(&mut session);
        session.fire(task(&effects));
    }
    assert_eq!(session.mode(), Mode::Completed);
}

#[test]
fn leaving_the_completed_screen_keeps_the_chosen_domain() {
    let mut session = session(1, &["p1", "p2"]);
    session.handle(Event::SelectDomain("Payments".to_string()));
    session.handle(Event::SelectDomain("Lending".to_string()));
    session.handle(Event::BackToMenu);
    assert_eq!(session.mode(), Mode::Menu);

    session.handle(Event::Start);
    session.handle(Event::BackToMenu);
    assert_eq!(session.mode(), Mode::Playing);

    let effects = solve(&mut session);
    session.fire(task(&effects));
    assert_eq!(session.mode(), Mode::Completed);

    session.handle(Event::BackToMenu);
    assert_eq!(session.mode(), Mode::Menu);
    assert_eq!(session.selected_domain(), Some("Lending"));
    assert_eq!(session.score(), 1018);
    assert!(session.handle(Event::Tick).is_empty());

    session.handle(Event::Start);
    assert_eq!(session.mode(), Mode::Playing);
    assert_eq!(session.score(), 0);
}

#[test]
fn back_to_menu_keeps_a_non_default_domain() {
    let catalog = Catalog::from_json(
        r#"{ "levelsToWin": 1, "domains": [
            { "name": "Lending", "stages": [] },
            { "name": "Payments", "stages": [{ "puzzles": [
                { "id": "x", "correctSteps": [{ "id": "a", "title": "A" }],
                  "shuffledSteps": [{ "id": "a", "title": "A" }] }
            ] }] }
        ] }"#,
    )
    .unwrap();
    let mut session = Session::with_rng(catalog, StdRng::seed_from_u64(3));
    session.handle(Event::SelectDomain("Payments".to_string()));
    session.handle(Event::Start);
    let effects = solve(&mut session);
    session.fire(task(&effects));
    assert_eq!(session.mode(), Mode::Completed);

    session.handle(Event::BackToMenu);
    assert_eq!(session.selected_domain(), Some("Payments"));
}
