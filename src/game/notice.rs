#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeCategory {
    Success,
    Failure,
    Warning,
    Victory,
}

/// Transient message shown before a deferred transition runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub category: NoticeCategory,
}

impl Notification {
    pub fn correct_order() -> Self {
        Notification {
            title: "Correct Order!".to_string(),
            body: "Excellent! Proceeding to the next challenge.".to_string(),
            category: NoticeCategory::Success,
        }
    }

    pub fn incorrect_order() -> Self {
        Notification {
            title: "Incorrect Order!".to_string(),
            body: "Oops! The workflow is incorrect. Game Over.".to_string(),
            category: NoticeCategory::Failure,
        }
    }

    pub fn times_up() -> Self {
        Notification {
            title: "Time's Up!".to_string(),
            body: "You ran out of time. Game Over!".to_string(),
            category: NoticeCategory::Failure,
        }
    }

    pub fn exhausted() -> Self {
        Notification {
            title: "No More Puzzles Available!".to_string(),
            body: "You've exhausted all unique puzzles for the selected domain.".to_string(),
            category: NoticeCategory::Warning,
        }
    }

    pub fn victory(levels_to_win: u32, domain: &str, final_score: u32) -> Self {
        Notification {
            title: "Congratulations, Winner!".to_string(),
            body: format!(
                "You've mastered {} workflows in {} with a final score of {}!",
                levels_to_win, domain, final_score
            ),
            category: NoticeCategory::Victory,
        }
    }
}
