pub const PUZZLE_SECONDS: u32 = 180;
pub const BASE_POINTS: u32 = 1000;
pub const BONUS_DIVISOR: u32 = 10;
pub const WRONG_ORDER_PENALTY: u32 = 50;
pub const CRITICAL_SECONDS: u32 = 30;
pub const NEXT_PUZZLE_DELAY_MS: u64 = 2000;
pub const GAME_OVER_DELAY_MS: u64 = 3000;
pub const VICTORY_DELAY_MS: u64 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub puzzle_seconds: u32,
    pub levels_to_win: u32,
    pub base_points: u32,
    pub bonus_divisor: u32,
    pub wrong_order_penalty: u32,
    pub next_puzzle_delay_ms: u64,
    pub game_over_delay_ms: u64,
    pub victory_delay_ms: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            puzzle_seconds: PUZZLE_SECONDS,
            levels_to_win: 1,
            base_points: BASE_POINTS,
            bonus_divisor: BONUS_DIVISOR,
            wrong_order_penalty: WRONG_ORDER_PENALTY,
            next_puzzle_delay_ms: NEXT_PUZZLE_DELAY_MS,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            victory_delay_ms: VICTORY_DELAY_MS,
        }
    }
}

impl Rules {
    pub fn with_levels_to_win(levels_to_win: u32) -> Self {
        Rules {
            levels_to_win: levels_to_win.max(1),
            ..Self::default()
        }
    }

    /// Points for a correct order with `seconds_left` on the clock.
    pub fn award_for(&self, seconds_left: u32) -> u32 {
        self.base_points + seconds_left / self.bonus_divisor.max(1)
    }

    pub fn apply_penalty(&self, score: u32) -> u32 {
        score.saturating_sub(self.wrong_order_penalty)
    }
}

pub fn format_clock(total_secs: u32) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{}:{:02}", mins, secs)
}

pub fn is_critical(seconds_left: u32) -> bool {
    seconds_left <= CRITICAL_SECONDS
}
