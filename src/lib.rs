//! Workflow puzzle race: put shuffled workflow steps back in order before the
//! clock runs out.
//!
//! The game core in [`game`] has no UI dependency and is driven entirely by
//! [`Event`]s. The GTK front-end lives behind the `ui` feature.

pub mod config;
pub mod error;
pub mod game;
#[cfg(feature = "ui")]
pub mod ui;

pub use error::CatalogError;
pub use game::arrangement::{Board, MoveOutcome, Zone};
pub use game::catalog::{Catalog, Domain, Phase, Puzzle, Stage, Step};
pub use game::notice::{NoticeCategory, Notification};
pub use game::rules::Rules;
pub use game::selector::{Selection, pick_puzzle};
pub use game::session::{
    ActivePuzzle, Deferred, Effect, Event, Mode, ScheduledTask, Session, SubmitRejection,
};
pub use game::verifier::{Verdict, check_order};
