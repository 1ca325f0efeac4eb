mod app;
mod board;
mod dialogs;
mod hud;
mod scene;
mod state;

pub use app::run;
