use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> glib::ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let catalog = match puzzle_race::config::load_catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(%err, "failed to load puzzle catalog");
            return glib::ExitCode::FAILURE;
        }
    };

    puzzle_race::ui::run(catalog)
}
