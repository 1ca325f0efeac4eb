use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_instructions_dialog(app: &adw::Application, levels_to_win: u32) -> adw::AlertDialog {
    let body = format!(
        "Drag the shuffled workflow steps into the Ordered Workflow area.\n\
Arrange them in the correct sequence and submit.\n\
You have 3 minutes per puzzle, and a wrong order ends the game.\n\
Complete {} puzzles to win!",
        levels_to_win
    );
    let dialog = adw::AlertDialog::new(Some("How to Play"), Some(&body));
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Puzzle Race")
        .application_icon("io.github.puzzlerace.PuzzleRace")
        .developer_name("Puzzle Race contributors")
        .version(env!("CARGO_PKG_VERSION"))
        .comments("Put shuffled workflow steps back in order before time runs out.")
        .build();
    dialog.add_legal_section("Puzzle Race", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
