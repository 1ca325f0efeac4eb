use gtk4 as gtk;
use libadwaita as adw;

use crate::game::session::Session;

/// Session plus the widgets the scenes update when it changes.
pub struct AppState {
    pub session: Session,
    pub view_stack: Option<gtk::Stack>,
    pub header: Option<adw::HeaderBar>,
    pub reset_button: Option<gtk::Button>,
    pub title_menu: Option<gtk::Label>,
    pub title_game: Option<gtk::Widget>,
    pub title_game_subtitle: Option<gtk::Label>,

    // Menu
    pub domain_buttons: Vec<(String, gtk::ToggleButton)>,
    pub start_button: Option<gtk::Button>,

    // Game
    pub question_label: Option<gtk::Label>,
    pub score_label: Option<gtk::Label>,
    pub progress_label: Option<gtk::Label>,
    pub clock_area: Option<gtk::DrawingArea>,
    pub pending_list: Option<gtk::Box>,
    pub arranged_list: Option<gtk::Box>,
    pub submit_button: Option<gtk::Button>,
    pub notice_overlay: Option<gtk::Box>,
    pub notice_title: Option<gtk::Label>,
    pub notice_body: Option<gtk::Label>,

    // Completed
    pub completed_score_label: Option<gtk::Label>,
    pub completed_count_label: Option<gtk::Label>,
    pub mastered_box: Option<gtk::Box>,

    pub timer_handle: Option<glib::SourceId>,
    pub timer_puzzle: Option<String>,
    pub visible_view: &'static str,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        AppState {
            session,
            view_stack: None,
            header: None,
            reset_button: None,
            title_menu: None,
            title_game: None,
            title_game_subtitle: None,
            domain_buttons: Vec::new(),
            start_button: None,
            question_label: None,
            score_label: None,
            progress_label: None,
            clock_area: None,
            pending_list: None,
            arranged_list: None,
            submit_button: None,
            notice_overlay: None,
            notice_title: None,
            notice_body: None,
            completed_score_label: None,
            completed_count_label: None,
            mastered_box: None,
            timer_handle: None,
            timer_puzzle: None,
            visible_view: "menu",
        }
    }
}
