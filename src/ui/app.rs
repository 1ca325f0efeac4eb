use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::gdk;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use super::board::{CONTENT_MARGIN, build_drop_area};
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::{build_clock, set_header_menu, update_hud};
use super::scene::{refresh, show_notice};
use super::state::AppState;
use crate::game::arrangement::Zone;
use crate::game::catalog::Catalog;
use crate::game::session::{Effect, Event, Session};

const APP_ID: &str = "io.github.puzzlerace.PuzzleRace";
const RESOURCE_PREFIX: &str = "/io/github/puzzlerace/PuzzleRace";

/// Feeds one event to the session and carries out what it asks for.
pub(super) fn dispatch(state: &Rc<RefCell<AppState>>, event: Event) {
    let effects = state.borrow_mut().session.handle(event);
    apply_effects(state, effects);
    refresh(state);
}

pub(super) fn apply_effects(state: &Rc<RefCell<AppState>>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Notify(notice) => show_notice(state, &notice),
            Effect::Schedule(task) => {
                let state_task = state.clone();
                glib::timeout_add_local_once(
                    std::time::Duration::from_millis(task.delay_ms),
                    move || {
                        let effects = state_task.borrow_mut().session.fire(task);
                        apply_effects(&state_task, effects);
                        refresh(&state_task);
                    },
                );
            }
        }
    }
}

pub fn run(catalog: Catalog) -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    // GApplication may activate more than once; each window gets its own session.
    let catalog = Rc::new(catalog);
    app.connect_activate(move |app| {
        load_css();

        let session = Session::new(catalog.as_ref().clone());
        let levels_to_win = session.levels_to_win();
        let state = Rc::new(RefCell::new(AppState::new(session)));

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app, levels_to_win);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);

        let title_menu = gtk::Label::new(None);
        title_menu.set_markup("<b>Puzzle Race</b>");
        title_menu.set_halign(gtk::Align::Center);

        let title_game_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_game_box.set_valign(gtk::Align::Center);
        title_game_box.set_halign(gtk::Align::Center);
        title_game_box.set_hexpand(true);

        let title_game_main = gtk::Label::builder()
            .label("Puzzle Race")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();
        let title_game_subtitle = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();
        title_game_box.append(&title_game_main);
        title_game_box.append(&title_game_subtitle);

        let header = adw::HeaderBar::builder().title_widget(&title_menu).build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let reset_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .build();
        reset_button.set_tooltip_text(Some("Reset Game"));
        reset_button.connect_clicked({
            let state = state.clone();
            move |_| dispatch(&state, Event::Reset)
        });
        header.pack_start(&reset_button);

        let menu_model = gio::Menu::new();
        menu_model.append(Some("How to Play"), Some("app.instructions"));
        menu_model.append(Some("About Puzzle Race"), Some("app.about"));
        menu_model.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();
        header.pack_end(&menu_button);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_hhomogeneous(false);
        view_stack.set_vhomogeneous(false);
        view_stack.set_transition_duration(300);

        let menu_view = build_menu_view(&state);
        view_stack.add_named(&menu_view, Some("menu"));
        let game_view = build_game_view(&state);
        view_stack.add_named(&game_view, Some("game"));
        let completed_view = build_completed_view(&state);
        view_stack.add_named(&completed_view, Some("completed"));
        view_stack.set_visible_child_name("menu");

        let overlay = gtk::Overlay::new();
        overlay.set_child(Some(&view_stack));
        overlay.add_overlay(&build_notice_overlay(&state));

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&overlay));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Puzzle Race")
            .default_width(1040)
            .default_height(720)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 560);
        win.add_css_class("app-window");

        {
            let mut st = state.borrow_mut();
            st.view_stack = Some(view_stack);
            st.header = Some(header);
            st.reset_button = Some(reset_button);
            st.title_menu = Some(title_menu);
            st.title_game = Some(title_game_box.upcast::<gtk::Widget>());
            st.title_game_subtitle = Some(title_game_subtitle);
        }

        let global_key = gtk::EventControllerKey::new();
        global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
        global_key.connect_key_pressed({
            let state = state.clone();
            move |_, key, _, _| {
                if key == gdk::Key::Escape && state.borrow().visible_view != "menu" {
                    dispatch(&state, Event::Reset);
                    return glib::Propagation::Stop;
                }
                glib::Propagation::Proceed
            }
        });
        win.add_controller(global_key);

        // Closing the window discards the session; pending follow-ups see a new
        // generation and do nothing.
        win.connect_close_request({
            let state = state.clone();
            move |_| {
                state.borrow_mut().session.reset();
                glib::Propagation::Proceed
            }
        });

        set_header_menu(&state);
        refresh(&state);
        win.present();
    });

    app.run()
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        if let Err(err) = gio::resources_register_include!("puzzle-race.gresource") {
            tracing::error!(%err, "failed to register embedded resources");
        }
    });

    let Some(display) = gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource(&format!("{}/style.css", RESOURCE_PREFIX));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_menu_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("main-menu-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.add_css_class("main-menu-content");

    let title = gtk::Label::new(Some("Workflow Puzzle Race"));
    title.add_css_class("title-1");
    let subtitle = gtk::Label::new(Some("Arrange the steps to complete the workflow!"));
    subtitle.add_css_class("dim-label");
    content.append(&title);
    content.append(&subtitle);

    let domain_label = gtk::Label::new(Some("Choose a Domain:"));
    domain_label.add_css_class("heading");
    content.append(&domain_label);

    let domain_row = gtk::FlowBox::new();
    domain_row.set_selection_mode(gtk::SelectionMode::None);
    domain_row.set_halign(gtk::Align::Center);
    domain_row.set_max_children_per_line(4);

    let names: Vec<String> = state
        .borrow()
        .session
        .catalog()
        .domains
        .iter()
        .map(|domain| domain.name.clone())
        .collect();
    let mut domain_buttons = Vec::with_capacity(names.len());
    for name in names {
        let button = gtk::ToggleButton::with_label(&name);
        button.add_css_class("domain-button");
        button.connect_clicked({
            let state = state.clone();
            let name = name.clone();
            move |_| dispatch(&state, Event::SelectDomain(name.clone()))
        });
        domain_row.insert(&button, -1);
        domain_buttons.push((name, button));
    }
    content.append(&domain_row);

    let levels_to_win = state.borrow().session.levels_to_win();
    let how_to = gtk::Label::new(Some(&format!(
        "Drag the shuffled steps into the ordered area, then submit.\n\
You have 3 minutes per puzzle. Complete {} puzzles to win!",
        levels_to_win
    )));
    how_to.set_justify(gtk::Justification::Center);
    how_to.set_wrap(true);
    how_to.add_css_class("how-to-play");
    content.append(&how_to);

    let start_button = gtk::Button::with_label("Start Game");
    start_button.add_css_class("suggested-action");
    start_button.add_css_class("pill");
    start_button.set_halign(gtk::Align::Center);
    start_button.set_size_request(180, 44);
    start_button.connect_clicked({
        let state = state.clone();
        move |_| dispatch(&state, Event::Start)
    });
    content.append(&start_button);

    center.set_center_widget(Some(&content));
    root.append(&center);

    {
        let mut st = state.borrow_mut();
        st.domain_buttons = domain_buttons;
        st.start_button = Some(start_button);
    }

    root
}

fn labelled_section(title: &str, list: &gtk::Box) -> gtk::Box {
    let section = gtk::Box::new(gtk::Orientation::Vertical, 6);
    section.set_hexpand(true);
    section.set_vexpand(true);
    section.add_css_class("puzzle-section");

    let heading = gtk::Label::new(Some(title));
    heading.add_css_class("title-4");
    heading.set_xalign(0.0);
    section.append(&heading);

    let scroller = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .hexpand(true)
        .vexpand(true)
        .child(list)
        .build();
    section.append(&scroller);
    section
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");
    root.set_margin_top(CONTENT_MARGIN);
    root.set_margin_bottom(CONTENT_MARGIN);
    root.set_margin_start(CONTENT_MARGIN);
    root.set_margin_end(CONTENT_MARGIN);

    let status_row = gtk::Box::new(gtk::Orientation::Horizontal, 18);
    status_row.set_halign(gtk::Align::Center);
    let clock = build_clock(state);
    let score_label = gtk::Label::new(None);
    score_label.add_css_class("score-value");
    let progress_label = gtk::Label::new(None);
    progress_label.add_css_class("puzzles-completed-display");
    status_row.append(&clock);
    status_row.append(&score_label);
    status_row.append(&progress_label);
    root.append(&status_row);

    let question_label = gtk::Label::new(None);
    question_label.add_css_class("puzzle-question");
    question_label.add_css_class("title-3");
    question_label.set_wrap(true);
    question_label.set_justify(gtk::Justification::Center);
    root.append(&question_label);

    let columns = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    columns.set_hexpand(true);
    columns.set_vexpand(true);
    columns.set_homogeneous(true);
    let pending_list = build_drop_area(state, Zone::Pending);
    let arranged_list = build_drop_area(state, Zone::Arranged);
    columns.append(&labelled_section("Unordered Workflow", &pending_list));
    columns.append(&labelled_section("Ordered Workflow", &arranged_list));
    root.append(&columns);

    let submit_button = gtk::Button::with_label("Submit Workflow");
    submit_button.add_css_class("suggested-action");
    submit_button.add_css_class("pill");
    submit_button.set_halign(gtk::Align::Center);
    submit_button.set_sensitive(false);
    submit_button.connect_clicked({
        let state = state.clone();
        move |_| dispatch(&state, Event::Submit)
    });
    root.append(&submit_button);

    let legend = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    legend.set_halign(gtk::Align::Center);
    legend.add_css_class("phase-legend");
    for (class, text) in [
        ("phase-initiation", "Initiation"),
        ("phase-execution", "Execution"),
        ("phase-settlement", "Settlement"),
    ] {
        let chip = gtk::Label::new(Some(text));
        chip.add_css_class("phase-chip");
        chip.add_css_class(class);
        legend.append(&chip);
    }
    root.append(&legend);

    {
        let mut st = state.borrow_mut();
        st.clock_area = Some(clock);
        st.score_label = Some(score_label);
        st.progress_label = Some(progress_label);
        st.question_label = Some(question_label);
        st.pending_list = Some(pending_list);
        st.arranged_list = Some(arranged_list);
        st.submit_button = Some(submit_button);
        update_hud(&st);
    }

    root
}

fn build_notice_overlay(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let card = gtk::Box::new(gtk::Orientation::Vertical, 8);
    card.set_halign(gtk::Align::Center);
    card.set_valign(gtk::Align::Center);
    card.add_css_class("game-message");
    card.add_css_class("card");
    card.set_visible(false);

    let title = gtk::Label::new(None);
    title.add_css_class("title-2");
    let body = gtk::Label::new(None);
    body.set_wrap(true);
    body.set_justify(gtk::Justification::Center);
    card.append(&title);
    card.append(&body);

    let mut st = state.borrow_mut();
    st.notice_overlay = Some(card.clone());
    st.notice_title = Some(title);
    st.notice_body = Some(body);
    card
}

fn build_completed_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 10);
    root.set_halign(gtk::Align::Center);
    root.set_valign(gtk::Align::Center);
    root.add_css_class("completed-root");

    let trophy = gtk::Image::from_icon_name("starred-symbolic");
    trophy.set_pixel_size(96);
    trophy.add_css_class("completed-icon");
    let title = gtk::Label::new(Some("Game Over!"));
    title.add_css_class("title-1");
    let score_label = gtk::Label::new(None);
    score_label.add_css_class("completed-score");
    let count_label = gtk::Label::new(None);
    count_label.add_css_class("completed-score");

    let mastered_title = gtk::Label::new(Some("Workflows you mastered:"));
    mastered_title.add_css_class("heading");
    let mastered_box = gtk::Box::new(gtk::Orientation::Vertical, 4);
    mastered_box.add_css_class("workflow-mastered-box");

    let again_button = gtk::Button::with_label("Back to Menu");
    again_button.add_css_class("pill");
    again_button.set_halign(gtk::Align::Center);
    again_button.connect_clicked({
        let state = state.clone();
        move |_| dispatch(&state, Event::BackToMenu)
    });

    root.append(&trophy);
    root.append(&title);
    root.append(&score_label);
    root.append(&count_label);
    root.append(&mastered_title);
    root.append(&mastered_box);
    root.append(&again_button);

    let mut st = state.borrow_mut();
    st.completed_score_label = Some(score_label);
    st.completed_count_label = Some(count_label);
    st.mastered_box = Some(mastered_box);
    root
}
