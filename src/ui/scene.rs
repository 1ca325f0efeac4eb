use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::board::rebuild_lists;
use super::hud::{set_header_game, set_header_menu, stop_timer, sync_timer, update_hud};
use super::state::AppState;
use crate::game::notice::{NoticeCategory, Notification};
use crate::game::session::Mode;

fn notice_class(category: NoticeCategory) -> &'static str {
    match category {
        NoticeCategory::Success => "notice-success",
        NoticeCategory::Failure => "notice-failure",
        NoticeCategory::Warning => "notice-warning",
        NoticeCategory::Victory => "notice-victory",
    }
}

const NOTICE_CLASSES: [&str; 4] = [
    "notice-success",
    "notice-failure",
    "notice-warning",
    "notice-victory",
];

fn switch_view(st: &mut AppState, name: &'static str, transition: gtk::StackTransitionType) {
    if st.visible_view == name {
        return;
    }
    st.visible_view = name;
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(transition);
        stack.set_visible_child_name(name);
    }
}

pub(super) fn show_notice(state: &Rc<RefCell<AppState>>, notice: &Notification) {
    let st = state.borrow();
    if let Some(title) = &st.notice_title {
        title.set_text(&notice.title);
    }
    if let Some(body) = &st.notice_body {
        body.set_text(&notice.body);
    }
    if let Some(overlay) = &st.notice_overlay {
        for class in NOTICE_CLASSES {
            overlay.remove_css_class(class);
        }
        overlay.add_css_class(notice_class(notice.category));
        overlay.set_visible(true);
    }
}

fn sync_notice(st: &AppState) {
    if st.session.notice().is_some() {
        return;
    }
    if let Some(overlay) = &st.notice_overlay {
        overlay.set_visible(false);
    }
}

pub(super) fn show_menu(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        sync_notice(&st);
        let selected = st.session.selected_domain().map(str::to_string);
        for (name, button) in &st.domain_buttons {
            button.set_active(selected.as_deref() == Some(name.as_str()));
        }
        if let Some(start) = &st.start_button {
            start.set_sensitive(selected.is_some());
            start.set_label(if selected.is_some() {
                "Start Game"
            } else {
                "Select a Domain to Start"
            });
        }
        switch_view(&mut st, "menu", gtk::StackTransitionType::SlideRight);
    }
    set_header_menu(state);
}

pub(super) fn show_game(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        if let Some(label) = &st.question_label {
            let question = st.session.active().map(|a| a.question.as_str()).unwrap_or_default();
            label.set_text(question);
        }
        sync_notice(&st);
        switch_view(&mut st, "game", gtk::StackTransitionType::SlideLeft);
    }
    rebuild_lists(state);
    set_header_game(state);
    sync_timer(state);
}

pub(super) fn show_completed(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_timer(&mut st);
        sync_notice(&st);
        if let Some(label) = &st.completed_score_label {
            label.set_text(&format!("Final Score: {}", st.session.score()));
        }
        if let Some(label) = &st.completed_count_label {
            label.set_text(&format!(
                "Total Puzzles Mastered: {}",
                st.session.completed_count()
            ));
        }
        if let Some(container) = &st.mastered_box {
            while let Some(child) = container.first_child() {
                container.remove(&child);
            }
            for (domain, puzzles) in st.session.mastered_by_domain() {
                let heading = gtk::Label::new(Some(domain));
                heading.add_css_class("heading");
                heading.set_xalign(0.0);
                container.append(&heading);
                for puzzle in puzzles {
                    let text = if puzzle.question.is_empty() {
                        puzzle.id.as_str()
                    } else {
                        puzzle.question.as_str()
                    };
                    let line = gtk::Label::new(Some(&format!("• {}", text)));
                    line.set_xalign(0.0);
                    line.set_wrap(true);
                    container.append(&line);
                }
            }
        }
        switch_view(&mut st, "completed", gtk::StackTransitionType::SlideLeft);
    }
    set_header_menu(state);
}

/// Brings the widgets in line with the session after any event.
pub(super) fn refresh(state: &Rc<RefCell<AppState>>) {
    let mode = state.borrow().session.mode();
    match mode {
        Mode::Menu => show_menu(state),
        Mode::Playing => show_game(state),
        Mode::Completed => show_completed(state),
    }
    update_hud(&state.borrow());
}
