use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use cairo::Context;
use gtk4 as gtk;
use gtk4::prelude::*;
use pangocairo::pango;

use super::app::apply_effects;
use super::state::AppState;
use crate::game::rules::{format_clock, is_critical};
use crate::game::session::Mode;

const CLOCK_SIZE: i32 = 76;
const RING_WIDTH: f64 = 6.0;

pub(super) fn set_header_menu(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_menu) {
        header.set_title_widget(Some(title));
    }
    if let Some(reset) = &st.reset_button {
        reset.set_visible(false);
    }
}

pub(super) fn set_header_game(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title_box)) = (&st.header, &st.title_game) {
        update_hud(&st);
        header.set_title_widget(Some(title_box));
    }
    if let Some(reset) = &st.reset_button {
        reset.set_visible(true);
    }
}

pub(super) fn update_hud(st: &AppState) {
    let session = &st.session;
    if let Some(subtitle) = &st.title_game_subtitle {
        let domain = session.selected_domain().unwrap_or_default();
        let stage = session.active().map(|a| a.stage.as_str()).unwrap_or_default();
        if stage.is_empty() {
            subtitle.set_text(domain);
        } else {
            subtitle.set_text(&format!("{} | {}", domain, stage));
        }
    }
    if let Some(label) = &st.score_label {
        label.set_text(&format!("Score {}", session.score()));
    }
    if let Some(label) = &st.progress_label {
        label.set_text(&format!(
            "Puzzles {} / {}",
            session.completed_count(),
            session.levels_to_win()
        ));
    }
    if let Some(button) = &st.submit_button {
        button.set_sensitive(session.can_submit());
    }
    if let Some(area) = &st.clock_area {
        if is_critical(session.seconds_left()) {
            area.add_css_class("critical");
        } else {
            area.remove_css_class("critical");
        }
        area.queue_draw();
    }
}

pub(super) fn build_clock(state: &Rc<RefCell<AppState>>) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::builder()
        .content_width(CLOCK_SIZE)
        .content_height(CLOCK_SIZE)
        .halign(gtk::Align::Center)
        .valign(gtk::Align::Center)
        .build();
    area.add_css_class("race-clock");

    let state_draw = state.clone();
    area.set_draw_func(move |area, cr, width, height| {
        let (seconds_left, total) = {
            let st = state_draw.borrow();
            (st.session.seconds_left(), st.session.rules().puzzle_seconds)
        };
        draw_clock(area, cr, width, height, seconds_left, total);
    });
    area
}

#[allow(deprecated)]
fn draw_clock(
    area: &gtk::DrawingArea,
    cr: &Context,
    width: i32,
    height: i32,
    seconds_left: u32,
    total: u32,
) {
    let fg = area.style_context().color();
    let (red, green, blue) = if is_critical(seconds_left) {
        (0.86, 0.2, 0.2)
    } else {
        (fg.red() as f64, fg.green() as f64, fg.blue() as f64)
    };

    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let radius = (width.min(height) as f64 / 2.0 - RING_WIDTH).max(1.0);
    let fraction = if total > 0 {
        seconds_left as f64 / total as f64
    } else {
        0.0
    };

    cr.set_antialias(cairo::Antialias::Best);
    cr.set_line_width(RING_WIDTH);
    cr.set_source_rgba(red, green, blue, 0.18);
    cr.arc(cx, cy, radius, 0.0, 2.0 * PI);
    let _ = cr.stroke();

    if fraction > 0.0 {
        let start = -PI / 2.0;
        cr.set_source_rgba(red, green, blue, 1.0);
        cr.arc(cx, cy, radius, start, start + 2.0 * PI * fraction);
        let _ = cr.stroke();
    }

    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family("Cantarell, Noto Sans, sans");
    font_desc.set_weight(pango::Weight::Bold);
    font_desc.set_size((radius * 0.42 * pango::SCALE as f64) as i32);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(&format_clock(seconds_left));

    let (text_width, text_height) = layout.pixel_size();
    cr.move_to(
        cx - text_width as f64 / 2.0,
        cy - text_height as f64 / 2.0,
    );
    pangocairo::functions::show_layout(cr, &layout);
}

pub(super) fn stop_timer(st: &mut AppState) {
    st.timer_puzzle = None;
    if let Some(handle) = st.timer_handle.take() {
        handle.remove();
    }
}

/// A fresh puzzle gets a fresh one-second interval, so its first tick lands a
/// full second after it appears.
fn timer_needs_restart(running_for: Option<&str>, active: Option<&str>) -> bool {
    active.is_some() && running_for != active
}

/// Arms the tick for the active puzzle, restarting it when the puzzle changed.
/// The core ignores ticks outside play, and the scenes stop the source when
/// play ends.
pub(super) fn sync_timer(state: &Rc<RefCell<AppState>>) {
    let active = {
        let st = state.borrow();
        let active = st.session.active().map(|a| a.id.clone());
        if !timer_needs_restart(st.timer_puzzle.as_deref(), active.as_deref()) {
            return;
        }
        active
    };
    stop_timer(&mut state.borrow_mut());

    let state_tick = state.clone();
    let handle = glib::timeout_add_local(std::time::Duration::from_secs(1), move || {
        let effects = {
            let mut st = state_tick.borrow_mut();
            if st.session.mode() != Mode::Playing {
                return glib::ControlFlow::Continue;
            }
            st.session.tick()
        };
        apply_effects(&state_tick, effects);
        update_hud(&state_tick.borrow());
        glib::ControlFlow::Continue
    });
    let mut st = state.borrow_mut();
    st.timer_handle = Some(handle);
    st.timer_puzzle = active;
}
