use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::prelude::*;

use super::app::dispatch;
use super::state::AppState;
use crate::game::arrangement::Zone;
use crate::game::catalog::{Phase, Step};
use crate::game::session::Event;

pub const CONTENT_MARGIN: i32 = 12;
pub const CARD_GAP: i32 = 8;

fn phase_class(phase: Phase) -> &'static str {
    match phase {
        Phase::Initiation => "phase-initiation",
        Phase::Execution => "phase-execution",
        Phase::Settlement => "phase-settlement",
        Phase::Other => "phase-other",
    }
}

fn zone_code(zone: Zone) -> char {
    match zone {
        Zone::Pending => 'p',
        Zone::Arranged => 'a',
    }
}

fn encode_payload(zone: Zone, step_id: &str) -> String {
    format!("{}:{}", zone_code(zone), step_id)
}

fn decode_payload(raw: &str) -> Option<(Zone, &str)> {
    let (code, step_id) = raw.split_once(':')?;
    let zone = match code {
        "p" => Zone::Pending,
        "a" => Zone::Arranged,
        _ => return None,
    };
    Some((zone, step_id))
}

/// Queues a move for after the current gesture so the lists are not rebuilt
/// under an active drag.
fn queue_move(state: &Rc<RefCell<AppState>>, step_id: String, from: Zone, to: Zone) {
    let state = state.clone();
    glib::idle_add_local_once(move || {
        dispatch(&state, Event::Move { step_id, from, to });
    });
}

pub fn build_drop_area(state: &Rc<RefCell<AppState>>, zone: Zone) -> gtk::Box {
    let list = gtk::Box::new(gtk::Orientation::Vertical, CARD_GAP);
    list.add_css_class("puzzle-drop-area");
    list.set_hexpand(true);
    list.set_vexpand(true);

    let drop_target = gtk::DropTarget::new(glib::Type::STRING, gdk::DragAction::MOVE);
    drop_target.connect_drop({
        let state = state.clone();
        move |_, value, _, _| {
            let Ok(raw) = value.get::<String>() else {
                return false;
            };
            let Some((from, step_id)) = decode_payload(&raw) else {
                return false;
            };
            queue_move(&state, step_id.to_string(), from, zone);
            true
        }
    });
    list.add_controller(drop_target);
    list
}

fn build_step_card(
    state: &Rc<RefCell<AppState>>,
    step: &Step,
    zone: Zone,
    position: Option<(usize, Option<bool>)>,
) -> gtk::Box {
    let card = gtk::Box::new(gtk::Orientation::Vertical, 2);
    card.add_css_class("puzzle-step-card");
    card.add_css_class(phase_class(step.phase));

    let header = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    if let Some((index, _)) = position {
        let number = gtk::Label::new(Some(&(index + 1).to_string()));
        number.add_css_class("arranged-step-number");
        header.append(&number);
    }
    let title = gtk::Label::builder()
        .label(step.title.as_str())
        .xalign(0.0)
        .hexpand(true)
        .wrap(true)
        .css_classes(vec!["heading"])
        .build();
    header.append(&title);
    if let Some((_, Some(correct))) = position {
        let icon_name = if correct {
            "emblem-ok-symbolic"
        } else {
            "window-close-symbolic"
        };
        let icon = gtk::Image::from_icon_name(icon_name);
        icon.add_css_class(if correct { "slot-correct" } else { "slot-incorrect" });
        header.append(&icon);
    }
    card.append(&header);

    if !step.description.is_empty() {
        let description = gtk::Label::builder()
            .label(step.description.as_str())
            .xalign(0.0)
            .wrap(true)
            .css_classes(vec!["body"])
            .build();
        card.append(&description);
    }
    let phase = gtk::Label::builder()
        .label(format!("{} Phase", step.phase.name()))
        .xalign(0.0)
        .css_classes(vec!["caption", "dim-label"])
        .build();
    card.append(&phase);

    let drag_source = gtk::DragSource::builder()
        .actions(gdk::DragAction::MOVE)
        .build();
    let payload = encode_payload(zone, &step.id);
    drag_source.connect_prepare(move |_, _, _| {
        Some(gdk::ContentProvider::for_value(&payload.to_value()))
    });
    card.add_controller(drag_source);

    // Double-click moves the card across without dragging.
    let click = gtk::GestureClick::new();
    click.connect_pressed({
        let state = state.clone();
        let step_id = step.id.clone();
        move |_, n_press, _, _| {
            if n_press == 2 {
                queue_move(&state, step_id.clone(), zone, zone.other());
            }
        }
    });
    card.add_controller(click);

    card
}

fn clear_children(list: &gtk::Box) {
    while let Some(child) = list.first_child() {
        list.remove(&child);
    }
}

fn empty_hint(text: &str) -> gtk::Label {
    let label = gtk::Label::new(Some(text));
    label.add_css_class("empty-drop-area-text");
    label.add_css_class("dim-label");
    label.set_wrap(true);
    label.set_vexpand(true);
    label
}

pub fn rebuild_lists(state: &Rc<RefCell<AppState>>) {
    let (pending_list, arranged_list, pending, arranged, feedback) = {
        let st = state.borrow();
        let board = st.session.board();
        (
            st.pending_list.clone(),
            st.arranged_list.clone(),
            board.pending.clone(),
            board.arranged.clone(),
            // Marks only appear once the verdict is out.
            st.session
                .is_locked()
                .then(|| st.session.slot_feedback())
                .flatten(),
        )
    };

    if let Some(list) = pending_list {
        clear_children(&list);
        if pending.is_empty() {
            list.append(&empty_hint("All steps have been moved to the arranged area."));
        }
        for step in &pending {
            list.append(&build_step_card(state, step, Zone::Pending, None));
        }
    }

    if let Some(list) = arranged_list {
        clear_children(&list);
        if arranged.is_empty() {
            list.append(&empty_hint("Drag steps here to arrange the workflow in order."));
        }
        for (index, step) in arranged.iter().enumerate() {
            let mark = feedback.as_ref().and_then(|marks| marks.get(index).copied());
            list.append(&build_step_card(
                state,
                step,
                Zone::Arranged,
                Some((index, mark)),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_survives_ids_with_separators() {
        let raw = encode_payload(Zone::Arranged, "loan:step:3");
        assert_eq!(decode_payload(&raw), Some((Zone::Arranged, "loan:step:3")));
        assert_eq!(decode_payload("x:1"), None);
        assert_eq!(decode_payload("nocolon"), None);
    }
}
