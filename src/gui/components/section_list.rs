//! Draggable section list component
//!
//! One row per catalog section: drag handle, icon, name with a
//! Visible/Hidden badge, description, and a visibility checkbox. Rows are
//! reordered by drag-and-drop; the component reports the resulting action
//! for the caller to apply, it never mutates state itself.

use eframe::egui;

use crate::gui::constants::*;
use crate::projection::ProjectedSection;

/// Action requested by the operator, to be applied by the manager
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionListAction {
    ToggleVisibility { key: &'static str, visible: bool },
    /// Array-move: `to` is the dragged row's final index
    Move { from: usize, to: usize },
}

/// Renders the section list and returns the operator's action, if any
pub fn ui(ui: &mut egui::Ui, sections: &[ProjectedSection]) -> Option<SectionListAction> {
    let mut action = None;

    // Track drag-drop operations
    let mut from_idx = None;
    let mut to_idx = None;

    let frame = egui::Frame::default()
        .inner_margin(4.0)
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke);

    // Drag-drop zone containing all rows
    let (_, dropped_payload) = ui.dnd_drop_zone::<usize, ()>(frame, |ui| {
        ui.set_min_height(120.0);

        for (row_idx, section) in sections.iter().enumerate() {
            let item_id = egui::Id::new("section_row").with(row_idx);

            // Make the whole row draggable except the checkbox column
            let response = ui
                .dnd_drag_source(item_id, row_idx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("\u{2630}").weak());
                        ui.label(egui::RichText::new(section.icon).size(18.0));

                        ui.vertical(|ui| {
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(section.name).strong());
                                let (badge, color) = if section.effective_visible {
                                    ("Visible", BADGE_VISIBLE)
                                } else {
                                    ("Hidden", BADGE_HIDDEN)
                                };
                                ui.colored_label(color, egui::RichText::new(badge).small());
                            });
                            ui.label(egui::RichText::new(section.description).small().weak());
                        });

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let mut visible = section.effective_visible;
                            if ui.checkbox(&mut visible, "").changed() {
                                action = Some(SectionListAction::ToggleVisibility {
                                    key: section.key,
                                    visible,
                                });
                            }
                        });
                    });
                })
                .response;

            if row_idx < sections.len() - 1 {
                ui.separator();
            }

            // Detect drops onto this row for insertion preview
            if let (Some(pointer), Some(hovered_payload)) = (
                ui.input(|i| i.pointer.interact_pos()),
                response.dnd_hover_payload::<usize>(),
            ) {
                let rect = response.rect;
                let stroke = egui::Stroke::new(2.0, ui.visuals().selection.stroke.color);

                let insert_row_idx = if *hovered_payload == row_idx {
                    // Dragged onto ourselves - show line at current position
                    ui.painter().hline(rect.x_range(), rect.center().y, stroke);
                    row_idx
                } else if pointer.y < rect.center().y {
                    // Above this row
                    ui.painter().hline(rect.x_range(), rect.top(), stroke);
                    row_idx
                } else {
                    // Below this row
                    ui.painter().hline(rect.x_range(), rect.bottom(), stroke);
                    row_idx + 1
                };

                if let Some(dragged_payload) = response.dnd_release_payload::<usize>() {
                    // Row was dropped here
                    from_idx = Some(*dragged_payload);
                    to_idx = Some(insert_row_idx);
                }
            }
        }
    });

    // Drop onto empty area appends to the end
    if let Some(dragged_payload) = dropped_payload {
        from_idx = Some(*dragged_payload);
        to_idx = Some(sections.len());
    }

    if let (Some(from), Some(mut to)) = (from_idx, to_idx) {
        // Insertion index → final index: account for the removed row
        if from < to {
            to -= 1;
        }
        if from != to {
            action = Some(SectionListAction::Move { from, to });
        }
    }

    action
}
