//! GUI manager implemented with egui/eframe

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{error, info};

use super::components::section_list::{self, SectionListAction};
use super::constants::*;
use crate::manager::SectionManager;
use crate::store::ConfigStore;

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct ManagerApp {
    manager: SectionManager,
    status_message: Option<StatusMessage>,
}

impl ManagerApp {
    fn new(_cc: &CreationContext<'_>, store: Box<dyn ConfigStore>) -> Self {
        info!("Initializing egui manager");

        let mut manager = SectionManager::new(store);
        let status_message = match manager.refresh() {
            Ok(()) => None,
            Err(err) => {
                error!(error = ?err, "Initial config fetch failed");
                Some(StatusMessage {
                    text: format!("Could not load saved layout, showing defaults: {err:#}"),
                    color: STATUS_ERROR,
                })
            }
        };

        Self {
            manager,
            status_message,
        }
    }

    fn apply(&mut self, action: SectionListAction) {
        match action {
            SectionListAction::ToggleVisibility { key, visible } => {
                match self.manager.set_visibility(key, visible) {
                    Ok(true) => {
                        let verb = if visible { "shown" } else { "hidden" };
                        self.status_message = Some(StatusMessage {
                            text: format!("Section '{key}' is now {verb}"),
                            color: STATUS_OK,
                        });
                    }
                    Ok(false) => {}
                    Err(err) => {
                        error!(key = %key, error = ?err, "Visibility update failed");
                        self.status_message = Some(StatusMessage {
                            text: format!("Could not save visibility: {err:#}"),
                            color: STATUS_ERROR,
                        });
                    }
                }
            }
            SectionListAction::Move { from, to } => {
                match self.manager.reorder_by_index(from, to) {
                    Ok(true) => {
                        self.status_message = Some(StatusMessage {
                            text: "Section order saved".to_string(),
                            color: STATUS_OK,
                        });
                    }
                    Ok(false) => {}
                    Err(err) => {
                        error!(error = ?err, "Reorder failed");
                        self.status_message = Some(StatusMessage {
                            text: format!("Could not save new order: {err:#}"),
                            color: STATUS_ERROR,
                        });
                    }
                }
            }
        }
    }

    fn refresh(&mut self) {
        self.status_message = match self.manager.refresh() {
            Ok(()) => Some(StatusMessage {
                text: "Layout reloaded".to_string(),
                color: STATUS_OK,
            }),
            Err(err) => {
                error!(error = ?err, "Refresh failed");
                Some(StatusMessage {
                    text: format!("Could not reload layout, showing defaults: {err:#}"),
                    color: STATUS_ERROR,
                })
            }
        };
    }
}

impl eframe::App for ManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            ui.heading("Site Sections");
            ui.label(
                egui::RichText::new(
                    "Drag sections to change their order on the public site. \
                     Untick a section to hide it without losing its content.",
                )
                .small()
                .weak(),
            );
            ui.add_space(SECTION_SPACING);

            let sections: Vec<_> = self.manager.sections().to_vec();
            egui::ScrollArea::vertical().show(ui, |ui| {
                if let Some(action) = section_list::ui(ui, &sections) {
                    self.apply(action);
                }
            });

            ui.add_space(SECTION_SPACING);

            ui.horizontal(|ui| {
                if ui.button("\u{1F504} Reload").clicked() {
                    self.refresh();
                }
                let visible = self.manager.visible_sections().len();
                ui.label(
                    egui::RichText::new(format!(
                        "{visible} of {} sections visible",
                        self.manager.sections().len()
                    ))
                    .small()
                    .weak(),
                );
            });

            if let Some(message) = &self.status_message {
                ui.add_space(ITEM_SPACING);
                ui.colored_label(message.color, &message.text);
            }

            ui.add_space(SECTION_SPACING);
            ui.separator();
            ui.label(
                egui::RichText::new(
                    "The navigation bar is always shown on the public site, \
                     regardless of these settings.",
                )
                .small()
                .weak(),
            );
        });
    }
}

pub fn run_gui(store: Box<dyn ConfigStore>) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Site Sections Manager"),
        ..Default::default()
    };

    eframe::run_native(
        "Site Sections Manager",
        options,
        Box::new(move |cc| Ok(Box::new(ManagerApp::new(cc, store)))),
    )
    .map_err(|err| anyhow!("Failed to launch egui manager: {err}"))
}
