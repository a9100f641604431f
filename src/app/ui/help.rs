use eframe::egui::{self, Context};

use super::super::ViewModel;

const SHORTCUTS: [(&str, &str); 9] = [
    ("drag", "pan"),
    ("wheel / pinch", "zoom at the pointer"),
    ("click", "select a record"),
    ("double click", "zoom into a record"),
    ("arrows", "pan"),
    ("+ / -", "zoom"),
    ("0 / Home", "fit the collection"),
    ("/ or F", "search"),
    ("Esc", "clear selection"),
];

impl ViewModel {
    pub(in crate::app) fn draw_help(&mut self, ctx: &Context) {
        if !self.show_help {
            return;
        }

        let mut open = true;
        egui::Window::new("How to explore")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Every record of the archive sits on one canvas, grouped by the layout above.");
                ui.label("Zoom in to see chips, thumbnails and finally full cards.");
                ui.add_space(6.0);
                egui::Grid::new("help_shortcuts").striped(true).show(ui, |ui| {
                    for (input, action) in SHORTCUTS {
                        ui.monospace(input);
                        ui.label(action);
                        ui.end_row();
                    }
                });
                ui.add_space(6.0);
                ui.small("H or ? toggles this window.");
            });
        self.show_help &= open;
    }
}
