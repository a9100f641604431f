use eframe::egui::{self, ComboBox, Key, Ui};
use km_explorer::explorer::categories::Dimension;
use km_explorer::util::truncate_label;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Explore");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search")
            .on_hover_text("Title, description, identifier or record type.");
        let search_response = ui.text_edit_singleline(&mut self.search);
        if self.focus_search {
            search_response.request_focus();
            self.focus_search = false;
        }
        if search_response.changed() {
            self.matches = self.explorer.search(&self.search);
            self.match_rows_visible = Self::INITIAL_MATCH_ROWS;
        }
        let submitted =
            search_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));

        ui.horizontal(|ui| {
            let has_matches = !self.matches.is_empty();
            let zoom_clicked = ui
                .add_enabled(has_matches, egui::Button::new("Zoom to matches"))
                .clicked();
            if zoom_clicked || (submitted && has_matches) {
                self.explorer.zoom_to_matches();
            }
            if ui.button("Clear").clicked() {
                self.search.clear();
                self.matches.clear();
                self.explorer.clear_search();
            }
        });

        if !self.explorer.query().is_empty() {
            ui.label(format!("{} matches", self.matches.len()));
            self.draw_match_rows(ui);
        }

        ui.separator();
        ui.label("Color by");
        let current = self.explorer.pipeline().color_dimension();
        ComboBox::from_id_salt("color_dimension")
            .selected_text(current.label())
            .show_ui(ui, |ui| {
                for dimension in Dimension::ALL {
                    if ui.selectable_label(current == dimension, dimension.label()).clicked() {
                        self.explorer.pipeline_mut().set_color_dimension(dimension);
                    }
                }
            });

        ui.separator();
        let pipeline = self.explorer.pipeline_mut();
        ui.checkbox(pipeline.show_grid(), "Reference grid");
        ui.checkbox(pipeline.show_minimap(), "Minimap");
        ui.checkbox(pipeline.show_labels(), "Group labels");
        ui.checkbox(pipeline.show_index_overlay(), "Quad-tree overlay")
            .on_hover_text("Outline the spatial index cells.");
        ui.checkbox(&mut self.show_fps_bar, "Frame counter");

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                self.explorer.reset_view();
            }
            if ui.button("Reshuffle").on_hover_text("Re-run the layout with a new jitter seed.").clicked() {
                let seed = self.explorer.layout_seed().wrapping_add(1);
                self.explorer.set_layout_seed(seed);
                self.explorer.apply_layout(self.explorer.strategy());
            }
            if ui.button("Help").clicked() {
                self.show_help = true;
            }
        });
    }

    fn draw_match_rows(&mut self, ui: &mut Ui) {
        let row_count = self.matches.len().min(self.match_rows_visible);
        let mut should_load_more = false;
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .id_salt("search_matches_scroll")
            .max_height(280.0)
            .auto_shrink([false, true])
            .show_rows(ui, 20.0, row_count, |ui, row_range| {
                if row_range.end + Self::MATCH_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for row in row_range {
                    let Some(&index) = self.matches.get(row) else {
                        continue;
                    };
                    let Some(record) = self.explorer.store().record(index) else {
                        continue;
                    };
                    let selected = self.explorer.store().selected() == Some(index);
                    let label = truncate_label(record.display_title(), 44);
                    if ui
                        .selectable_label(selected, label)
                        .on_hover_text(record.id.as_str())
                        .clicked()
                    {
                        clicked = Some(index);
                    }
                }
            });

        if should_load_more && row_count < self.matches.len() {
            self.match_rows_visible = (row_count + Self::MATCH_PAGE_ROWS).min(self.matches.len());
        }

        if let Some(index) = clicked {
            self.explorer.select(Some(index));
            self.explorer.focus(index);
        }
    }
}
