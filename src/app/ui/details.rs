use eframe::egui::{self, RichText, Ui};
use km_explorer::explorer::categories::DateSource;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(record) = self.selection.borrow().clone() else {
            ui.label("Click a record on the canvas or pick a search match.");
            return;
        };
        let index = self.explorer.store().selected();
        let keys = index.and_then(|index| self.explorer.categories().keys(index)).cloned();

        ui.label(RichText::new(record.display_title()).strong());
        ui.small(record.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Type: {}", record.kind.label()));
        if record.container != record.kind.label() {
            ui.label(format!("Container: {}", record.container));
        }
        if let Some(created) = &record.created_date {
            ui.label(format!("Created: {created}"));
        }

        if let Some(keys) = &keys {
            let year = keys
                .year
                .map_or_else(|| "unknown".to_owned(), |year| year.to_string());
            let source = match keys.date_source {
                DateSource::Unknown => String::new(),
                source => format!(" ({})", source.label()),
            };
            ui.label(format!("Year: {year}{source}"));
            ui.label(format!("Decade: {}", keys.decade));
            ui.label(format!("Region: {}", keys.region));
            ui.label(format!("Object class: {}", keys.object_class));

            ui.separator();
            ui.label(RichText::new("Crime categories").strong());
            if keys.crime_matches.is_empty() {
                ui.label("No crime keywords matched.");
            } else {
                ui.label(format!("Grouped under: {}", keys.crime_type));
                for crime in &keys.crime_matches {
                    ui.label(format!("- {crime}"));
                }
            }
        }

        ui.separator();
        ui.label(RichText::new("Available material").strong());
        for (available, label) in [
            (record.has_image, "image"),
            (record.has_primary_source, "primary source (TEI/LIDO)"),
            (record.has_rdf, "RDF"),
        ] {
            let mark = if available { "yes" } else { "no" };
            ui.label(format!("{label}: {mark}"));
        }

        if !record.description.trim().is_empty() {
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("record_description_scroll")
                .max_height(260.0)
                .show(ui, |ui| {
                    ui.label(record.description.as_str());
                });
        }

        ui.separator();
        ui.horizontal(|ui| {
            if let Some(index) = index
                && ui.button("Focus").clicked()
            {
                self.explorer.focus(index);
            }
            if ui.button("Clear selection").clicked() {
                self.explorer.select(None);
            }
        });
    }
}
