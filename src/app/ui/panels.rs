use std::path::Path;

use eframe::egui::{self, Align, ComboBox, Context, Layout, Ui};
use km_explorer::explorer::categories::Dimension;
use km_explorer::explorer::layout::{LayoutKind, LayoutStrategy, SecondaryKey};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) const INITIAL_MATCH_ROWS: usize = 40;
    pub(in crate::app) const MATCH_PAGE_ROWS: usize = 40;
    pub(in crate::app) const MATCH_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        records_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("km-explorer");
                    ui.separator();
                    ui.label(format!("source: {}", records_path.display()));
                    ui.label(format!("records: {}", self.explorer.store().len()));
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.separator();
                    self.draw_layout_selectors(ui);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_records_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));

        self.draw_help(ctx);
    }

    fn draw_layout_selectors(&mut self, ui: &mut Ui) {
        let current = self.explorer.strategy();
        let mut next = current;

        ComboBox::from_id_salt("layout_kind")
            .selected_text(current.kind.label())
            .show_ui(ui, |ui| {
                for kind in LayoutKind::ALL {
                    if ui.selectable_label(current.kind == kind, kind.label()).clicked() {
                        next = LayoutStrategy::new(kind).with_secondary(current.secondary);
                    }
                }
            });

        let groupable = self.explorer.categories().groupable_dimensions();
        let primary_enabled = matches!(current.kind, LayoutKind::Clustered | LayoutKind::Grid);
        ui.add_enabled_ui(primary_enabled, |ui| {
            let primary_text = current.primary.map_or("none", Dimension::label);
            ComboBox::from_id_salt("layout_primary")
                .selected_text(format!("group: {primary_text}"))
                .show_ui(ui, |ui| {
                    if current.kind == LayoutKind::Grid
                        && ui.selectable_label(current.primary.is_none(), "none").clicked()
                    {
                        next = current.with_primary(None);
                    }
                    for dimension in Dimension::ALL {
                        let label = if groupable.contains(&dimension) {
                            dimension.label().to_owned()
                        } else {
                            format!("{} (sparse)", dimension.label())
                        };
                        if ui
                            .selectable_label(current.primary == Some(dimension), label)
                            .clicked()
                        {
                            next = current.with_primary(Some(dimension));
                        }
                    }
                });
        });

        ComboBox::from_id_salt("layout_secondary")
            .selected_text(format!("order: {}", current.secondary.label()))
            .show_ui(ui, |ui| {
                for secondary in SecondaryKey::ALL {
                    if ui
                        .selectable_label(current.secondary == secondary, secondary.label())
                        .clicked()
                    {
                        next = current.with_secondary(secondary);
                    }
                }
            });

        if next != current {
            self.explorer.apply_layout(next);
        }
    }
}
