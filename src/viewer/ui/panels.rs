use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use crate::bands::format_wavelength;
use crate::color::to_color32;
use crate::config::{OutputMode, PipelineParams};
use crate::data::loader::load_file;
use crate::data::normalize::Normalization;
use crate::viewer::state::ViewerState;

// ---------------------------------------------------------------------------
// Left side panel – pipeline parameters
// ---------------------------------------------------------------------------

/// Render the parameter panel. Changes are applied when the frame ends.
pub fn side_panel(ui: &mut Ui, state: &mut ViewerState) {
    ui.heading("Parameters");
    ui.separator();

    let mut params = state.params;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Buckets");
            ui.add(
                DragValue::new(&mut params.step_nm)
                    .speed(0.05)
                    .max_decimals(2)
                    .range(0.01..=100.0)
                    .prefix("step ")
                    .suffix(" nm"),
            );
            optional_bound(ui, "min", &mut params.min_nm, 380.0);
            optional_bound(ui, "max", &mut params.max_nm, 750.0);
            ui.separator();

            ui.strong("Intensity");
            ui.add(Slider::new(&mut params.percentile_bottom, 0.0..=100.0).text("bottom %"));
            ui.add(Slider::new(&mut params.percentile_top, 0.0..=100.0).text("top %"));
            egui::ComboBox::from_id_salt("normalization")
                .selected_text(normalization_label(params.normalization))
                .show_ui(ui, |ui: &mut Ui| {
                    for mode in [Normalization::PercentileRatio, Normalization::Peak] {
                        ui.selectable_value(&mut params.normalization, mode, normalization_label(mode));
                    }
                });
            ui.separator();

            ui.strong("Colour");
            ui.checkbox(&mut params.color.falloff, "Sensitivity falloff");
            ui.add(Slider::new(&mut params.color.brightness, 0.1..=2.0).text("brightness"));
            ui.separator();

            ui.strong("Output");
            ui.horizontal(|ui: &mut Ui| {
                ui.selectable_value(&mut params.output_mode, OutputMode::Tiled, "Tiled");
                ui.selectable_value(&mut params.output_mode, OutputMode::Fade, "Fade");
            });
            ui.checkbox(&mut params.annotate, "Band labels and text");
            ui.label(RichText::new(format!("exports as {}", state.job_name())).weak());

            if ui.button("Reset").clicked() {
                params = PipelineParams::default();
            }
        });

    state.set_params(params);
}

fn optional_bound(ui: &mut Ui, name: &str, bound: &mut Option<f64>, fallback: f64) {
    ui.horizontal(|ui: &mut Ui| {
        let mut enabled = bound.is_some();
        if ui.checkbox(&mut enabled, name).changed() {
            *bound = enabled.then_some(fallback);
        }
        if let Some(value) = bound.as_mut() {
            ui.add(DragValue::new(value).speed(1.0).suffix(" nm"));
        }
    });
}

fn normalization_label(mode: Normalization) -> &'static str {
    match mode {
        Normalization::PercentileRatio => "Percentile ratio",
        Normalization::Peak => "Peak",
    }
}

// ---------------------------------------------------------------------------
// Bottom panel – band annotations
// ---------------------------------------------------------------------------

pub fn band_table(ui: &mut Ui, state: &ViewerState) {
    let Some(frame) = &state.frame else {
        ui.label("No bands to show.");
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(100.0))
        .columns(Column::auto().at_least(80.0), 4)
        .header(20.0, |mut header| {
            for title in ["Band", "From", "To", "First bucket", "Buckets"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for note in &frame.annotations {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let swatch = to_color32(note.colors.background, 255);
                        ui.label(RichText::new(note.label).color(swatch));
                    });
                    row.col(|ui| {
                        ui.label(format_wavelength(note.start_nm));
                    });
                    row.col(|ui| {
                        ui.label(format_wavelength(note.end_nm));
                    });
                    row.col(|ui| {
                        ui.label(note.start_index.to_string());
                    });
                    row.col(|ui| {
                        ui.label(note.len().to_string());
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.frame.is_some();
            if ui.add_enabled(can_export, egui::Button::new("Export…")).clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let buckets = state.frame.as_ref().map_or(0, |f| f.buckets.len());
            ui.label(format!("{} rows, {buckets} buckets", table.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Open spectral table")
        .add_filter("Supported files", &["txt", "tsv", "dat", "csv", "json", "parquet", "pq"])
        .add_filter("Tab-separated", &["txt", "tsv", "dat"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match load_file(&path) {
            Ok(table) => {
                log::info!("Loaded {} samples from {}", table.len(), path.display());
                state.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

pub fn export_dialog(state: &mut ViewerState) {
    let Some(dir) = rfd::FileDialog::new()
        .set_title("Export into folder")
        .set_directory(&state.config.output_dir)
        .pick_folder()
    else {
        return;
    };

    match state.export(&dir) {
        Ok(files) => {
            log::info!("Exported {}", files.png.display());
            state.status_message = Some(format!("Saved {}", files.png.display()));
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
