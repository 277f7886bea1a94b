use eframe::egui;

use super::state::ViewerState;
use super::ui::{panels, plot};
use crate::config::SpectrumConfig;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpectrumViewerApp {
    pub state: ViewerState,
}

impl SpectrumViewerApp {
    pub fn new(config: SpectrumConfig) -> Self {
        Self {
            state: ViewerState::new(config),
        }
    }
}

impl eframe::App for SpectrumViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: pipeline parameters ----
        egui::SidePanel::left("params_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: band annotations ----
        egui::TopBottomPanel::bottom("bands_panel")
            .resizable(true)
            .default_height(140.0)
            .show(ctx, |ui| {
                panels::band_table(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectrum_plot(ui, &self.state);
        });
    }
}
