use eframe::egui;

use sun_spectrum::config::SpectrumConfig;
use sun_spectrum::viewer::app::SpectrumViewerApp;

fn main() -> eframe::Result {
    env_logger::init();

    let config = SpectrumConfig::discover(None).unwrap_or_else(|e| {
        log::warn!("Ignoring config: {e:#}");
        SpectrumConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sun Spectrum – Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(SpectrumViewerApp::new(config)))),
    )
}
