use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text, VLine};

use crate::color::to_color32;
use crate::viewer::state::ViewerState;

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Bucket alpha against wavelength, each bar in its bucket's colour, with the
/// band boundaries marked.
pub fn spectrum_plot(ui: &mut Ui, state: &ViewerState) {
    let frame = match &state.frame {
        Some(frame) => frame,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a table to preview the spectrum  (File → Open…)");
            });
            return;
        }
    };

    let step = frame.params.step_nm;
    let bars: Vec<Bar> = frame
        .buckets
        .iter()
        .filter(|b| b.alpha > 0)
        .map(|b| {
            Bar::new(b.wavelength_nm(), f64::from(b.alpha))
                .width(step)
                .fill(to_color32(b.color, 255))
        })
        .collect();

    Plot::new("spectrum_plot")
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Alpha")
        .include_y(0.0)
        .include_y(255.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("buckets"));

            for note in &frame.annotations {
                let color = to_color32(note.colors.background, 255);
                plot_ui.vline(VLine::new(note.start_nm).color(color).name(note.label));
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(note.start_nm, 250.0),
                        RichText::new(note.label).color(color),
                    )
                    .anchor(Align2::LEFT_TOP),
                );
            }
        });
}
