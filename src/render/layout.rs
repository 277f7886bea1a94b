use palette::Srgb;

use super::svg::{block_height, FontFace, SvgDocument};
use crate::config::{Caption, Layout};
use crate::pipeline::SpectrumFrame;

const MARGIN: f32 = 10.0;
const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

/// Faces for body text and titles.
#[derive(Debug, Clone)]
pub struct TextFaces {
    pub regular: FontFace,
    pub bold: FontFace,
}

// ---------------------------------------------------------------------------
// Tiled strip
// ---------------------------------------------------------------------------

/// Wrap the buckets into rows of `row_width` one-pixel lines, highest
/// wavelength first. With `text`, the caption, band labels and footer are
/// drawn on top.
pub fn tiled(
    frame: &SpectrumFrame,
    layout: &Layout,
    caption: &Caption,
    text: Option<&TextFaces>,
) -> SvgDocument {
    let n = frame.buckets.len();
    let row_width = layout.row_width.max(1) as usize;
    let row_height = layout.row_height.max(2) as f32;
    let rows = n.div_ceil(row_width).max(1);
    let strip_height = rows as f32 * row_height;

    let footer_height = match text {
        Some(_) if !caption.footer.is_empty() => {
            block_height(caption.footer.len(), layout.font_size) + 2.0 * MARGIN
        }
        _ => 0.0,
    };
    let mut doc = SvgDocument::new(
        layout.row_width.max(1),
        (strip_height + footer_height).ceil() as u32,
    );

    for (i, sample) in frame.buckets.iter().rev().enumerate() {
        if sample.alpha == 0 {
            continue;
        }
        let x = (i % row_width) as f32 + 0.5;
        let y = (i / row_width) as f32 * row_height;
        doc.line((x, y), (x, y + row_height - 1.0), sample.color, sample.alpha);
    }

    if let Some(faces) = text {
        caption_text(&mut doc, frame, layout, caption, faces, strip_height);
    }
    doc
}

fn caption_text(
    doc: &mut SvgDocument,
    frame: &SpectrumFrame,
    layout: &Layout,
    caption: &Caption,
    faces: &TextFaces,
    strip_height: f32,
) {
    let size = layout.font_size;
    doc.text_block(MARGIN, MARGIN, &[&caption.title], &faces.bold, layout.title_size, WHITE);

    let mut next_free = MARGIN + block_height(1, layout.title_size) + 2.0 * MARGIN;
    doc.text_block(MARGIN, next_free, &caption.description, &faces.regular, size, WHITE);
    next_free += block_height(caption.description.len(), size) + 2.0 * MARGIN;

    // Samples are drawn in reverse, so a band first shows up at the row of
    // its highest-wavelength bucket.
    let n = frame.buckets.len();
    let row_width = layout.row_width.max(1) as usize;
    let mut notes: Vec<_> = frame.annotations.iter().collect();
    notes.sort_by_key(|a| n - a.end_index);

    for note in notes {
        let row = (n - note.end_index) / row_width;
        let top = (row as f32 * layout.row_height as f32 + MARGIN).max(next_free);
        let mut lines = note.text_lines();
        if let Some(extra) = caption.band_notes.get(note.key) {
            lines.extend(extra.iter().cloned());
        }
        doc.text_block(MARGIN, top, &lines, &faces.regular, size, note.colors.text);
        next_free = top + block_height(lines.len(), size) + MARGIN;
    }

    doc.text_block(
        MARGIN,
        strip_height + MARGIN,
        &caption.footer,
        &faces.regular,
        size,
        WHITE,
    );
}

// ---------------------------------------------------------------------------
// Fade strip
// ---------------------------------------------------------------------------

/// One full-width horizontal line per bucket at `y = index`, giving a
/// vertical gradient. With `text`, each band gets a translucent overlay and
/// its label.
pub fn fade(frame: &SpectrumFrame, layout: &Layout, text: Option<&TextFaces>) -> SvgDocument {
    let width = layout.fade_width.max(1);
    let height = frame.buckets.len().max(1) as u32;
    let mut doc = SvgDocument::new(width, height);

    for (i, sample) in frame.buckets.iter().enumerate() {
        if sample.alpha == 0 {
            continue;
        }
        let y = i as f32 + 0.5;
        doc.line((0.0, y), (width as f32, y), sample.color, sample.alpha);
    }

    if let Some(faces) = text {
        for note in &frame.annotations {
            let colors = note.colors;
            doc.rect(
                0.0,
                note.start_index as f32,
                width as f32,
                note.len() as f32,
                colors.background,
                colors.background_alpha,
            );
            doc.text_block(
                MARGIN,
                note.start_index as f32 + MARGIN,
                &note.text_lines(),
                &faces.regular,
                layout.font_size,
                colors.text,
            );
        }
    }
    doc
}
