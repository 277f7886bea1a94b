use std::fmt::Write as _;

use palette::Srgb;

use crate::data::model::hex_color;

/// Font family and weight as they appear in `font-*` attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    pub family: String,
    pub weight: u16,
}

/// Minimal SVG writer for the primitives the strips need.
pub struct SvgDocument {
    width: u32,
    height: u32,
    body: String,
}

impl SvgDocument {
    /// A `width` x `height` canvas filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        let mut doc = Self {
            width,
            height,
            body: String::new(),
        };
        doc.rect(0.0, 0.0, width as f32, height as f32, Srgb::new(0, 0, 0), 255);
        doc
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Srgb<u8>, alpha: u8) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-opacity="{}"/>"#,
            from.0,
            from.1,
            to.0,
            to.1,
            hex_color(color),
            opacity(alpha)
        );
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Srgb<u8>, alpha: u8) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{}" fill-opacity="{}"/>"#,
            hex_color(color),
            opacity(alpha)
        );
    }

    /// Text block whose first line's top edge sits at `top`. Lines are spaced
    /// 1.2 × `size` apart.
    pub fn text_block<S: AsRef<str>>(
        &mut self,
        x: f32,
        top: f32,
        lines: &[S],
        face: &FontFace,
        size: f32,
        color: Srgb<u8>,
    ) {
        if lines.is_empty() {
            return;
        }
        let _ = write!(
            self.body,
            r#"<text font-family="{}" font-weight="{}" font-size="{size}" fill="{}">"#,
            escape(&face.family),
            face.weight,
            hex_color(color)
        );
        for (i, line) in lines.iter().enumerate() {
            let baseline = top + size + i as f32 * line_height(size);
            let _ = write!(
                self.body,
                r#"<tspan x="{x}" y="{baseline}">{}</tspan>"#,
                escape(line.as_ref())
            );
        }
        let _ = writeln!(self.body, "</text>");
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\" shape-rendering=\"crispEdges\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

/// Vertical distance between consecutive text lines.
pub fn line_height(size: f32) -> f32 {
    size * 1.2
}

/// Height taken by `n` lines of text.
pub fn block_height(n: usize, size: f32) -> f32 {
    n as f32 * line_height(size)
}

fn opacity(alpha: u8) -> String {
    format!("{:.4}", f32::from(alpha) / 255.0)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
