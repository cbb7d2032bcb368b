//! Drawing surface for a single page.
//!
//! All coordinates are given from the top-left corner of the page, in
//! points, and converted to PDF user space when the operator is emitted.
//! The canvas only builds the page content stream; images must already be
//! registered with the [`PdfStreamWriter`](super::pdf::PdfStreamWriter).

use std::fmt::Write as _;

use super::metrics::{self, Font, ASCENT, LINE_HEIGHT};
use super::pdf::escape_literal_bytes;

/// An sRGB fill or stroke color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#000000`.
    pub const BLACK: Self = Self(0, 0, 0);
    /// `#ffffff`.
    pub const WHITE: Self = Self(255, 255, 255);
    /// `#ff0000`, the official-use accent.
    pub const RED: Self = Self(255, 0, 0);
    /// `#00188f`, the form's primary ink.
    pub const NAVY: Self = Self(0x00, 0x18, 0x8f);

    fn components(self) -> String {
        format!(
            "{} {} {}",
            fmt_num(f64::from(self.0) / 255.0),
            fmt_num(f64::from(self.1) / 255.0),
            fmt_num(f64::from(self.2) / 255.0)
        )
    }
}

/// Horizontal placement of text within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Flush with the box's left edge.
    #[default]
    Left,
    /// Centred within the box width.
    Center,
    /// Stretch every line but the last of each paragraph to the box width.
    Justify,
}

/// How a run of text is set.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Typeface.
    pub font: Font,
    /// Font size in points.
    pub size: f64,
    /// Fill color of the glyphs.
    pub color: Rgb,
    /// Box width. Without one the text runs to the page's right margin.
    pub width: Option<f64>,
    /// Horizontal placement within the box.
    pub align: Align,
    /// Extra space between wrapped lines.
    pub line_gap: f64,
}

impl TextStyle {
    /// Left-aligned, unbounded, no extra line gap.
    #[must_use]
    pub fn new(font: Font, size: f64, color: Rgb) -> Self {
        Self {
            font,
            size,
            color,
            width: None,
            align: Align::Left,
            line_gap: 0.0,
        }
    }

    /// Bound the text box to `width` points.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Center each line in the box.
    #[must_use]
    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    /// Justify all but the last line of each paragraph.
    #[must_use]
    pub fn justified(mut self) -> Self {
        self.align = Align::Justify;
        self
    }

    /// Add `gap` points between wrapped lines.
    #[must_use]
    pub fn line_gap(mut self, gap: f64) -> Self {
        self.line_gap = gap;
        self
    }
}

/// Clickable URI region, already in PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// `[x1, y1, x2, y2]` lower-left to upper-right.
    pub rect: [f64; 4],
    /// Target opened on click.
    pub uri: String,
}

/// Accumulates the content stream of one page.
pub struct Canvas {
    width: f64,
    height: f64,
    right_margin: f64,
    content: Vec<u8>,
    links: Vec<LinkAnnotation>,
}

impl Canvas {
    /// New blank page. `right_margin` bounds text drawn without a width.
    #[must_use]
    pub fn new(width: f64, height: f64, right_margin: f64) -> Self {
        Self {
            width,
            height,
            right_margin,
            content: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Fill a rectangle whose top-left corner is `(x, y)`.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        let mut op = String::new();
        let _ = writeln!(
            op,
            "{} rg\n{} {} {} {} re f",
            color.components(),
            fmt_num(x),
            fmt_num(self.height - y - h),
            fmt_num(w),
            fmt_num(h)
        );
        self.content.extend_from_slice(op.as_bytes());
    }

    /// Outline a rectangle whose top-left corner is `(x, y)`.
    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb, line_width: f64) {
        let mut op = String::new();
        let _ = writeln!(
            op,
            "{} RG {} w\n{} {} {} {} re S",
            color.components(),
            fmt_num(line_width),
            fmt_num(x),
            fmt_num(self.height - y - h),
            fmt_num(w),
            fmt_num(h)
        );
        self.content.extend_from_slice(op.as_bytes());
    }

    /// Straight stroked segment.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb, line_width: f64) {
        let mut op = String::new();
        let _ = writeln!(
            op,
            "{} RG {} w\n{} {} m {} {} l S",
            color.components(),
            fmt_num(line_width),
            fmt_num(from.0),
            fmt_num(self.height - from.1),
            fmt_num(to.0),
            fmt_num(self.height - to.1)
        );
        self.content.extend_from_slice(op.as_bytes());
    }

    /// Paint a registered image `XObject` stretched into the given box.
    pub fn image(&mut self, name: &str, x: f64, y: f64, w: f64, h: f64) {
        let mut op = String::new();
        let _ = writeln!(
            op,
            "q {} 0 0 {} {} {} cm /{name} Do Q",
            fmt_num(w),
            fmt_num(h),
            fmt_num(x),
            fmt_num(self.height - y - h)
        );
        self.content.extend_from_slice(op.as_bytes());
    }

    /// Make the given box open `uri` when clicked.
    pub fn link(&mut self, x: f64, y: f64, w: f64, h: f64, uri: &str) {
        self.links.push(LinkAnnotation {
            rect: [x, self.height - y - h, x + w, self.height - y],
            uri: uri.to_owned(),
        });
    }

    /// Set `text` with its top edge at `y`, wrapping within the style's
    /// box. Returns the height consumed.
    pub fn text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> f64 {
        let box_width = style
            .width
            .unwrap_or(self.width - x - self.right_margin)
            .max(0.0);
        let lines = metrics::wrap(style.font, text, style.size, box_width);
        let advance = LINE_HEIGHT * style.size + style.line_gap;

        // The last line of each paragraph is never stretched.
        let paragraph_ends: Vec<bool> = {
            let mut ends = Vec::with_capacity(lines.len());
            for paragraph in text.split('\n') {
                let count = metrics::wrap(style.font, paragraph, style.size, box_width).len();
                ends.extend((0..count).map(|i| i + 1 == count));
            }
            ends
        };

        let mut top = y;
        for (index, line) in lines.iter().enumerate() {
            if !line.is_empty() {
                let line_width = style.font.text_width(line, style.size);
                let mut line_x = x;
                let mut word_spacing = 0.0;
                match style.align {
                    Align::Left => {}
                    Align::Center => line_x += (box_width - line_width) / 2.0,
                    Align::Justify => {
                        let gaps = line.iter().filter(|b| **b == b' ').count();
                        let last = paragraph_ends.get(index).copied().unwrap_or(true);
                        if !last && gaps > 0 {
                            #[allow(clippy::cast_precision_loss)]
                            let gaps = gaps as f64;
                            word_spacing = (box_width - line_width) / gaps;
                        }
                    }
                }
                self.emit_line(line, line_x, top + ASCENT * style.size, style, word_spacing);
            }
            top += advance;
        }
        top - y
    }

    fn emit_line(&mut self, line: &[u8], x: f64, baseline: f64, style: &TextStyle, word_spacing: f64) {
        let mut op = String::new();
        let _ = write!(
            op,
            "BT /{} {} Tf {} rg ",
            style.font.resource_name(),
            fmt_num(style.size),
            style.color.components()
        );
        if word_spacing.abs() > f64::EPSILON {
            let _ = write!(op, "{} Tw ", fmt_num(word_spacing));
        }
        let _ = write!(op, "{} {} Td (", fmt_num(x), fmt_num(self.height - baseline));
        self.content.extend_from_slice(op.as_bytes());
        self.content.extend_from_slice(&escape_literal_bytes(line));
        self.content.extend_from_slice(b") Tj");
        if word_spacing.abs() > f64::EPSILON {
            self.content.extend_from_slice(b" 0 Tw");
        }
        self.content.extend_from_slice(b" ET\n");
    }

    /// Page content stream and link annotations.
    #[must_use]
    pub fn finish(self) -> (Vec<u8>, Vec<LinkAnnotation>) {
        (self.content, self.links)
    }
}

/// Format a coordinate or component with at most three decimals and no
/// trailing zeros.
#[must_use]
pub fn fmt_num(value: f64) -> String {
    let mut s = format!("{value:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".into();
    }
    s
}
