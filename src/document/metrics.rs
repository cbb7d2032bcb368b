//! Standard-14 Helvetica metrics and WinAnsi text encoding.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em for the printable
//! ASCII range. Latin-1 supplement characters fall back to the width of a
//! digit, which is close enough for centering and wrapping.

/// Typeface used for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
}

/// Ascender height as a fraction of the font size. The baseline of a line
/// drawn at top `y` sits at `y + ASCENT * size`.
pub const ASCENT: f64 = 0.718;

/// Line advance as a fraction of the font size (ascender, descender and
/// the font's built-in gap).
pub const LINE_HEIGHT: f64 = 1.156;

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9 : ; < = > ?
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // @ A-O
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // P-Z [ \ ] ^ _
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // ` a-o
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // p-z { | } ~
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl Font {
    /// Resource name used inside page content streams.
    #[must_use]
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// `PostScript` base font name.
    #[must_use]
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    fn glyph_width(self, byte: u8) -> u16 {
        let table = match self {
            Self::Regular => &HELVETICA,
            Self::Bold => &HELVETICA_BOLD,
        };
        match byte {
            32..=126 => table[usize::from(byte - 32)],
            _ => FALLBACK_WIDTH,
        }
    }

    /// Advance width of WinAnsi-encoded `text` at `size` points.
    #[must_use]
    pub fn text_width(self, text: &[u8], size: f64) -> f64 {
        let units: u32 = text.iter().map(|b| u32::from(self.glyph_width(*b))).sum();
        f64::from(units) * size / 1000.0
    }
}

/// Encode `text` for a WinAnsi single-byte font.
///
/// Latin-1 characters map to their code point; line breaks and tabs become
/// spaces; anything else becomes `?`.
#[must_use]
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' | '\r' | '\n' => b' ',
            ' '..='~' | '\u{a0}'..='\u{ff}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
            _ => b'?',
        })
        .collect()
}

/// Break `text` into lines no wider than `width` at `size` points.
///
/// Explicit newlines always start a new line. Words wider than a full line
/// are split between characters.
#[must_use]
pub fn wrap(font: Font, text: &str, size: f64, width: f64) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current: Vec<u8> = Vec::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word = encode_win_ansi(word);
            let candidate_width = if current.is_empty() {
                font.text_width(&word, size)
            } else {
                font.text_width(&current, size) + font.text_width(b" ", size) + font.text_width(&word, size)
            };

            if candidate_width <= width {
                if !current.is_empty() {
                    current.push(b' ');
                }
                current.extend_from_slice(&word);
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if font.text_width(&word, size) <= width {
                current = word;
            } else {
                for byte in word {
                    let mut next = current.clone();
                    next.push(byte);
                    if !current.is_empty() && font.text_width(&next, size) > width {
                        lines.push(std::mem::take(&mut current));
                        current.push(byte);
                    } else {
                        current = next;
                    }
                }
            }
        }
        lines.push(current);
    }
    lines
}
