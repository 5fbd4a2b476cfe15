//! Advance widths for the standard PDF fonts, taken from the Adobe AFM files.
//!
//! Widths are in 1/1000 em. Printable ASCII comes from a full table per font.
//! The rest of WinAnsi is covered by [`WINANSI_EXTRA`] for punctuation and
//! symbols, and by mapping accented Latin letters onto their base letter,
//! which has the same advance in these fonts. Anything else measures as the
//! font's default width.

use super::StandardFont;

/// Width table for one standard font.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    widths: &'static [u16; 95],
    default_width: u16,
    /// Column of [`WINANSI_EXTRA`] for this font; `None` for fixed pitch.
    extra_column: Option<usize>,
}

impl StandardFontMetrics {
    /// Advance width of a single character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.width_units(ch) as f64 / 1000.0 * font_size
    }

    fn width_units(&self, ch: char) -> u16 {
        let ascii = |c: char| {
            let code = c as u32;
            (0x20..=0x7E)
                .contains(&code)
                .then(|| self.widths[(code - 0x20) as usize])
        };
        if let Some(w) = ascii(ch) {
            return w;
        }
        let Some(column) = self.extra_column else {
            return self.default_width;
        };
        WINANSI_EXTRA
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, widths)| widths[column])
            .or_else(|| base_letter(ch).and_then(ascii))
            .unwrap_or(self.default_width)
    }

    /// Width of a whole string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

impl StandardFont {
    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::TimesRoman => StandardFontMetrics {
                widths: &TIMES_ROMAN,
                default_width: 500,
                extra_column: Some(0),
            },
            Self::TimesBold => StandardFontMetrics {
                widths: &TIMES_BOLD,
                default_width: 500,
                extra_column: Some(1),
            },
            Self::Helvetica => StandardFontMetrics {
                widths: &HELVETICA,
                default_width: 556,
                extra_column: Some(2),
            },
            Self::HelveticaBold => StandardFontMetrics {
                widths: &HELVETICA_BOLD,
                default_width: 611,
                extra_column: Some(3),
            },
            Self::Courier | Self::CourierBold => StandardFontMetrics {
                widths: &COURIER,
                default_width: 600,
                extra_column: None,
            },
        }
    }
}

/// Unaccented letter with the same advance as an accented Latin-1 letter.
/// The accented `i` forms are absent: Helvetica sets them wider than `i`.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'Š' => 'S',
        'Ž' => 'Z',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

/// Non-ASCII WinAnsi glyphs whose width differs from any ASCII letter.
/// Columns: Times-Roman, Times-Bold, Helvetica, Helvetica-Bold.
#[rustfmt::skip]
static WINANSI_EXTRA: [(char, [u16; 4]); 57] = [
    ('\u{00A0}', [250, 250, 278, 278]),
    ('\u{2013}', [500, 500, 556, 556]),
    ('\u{2014}', [1000, 1000, 1000, 1000]),
    ('\u{2018}', [333, 333, 222, 278]),
    ('\u{2019}', [333, 333, 222, 278]),
    ('\u{201A}', [333, 333, 222, 278]),
    ('\u{201C}', [444, 500, 333, 500]),
    ('\u{201D}', [444, 500, 333, 500]),
    ('\u{201E}', [444, 500, 333, 500]),
    ('\u{2022}', [350, 350, 350, 350]),
    ('\u{2026}', [1000, 1000, 1000, 1000]),
    ('\u{2020}', [500, 500, 556, 556]),
    ('\u{2021}', [500, 500, 556, 556]),
    ('\u{2030}', [1000, 1000, 1000, 1000]),
    ('\u{2039}', [333, 333, 333, 333]),
    ('\u{203A}', [333, 333, 333, 333]),
    ('\u{20AC}', [500, 500, 556, 556]),
    ('\u{2122}', [980, 1000, 1000, 1000]),
    ('\u{0192}', [500, 500, 556, 556]),
    ('\u{02C6}', [333, 333, 333, 333]),
    ('\u{02DC}', [333, 333, 333, 333]),
    ('ì', [278, 278, 278, 278]),
    ('í', [278, 278, 278, 278]),
    ('î', [278, 278, 278, 278]),
    ('ï', [278, 278, 278, 278]),
    ('ß', [500, 556, 611, 611]),
    ('æ', [667, 722, 889, 889]),
    ('Æ', [889, 1000, 1000, 1000]),
    ('œ', [722, 722, 944, 944]),
    ('Œ', [889, 1000, 1000, 1000]),
    ('Þ', [556, 611, 667, 667]),
    ('þ', [500, 556, 556, 611]),
    ('ð', [500, 500, 556, 611]),
    ('¡', [333, 333, 333, 333]),
    ('¢', [500, 500, 556, 556]),
    ('£', [500, 500, 556, 556]),
    ('¤', [500, 500, 556, 556]),
    ('¥', [500, 500, 556, 556]),
    ('¦', [200, 220, 260, 280]),
    ('§', [500, 500, 556, 556]),
    ('©', [760, 747, 737, 737]),
    ('ª', [276, 300, 370, 370]),
    ('«', [500, 500, 556, 556]),
    ('»', [500, 500, 556, 556]),
    ('¬', [564, 570, 584, 584]),
    ('®', [760, 747, 737, 737]),
    ('°', [400, 400, 400, 400]),
    ('±', [564, 570, 584, 584]),
    ('µ', [500, 556, 556, 611]),
    ('¶', [453, 540, 537, 556]),
    ('·', [250, 250, 278, 278]),
    ('º', [310, 330, 365, 365]),
    ('¼', [750, 750, 834, 834]),
    ('½', [750, 750, 834, 834]),
    ('¿', [444, 500, 611, 611]),
    ('×', [564, 570, 584, 584]),
    ('÷', [564, 570, 584, 584]),
];

#[rustfmt::skip]
static TIMES_ROMAN: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    // 0-9
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    // : ; < = > ? @
    278, 278, 564, 564, 564, 444, 921,
    // A-Z
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    // [ \ ] ^ _ `
    333, 278, 333, 469, 500, 333,
    // a-z
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    // { | } ~
    480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

static COURIER: [u16; 95] = [600; 95];
