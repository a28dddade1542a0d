//! Text placement with the standard 14 Helvetica faces.
//!
//! No font metrics are embedded, so widths are estimated from an average
//! glyph advance. That is close enough to keep short slide text inside its box.

use lopdf::Object;
use lopdf::content::Operation;
use peel_traits::{Alignment, TextStyle};

pub(crate) const REGULAR_FONT: &str = "F1";
pub(crate) const BOLD_FONT: &str = "F2";

const MIN_FONT_SIZE: f32 = 6.0;
const MAX_FONT_SIZE: f32 = 72.0;
const LINE_SPACING: f32 = 1.2;
const ASCENT: f32 = 0.8;

/// A rectangle in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PdfRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

fn average_advance(bold: bool) -> f32 {
    if bold { 0.56 } else { 0.52 }
}

/// Largest size at which every line fits the box, within the 6–72pt range.
pub(crate) fn fit_font_size(lines: &[&str], width: f32, height: f32, bold: bool) -> f32 {
    let count = lines.len().max(1) as f32;
    let by_height = height / (count * LINE_SPACING);
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let by_width = if longest > 0 {
        width / (longest as f32 * average_advance(bold))
    } else {
        f32::INFINITY
    };
    by_height.min(by_width).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Encodes `s` for the standard fonts. Characters WinAnsi lacks become `?`.
pub(crate) fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{0}'..='\u{7f}' | '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => b'?',
    }
}

/// Content operations drawing `text` inside `rect`.
pub(crate) fn text_operations(text: &str, rect: PdfRect, style: TextStyle) -> Vec<Operation> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let bold = style.is_bold();
    let font_size = fit_font_size(&lines, rect.width, rect.height, bold);
    let font = if bold { BOLD_FONT } else { REGULAR_FONT };
    let top = rect.y + rect.height;

    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), font_size.into()]),
        Operation::new("rg", vec![0.0.into(), 0.0.into(), 0.0.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        let line_width = line.chars().count() as f32 * average_advance(bold) * font_size;
        let x = match style.alignment {
            Some(Alignment::Center) => rect.x + (rect.width - line_width) / 2.0,
            Some(Alignment::Right) => rect.x + rect.width - line_width,
            Some(Alignment::Left) | None => rect.x,
        };
        let baseline = top - font_size * ASCENT - i as f32 * font_size * LINE_SPACING;
        ops.push(Operation::new(
            "Tm",
            vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), baseline.into()],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(line), lopdf::StringFormat::Literal)],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}
