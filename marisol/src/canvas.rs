//! Page-sized drawing surface.
//!
//! A [`Canvas`] records text and rectangle drawing operations in PDF user
//! space (origin at the bottom-left corner, units in points). Finishing it
//! produces a [`Surface`]: an encoded content stream ready to be merged onto
//! an existing page by [`crate::stamp::Stamper`].
//!
//! All text is set in the standard Helvetica font with `WinAnsiEncoding`, so
//! widths can be measured without loading any font program. Text that has no
//! WinAnsi code is rejected rather than printed as mojibake.

use lopdf::Object;
use lopdf::content::{Content, Operation};
use serde::{Deserialize, Serialize};

use crate::error::{MarisolError, Result};

/// Resource name under which Helvetica is registered on stamped pages.
pub const FONT_NAME: &str = "MarisolHelv";

/// Width used for characters outside the printable ASCII range.
const DEFAULT_GLYPH_WIDTH: u16 = 556;

/// Helvetica advance widths for characters 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32..=47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48..=63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64..=79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80..=95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96..=111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112..=126
];

/// Characters WinAnsiEncoding places in 0x80..=0x9F.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

fn win_ansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => u8::try_from(code).ok(),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|&(_, byte)| byte),
    }
}

/// Encode `text` as WinAnsi bytes, one byte per glyph.
///
/// # Errors
///
/// [`MarisolError::InvalidConfig`] naming the first character without a
/// WinAnsi code.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            win_ansi_byte(c).ok_or_else(|| {
                MarisolError::invalid_config(format!(
                    "character {c:?} in {text:?} cannot be printed in the stamp font"
                ))
            })
        })
        .collect()
}

fn glyph_width(byte: u8) -> u16 {
    match byte {
        32..=126 => HELVETICA_WIDTHS[usize::from(byte - 32)],
        _ => DEFAULT_GLYPH_WIDTH,
    }
}

/// Width of `text` set in Helvetica at `font_size` points.
///
/// Characters without a WinAnsi code count with the default glyph width.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| u32::from(win_ansi_byte(c).map_or(DEFAULT_GLYPH_WIDTH, glyph_width)))
        .sum();
    units as f32 * font_size / 1000.0
}

/// Round away float noise so quarter turns give an exact matrix.
fn snap(value: f32) -> f32 {
    if value.abs() < 1e-6 { 0.0 } else { value }
}

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Create a color from its components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    fn operands(self) -> Vec<Object> {
        vec![Object::Real(self.r), Object::Real(self.g), Object::Real(self.b)]
    }
}

/// Recorded drawing operations for one page.
///
/// Coordinates are relative to the lower-left corner of the page's MediaBox;
/// [`Canvas::finish`] translates them to the page's user space.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f32,
    height: f32,
    origin: (f32, f32),
    operations: Vec<Operation>,
}

impl Canvas {
    /// Create an empty canvas the size of a page whose MediaBox starts at (0, 0).
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_origin(width, height, (0.0, 0.0))
    }

    /// Create an empty canvas for a MediaBox with lower-left corner `origin`.
    pub fn with_origin(width: f32, height: f32, origin: (f32, f32)) -> Self {
        Self {
            width,
            height,
            origin,
            operations: Vec::new(),
        }
    }

    /// Canvas width in points.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height in points.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether nothing has been drawn yet.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Draw `text` with its baseline origin at (`x`, `y`).
    ///
    /// `rotation` is in degrees, counter-clockwise about the origin.
    ///
    /// # Errors
    ///
    /// Fails if `text` has characters outside WinAnsiEncoding; nothing is
    /// drawn in that case.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        rotation: f32,
        color: Color,
    ) -> Result<()> {
        let bytes = encode_win_ansi(text)?;
        let (sin, cos) = rotation.to_radians().sin_cos();
        let (sin, cos) = (snap(sin), snap(cos));
        // Normalise -0.0 so identical input always encodes identically.
        let matrix = [cos, sin, 0.0 - sin, cos, x, y].map(|v| Object::Real(v + 0.0));

        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("rg", color.operands()),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_NAME.as_bytes().to_vec()),
                    Object::Real(font_size),
                ],
            ),
            Operation::new("Tm", matrix.to_vec()),
            Operation::new("Tj", vec![Object::string_literal(bytes)]),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    /// Draw a rectangle with its lower-left corner at (`x`, `y`).
    ///
    /// Passing `None` for both `fill` and `stroke` draws nothing.
    pub fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<Color>,
    ) {
        let paint = match (fill, stroke) {
            (Some(_), Some(_)) => "B",
            (Some(_), None) => "f",
            (None, Some(_)) => "S",
            (None, None) => return,
        };

        self.operations.push(Operation::new("q", vec![]));
        if let Some(color) = fill {
            self.operations.push(Operation::new("rg", color.operands()));
        }
        if let Some(color) = stroke {
            self.operations.push(Operation::new("RG", color.operands()));
            self.operations.push(Operation::new("w", vec![Object::Integer(1)]));
        }
        self.operations.push(Operation::new(
            "re",
            [x, y, width, height].map(Object::Real).to_vec(),
        ));
        self.operations.push(Operation::new(paint, vec![]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    /// Encode the recorded operations into a surface.
    pub fn finish(self) -> Result<Surface> {
        let mut operations = self.operations;
        let (x0, y0) = self.origin;
        if !operations.is_empty() && (x0 != 0.0 || y0 != 0.0) {
            let translate = [1.0, 0.0, 0.0, 1.0, x0, y0].map(Object::Real).to_vec();
            operations.splice(
                0..0,
                [Operation::new("q", vec![]), Operation::new("cm", translate)],
            );
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations }.encode()?;

        Ok(Surface {
            width: self.width,
            height: self.height,
            content,
        })
    }
}

/// A finished, encoded one-page drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
    /// Encoded content stream operators.
    pub content: Vec<u8>,
}

impl Surface {
    /// Whether the surface draws anything.
    pub fn is_empty(&self) -> bool {
        self.content.iter().all(u8::is_ascii_whitespace)
    }
}
