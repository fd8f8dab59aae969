//! Rectangular redactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::canvas::{Canvas, Color, encode_win_ansi, text_width};
use crate::error::{MarisolError, Result};

/// Font size of a redaction label.
pub const LABEL_FONT_SIZE: f32 = 10.0;

/// Named color scheme of a redaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionStyle {
    /// Black box with a white label.
    #[default]
    Solid,
    /// White box with a black border and label.
    Outline,
    /// White box without a border, black label.
    Whiteout,
}

/// Colors used to draw a redaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Border color, if any.
    pub stroke: Option<Color>,
    /// Box color.
    pub fill: Color,
    /// Label color.
    pub text: Color,
}

impl RedactionStyle {
    /// The colors of this style.
    pub fn palette(self) -> Palette {
        match self {
            RedactionStyle::Solid => Palette {
                stroke: None,
                fill: Color::BLACK,
                text: Color::WHITE,
            },
            RedactionStyle::Outline => Palette {
                stroke: Some(Color::BLACK),
                fill: Color::WHITE,
                text: Color::BLACK,
            },
            RedactionStyle::Whiteout => Palette {
                stroke: None,
                fill: Color::WHITE,
                text: Color::BLACK,
            },
        }
    }
}

impl fmt::Display for RedactionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RedactionStyle::Solid => "solid",
            RedactionStyle::Outline => "outline",
            RedactionStyle::Whiteout => "whiteout",
        };
        f.write_str(name)
    }
}

impl FromStr for RedactionStyle {
    type Err = MarisolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "solid" => Ok(Self::Solid),
            "outline" => Ok(Self::Outline),
            "whiteout" => Ok(Self::Whiteout),
            _ => Err(MarisolError::invalid_config(format!(
                "Invalid redaction style: {s}. Must be one of: solid, outline, whiteout"
            ))),
        }
    }
}

/// A box drawn over part of a page.
///
/// Coordinates are in points from the page's bottom-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redaction {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Label centered in the box.
    #[serde(default)]
    pub text: Option<String>,
    /// Color scheme.
    #[serde(default)]
    pub style: RedactionStyle,
}

impl Redaction {
    /// An unlabeled solid redaction.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: None,
            style: RedactionStyle::default(),
        }
    }

    /// Set the label.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: RedactionStyle) -> Self {
        self.style = style;
        self
    }

    /// Whether the box lies within a `page_width` x `page_height` page.
    ///
    /// Edges may touch the page boundary.
    pub fn fits(&self, page_width: f32, page_height: f32) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width >= 0.0
            && self.height >= 0.0
            && self.x + self.width <= page_width
            && self.y + self.height <= page_height
    }

    /// Fail with [`MarisolError::OutsideBoundaries`] unless the box fits.
    pub fn check_bounds(&self, page: &str, page_width: f32, page_height: f32) -> Result<()> {
        if self.fits(page_width, page_height) {
            return Ok(());
        }
        Err(MarisolError::OutsideBoundaries {
            page: page.to_string(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            page_width,
            page_height,
        })
    }

    /// Fail unless the label can be printed in the stamp font.
    pub fn check_text(&self) -> Result<()> {
        if let Some(text) = &self.text {
            encode_win_ansi(text)?;
        }
        Ok(())
    }

    /// Draw the box and its label.
    pub fn render(&self, canvas: &mut Canvas) -> Result<()> {
        self.check_text()?;
        let palette = self.style.palette();
        canvas.draw_rect(
            self.x,
            self.y,
            self.width,
            self.height,
            Some(palette.fill),
            palette.stroke,
        );

        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            let label_width = text_width(text, LABEL_FONT_SIZE);
            let x = self.x + (self.width - label_width) / 2.0;
            let y = self.y + (self.height - LABEL_FONT_SIZE) / 2.0;
            canvas.draw_text(text, x, y, LABEL_FONT_SIZE, 0.0, palette.text)?;
        }
        Ok(())
    }
}
