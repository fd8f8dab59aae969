//! Text overlays and the per-document area registry.
//!
//! Every page is divided into four addressable [`Area`]s. A document keeps at
//! most one [`Overlay`] per area in its [`OverlaySlots`]; one slot is pinned
//! to the numbering overlay when the document is created.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::canvas::{Canvas, Color, encode_win_ansi, text_width};
use crate::error::{MarisolError, Result};

/// Distance in points between an automatically placed overlay and the page edge.
pub const MARGIN: f32 = 15.0;

/// Default overlay font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// A quadrant of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Area {
    /// Upper left corner.
    TopLeft,
    /// Upper right corner.
    TopRight,
    /// Lower left corner.
    BottomLeft,
    /// Lower right corner.
    #[default]
    BottomRight,
}

impl Area {
    /// All areas, in slot order.
    pub const ALL: [Area; 4] = [
        Area::TopLeft,
        Area::TopRight,
        Area::BottomLeft,
        Area::BottomRight,
    ];

    /// Slot index of this area.
    pub fn index(self) -> usize {
        match self {
            Area::TopLeft => 0,
            Area::TopRight => 1,
            Area::BottomLeft => 2,
            Area::BottomRight => 3,
        }
    }

    /// Whether the area is along the top edge.
    pub fn is_top(self) -> bool {
        matches!(self, Area::TopLeft | Area::TopRight)
    }

    /// Whether the area is along the left edge.
    pub fn is_left(self) -> bool {
        matches!(self, Area::TopLeft | Area::BottomLeft)
    }

    /// Canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Area::TopLeft => "TOP_LEFT",
            Area::TopRight => "TOP_RIGHT",
            Area::BottomLeft => "BOTTOM_LEFT",
            Area::BottomRight => "BOTTOM_RIGHT",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = MarisolError;

    /// Accepts `TOP_LEFT`, `top-left`, `topleft` or `tl` in any case.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "topleft" | "tl" => Ok(Area::TopLeft),
            "topright" | "tr" => Ok(Area::TopRight),
            "bottomleft" | "bl" => Ok(Area::BottomLeft),
            "bottomright" | "br" => Ok(Area::BottomRight),
            _ => Err(MarisolError::invalid_config(format!(
                "Invalid area: {s}. Must be one of: TOP_LEFT, TOP_RIGHT, BOTTOM_LEFT, BOTTOM_RIGHT"
            ))),
        }
    }
}

/// What an overlay prints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum OverlayKind {
    /// The bates number of the page being rendered.
    Numbering,
    /// The same text on every page.
    Static(String),
}

/// A text annotation bound to an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Text source.
    pub kind: OverlayKind,
    /// Slot the overlay occupies.
    pub area: Area,
    /// Horizontal offset from the left page edge, used in manual mode.
    pub x: f32,
    /// Vertical offset from the bottom page edge, used in manual mode.
    pub y: f32,
    /// Counter-clockwise rotation in degrees about the anchor.
    pub rotation: f32,
    /// Place the text at (`x`, `y`) instead of anchoring it to the area.
    pub manual: bool,
    /// Font size in points.
    pub font_size: f32,
    /// Text color.
    pub color: Color,
}

impl Overlay {
    fn new(kind: OverlayKind, area: Area) -> Self {
        Self {
            kind,
            area,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            manual: false,
            font_size: DEFAULT_FONT_SIZE,
            color: Color::BLACK,
        }
    }

    /// An overlay that prints each page's bates number.
    pub fn numbering(area: Area) -> Self {
        Self::new(OverlayKind::Numbering, area)
    }

    /// An overlay that prints fixed text.
    pub fn text(text: impl Into<String>, area: Area) -> Self {
        Self::new(OverlayKind::Static(text.into()), area)
    }

    /// Set the manual offset.
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Switch manual positioning on or off.
    pub fn manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    /// Set the font size in points.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Whether this is the numbering overlay.
    pub fn is_numbering(&self) -> bool {
        matches!(self.kind, OverlayKind::Numbering)
    }

    /// Text printed on a page whose bates number is `bates`.
    pub fn text_for<'a>(&'a self, bates: &'a str) -> &'a str {
        match &self.kind {
            OverlayKind::Numbering => bates,
            OverlayKind::Static(text) => text,
        }
    }

    /// Anchor point for `text_width` points of text on a page.
    pub fn position(&self, page_width: f32, page_height: f32, text_width: f32) -> (f32, f32) {
        if self.manual {
            return (self.x, self.y);
        }

        let x = if self.area.is_left() {
            MARGIN
        } else {
            page_width - MARGIN - text_width
        };
        let y = if self.area.is_top() {
            page_height - MARGIN
        } else {
            MARGIN
        };
        (x, y)
    }

    /// Draw the overlay for the page numbered `bates`.
    pub fn render(&self, canvas: &mut Canvas, bates: &str) -> Result<()> {
        let text = self.text_for(bates);
        let width = text_width(text, self.font_size);
        let (x, y) = self.position(canvas.width(), canvas.height(), width);
        canvas.draw_text(text, x, y, self.font_size, self.rotation, self.color)
    }
}

/// Fixed four-slot overlay registry of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySlots {
    slots: [Option<Overlay>; 4],
    numbering: Area,
}

impl OverlaySlots {
    /// Create the registry with `numbering` pinned to its area.
    pub fn new(numbering: Overlay) -> Self {
        let area = numbering.area;
        let mut slots: [Option<Overlay>; 4] = Default::default();
        slots[area.index()] = Some(Overlay {
            kind: OverlayKind::Numbering,
            ..numbering
        });
        Self {
            slots,
            numbering: area,
        }
    }

    /// Area holding the numbering overlay.
    pub fn numbering_area(&self) -> Area {
        self.numbering
    }

    /// Overlay in `area`, if any.
    pub fn get(&self, area: Area) -> Option<&Overlay> {
        self.slots[area.index()].as_ref()
    }

    /// Place `overlay` in its area.
    ///
    /// The numbering area is never reassigned and an occupied area is never
    /// overwritten. On error the registry is unchanged.
    pub fn insert(&mut self, overlay: Overlay) -> Result<()> {
        let area = overlay.area;
        if area == self.numbering {
            return Err(MarisolError::AreaReserved { area });
        }
        if overlay.is_numbering() {
            return Err(MarisolError::invalid_config(
                "a document carries exactly one numbering overlay",
            ));
        }

        if let OverlayKind::Static(text) = &overlay.kind {
            encode_win_ansi(text)?;
        }

        let slot = &mut self.slots[area.index()];
        if slot.is_some() {
            return Err(MarisolError::AreaOccupied { area });
        }
        *slot = Some(overlay);
        Ok(())
    }

    /// Overlays in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.slots.iter().flatten()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Never true; the numbering slot is always occupied.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Draw every overlay for the page numbered `bates`.
    pub fn render(&self, canvas: &mut Canvas, bates: &str) -> Result<()> {
        for overlay in self.iter() {
            overlay.render(canvas, bates)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("TOP_LEFT", Area::TopLeft)]
    #[case("top-right", Area::TopRight)]
    #[case("bottom left", Area::BottomLeft)]
    #[case("BR", Area::BottomRight)]
    #[case("tl", Area::TopLeft)]
    fn test_area_from_str(#[case] input: &str, #[case] expected: Area) {
        assert_eq!(input.parse::<Area>().unwrap(), expected);
    }

    #[test]
    fn test_area_from_str_invalid() {
        let err = "middle".parse::<Area>().unwrap_err();
        assert!(matches!(err, MarisolError::InvalidConfig { .. }));
    }

    #[test]
    fn test_area_display_round_trip() {
        for area in Area::ALL {
            assert_eq!(area.to_string().parse::<Area>().unwrap(), area);
        }
    }

    #[test]
    fn test_area_serde_names() {
        let json = serde_json::to_string(&Area::TopRight).unwrap();
        assert_eq!(json, "\"TOP_RIGHT\"");
    }

    #[rstest]
    #[case(Area::TopLeft, (15.0, 777.0))]
    #[case(Area::TopRight, (497.0, 777.0))]
    #[case(Area::BottomLeft, (15.0, 15.0))]
    #[case(Area::BottomRight, (497.0, 15.0))]
    fn test_automatic_position(#[case] area: Area, #[case] expected: (f32, f32)) {
        let overlay = Overlay::numbering(area);
        assert_eq!(overlay.position(612.0, 792.0, 100.0), expected);
    }

    #[test]
    fn test_manual_position_ignores_area() {
        let overlay = Overlay::text("CONFIDENTIAL", Area::TopRight)
            .with_offset(40.0, 60.0)
            .manual(true);
        assert_eq!(overlay.position(612.0, 792.0, 100.0), (40.0, 60.0));
    }

    #[test]
    fn test_text_for() {
        assert_eq!(
            Overlay::numbering(Area::BottomRight).text_for("ABC000007"),
            "ABC000007"
        );
        assert_eq!(
            Overlay::text("CONFIDENTIAL", Area::TopLeft).text_for("ABC000007"),
            "CONFIDENTIAL"
        );
    }

    #[test]
    fn test_slots_pin_numbering_area() {
        let mut slots = OverlaySlots::new(Overlay::numbering(Area::BottomRight));
        assert_eq!(slots.numbering_area(), Area::BottomRight);

        let err = slots
            .insert(Overlay::text("X", Area::BottomRight))
            .unwrap_err();
        assert!(matches!(
            err,
            MarisolError::AreaReserved {
                area: Area::BottomRight
            }
        ));
        assert_eq!(slots.len(), 1);
        assert!(slots.get(Area::BottomRight).unwrap().is_numbering());
    }

    #[test]
    fn test_slots_accept_free_areas_once() {
        let mut slots = OverlaySlots::new(Overlay::numbering(Area::BottomRight));
        slots.insert(Overlay::text("A", Area::TopLeft)).unwrap();
        slots.insert(Overlay::text("B", Area::TopRight)).unwrap();
        assert_eq!(slots.len(), 3);

        let err = slots.insert(Overlay::text("C", Area::TopLeft)).unwrap_err();
        assert!(matches!(err, MarisolError::AreaOccupied { .. }));
        assert_eq!(slots.get(Area::TopLeft).unwrap().text_for(""), "A");
    }

    #[test]
    fn test_slots_reject_second_numbering_overlay() {
        let mut slots = OverlaySlots::new(Overlay::numbering(Area::TopLeft));
        assert!(slots.insert(Overlay::numbering(Area::BottomLeft)).is_err());
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_slots_iterate_in_area_order() {
        let mut slots = OverlaySlots::new(Overlay::numbering(Area::BottomRight));
        slots.insert(Overlay::text("bl", Area::BottomLeft)).unwrap();
        slots.insert(Overlay::text("tl", Area::TopLeft)).unwrap();

        let areas: Vec<Area> = slots.iter().map(|o| o.area).collect();
        assert_eq!(
            areas,
            vec![Area::TopLeft, Area::BottomLeft, Area::BottomRight]
        );
    }

    #[test]
    fn test_insert_rejects_unprintable_text() {
        let mut slots = OverlaySlots::new(Overlay::numbering(Area::BottomRight));
        let err = slots
            .insert(Overlay::text("機密", Area::TopLeft))
            .unwrap_err();
        assert!(matches!(err, MarisolError::InvalidConfig { .. }));
        assert!(slots.get(Area::TopLeft).is_none());

        slots.insert(Overlay::text("VERTRAULICH – ÄÖÜ", Area::TopLeft)).unwrap();
    }

    #[test]
    fn test_render_draws_each_overlay() {
        let mut slots = OverlaySlots::new(Overlay::numbering(Area::BottomRight));
        slots
            .insert(Overlay::text("CONFIDENTIAL", Area::TopLeft))
            .unwrap();

        let mut canvas = Canvas::new(612.0, 792.0);
        slots.render(&mut canvas, "ABC000001").unwrap();
        let content = canvas.finish().unwrap().content;
        let content = String::from_utf8_lossy(&content);

        assert!(content.contains("(ABC000001) Tj"));
        assert!(content.contains("(CONFIDENTIAL) Tj"));
    }
}
