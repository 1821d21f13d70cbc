use egui::Color32;
use image::Rgba;

use crate::error::{EditorError, EditorResult};

/// Which color a picker edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Background,
    Stroke,
}

/// Unmultiplied sRGBA, exactly as entered
pub type Rgba8 = Rgba<u8>;

pub const BLACK: Rgba8 = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba8 = Rgba([255, 255, 255, 255]);

/// A concrete RGBA color or the "transparent" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Solid(Rgba8),
    Transparent,
}

impl Fill {
    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or the literal `transparent`.
    pub fn parse(input: &str) -> EditorResult<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }

        let invalid = || EditorError::InvalidColor(input.to_owned());
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        let rgba = match hex.len() {
            3 => [nibble(0), nibble(1), nibble(2), Ok(255)],
            4 => [nibble(0), nibble(1), nibble(2), nibble(3)],
            6 => [byte(0), byte(2), byte(4), Ok(255)],
            8 => [byte(0), byte(2), byte(4), byte(6)],
            _ => return Err(invalid()),
        };
        let [r, g, b, a] = rgba.map(|c| c.map_err(|_| invalid()));
        Ok(Self::Solid(Rgba([r?, g?, b?, a?])))
    }

    /// Color to paint with; the sentinel paints nothing
    pub fn rgba(self) -> Rgba8 {
        match self {
            Self::Solid(color) => color,
            Self::Transparent => Rgba([0, 0, 0, 0]),
        }
    }

    /// For egui widgets and painting only. Premultiplies, so translucent
    /// colors do not survive a round trip through it.
    pub fn to_color32(self) -> Color32 {
        to_color32(self.rgba())
    }

    pub fn from_color32(color: Color32) -> Self {
        Self::Solid(Rgba(color.to_srgba_unmultiplied()))
    }

    pub fn to_hex(self) -> String {
        match self {
            Self::Solid(Rgba([r, g, b, a])) => {
                if a == 255 {
                    format!("#{r:02x}{g:02x}{b:02x}")
                } else {
                    format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
                }
            }
            Self::Transparent => "transparent".to_owned(),
        }
    }
}

/// Stroke and background colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorState {
    pub stroke: Fill,
    pub background: Fill,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            stroke: Fill::Solid(BLACK),
            background: Fill::Transparent,
        }
    }
}

impl ColorState {
    pub fn get(&self, target: ColorTarget) -> Fill {
        match target {
            ColorTarget::Background => self.background,
            ColorTarget::Stroke => self.stroke,
        }
    }

    /// Returns a new state with `target` replaced, leaving `self` untouched
    #[must_use]
    pub fn with_fill(self, target: ColorTarget, fill: Fill) -> Self {
        match target {
            ColorTarget::Background => Self { background: fill, ..self },
            ColorTarget::Stroke => Self { stroke: fill, ..self },
        }
    }

    /// Parses `input` first so a bad hex string never half-applies
    pub fn with_hex(self, target: ColorTarget, input: &str) -> EditorResult<Self> {
        let fill = Fill::parse(input)?;
        Ok(self.with_fill(target, fill))
    }
}

pub fn to_color32(Rgba([r, g, b, a]): Rgba8) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long_hex() {
        assert_eq!(Fill::parse("#000").unwrap(), Fill::Solid(BLACK));
        assert_eq!(Fill::parse("#ff8000").unwrap(), Fill::Solid(Rgba([255, 128, 0, 255])));
        assert_eq!(Fill::parse("#f008").unwrap(), Fill::Solid(Rgba([255, 0, 0, 136])));
        assert_eq!(Fill::parse(" Transparent ").unwrap(), Fill::Transparent);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "000", "#12", "#12345", "#gggggg", "red", "#ffé"] {
            assert!(
                matches!(Fill::parse(bad), Err(EditorError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(Fill::Solid(Rgba([1, 2, 3, 255])).to_hex(), "#010203");
        assert_eq!(Fill::Transparent.to_hex(), "transparent");
    }

    #[test]
    fn test_translucent_hex_survives_parse() {
        for hex in ["#10203040", "#12345602", "#ffffff01", "#00000000"] {
            assert_eq!(Fill::parse(hex).unwrap().to_hex(), hex);
        }
        assert_eq!(
            Fill::parse("#12345602").unwrap(),
            Fill::Solid(Rgba([0x12, 0x34, 0x56, 0x02]))
        );
    }

    #[test]
    fn test_with_hex_is_all_or_nothing() {
        let colors = ColorState::default();
        assert!(colors.with_hex(ColorTarget::Stroke, "#nope").is_err());
        assert_eq!(colors, ColorState::default());

        let updated = colors.with_hex(ColorTarget::Background, "#fff").unwrap();
        assert_eq!(updated.background, Fill::Solid(WHITE));
        assert_eq!(updated.stroke, colors.stroke);
    }
}
