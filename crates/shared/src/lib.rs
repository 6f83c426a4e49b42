use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Angle added to the scene root's Y rotation on every frame tick while rotating (radians)
pub const ROTATION_STEP: f32 = 0.01;

/// Mesh name fragment (lowercase) that marks the garment mesh
pub const GARMENT_MESH_MARKER: &str = "object_9";

/// Material name fragment (lowercase) that marks the garment material group
pub const GARMENT_MATERIAL_MARKER: &str = "peoplecolors";

// ============================================================================
// Colors
// ============================================================================

/// An sRGB color with 8 bits per channel.
///
/// Parses from `#rrggbb`, `#rgb`, `rgb(r, g, b)` and the common CSS color names,
/// and serializes as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorValue {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorValue {
    pub const WHITE: ColorValue = ColorValue::rgb(255, 255, 255);
    pub const BLACK: ColorValue = ColorValue::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels normalized to 0.0..=1.0 (still sRGB encoded)
    pub fn to_rgb_f32(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Build from linear-light channels (glTF base color factors are linear).
    pub fn from_linear_f32(rgb: [f32; 3]) -> Self {
        fn encode(c: f32) -> u8 {
            let c = c.clamp(0.0, 1.0);
            let s = if c <= 0.003_130_8 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            };
            (s * 255.0).round() as u8
        }
        Self::rgb(encode(rgb[0]), encode(rgb[1]), encode(rgb[2]))
    }

    fn from_name(name: &str) -> Option<Self> {
        let rgb = match name {
            "white" => (255, 255, 255),
            "black" => (0, 0, 0),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "cyan" | "aqua" => (0, 255, 255),
            "magenta" | "fuchsia" => (255, 0, 255),
            "gray" | "grey" => (128, 128, 128),
            "silver" => (192, 192, 192),
            "maroon" => (128, 0, 0),
            "olive" => (128, 128, 0),
            "navy" => (0, 0, 128),
            "teal" => (0, 128, 128),
            "purple" => (128, 0, 128),
            "orange" => (255, 165, 0),
            "pink" => (255, 192, 203),
            "brown" => (165, 42, 42),
            _ => return None,
        };
        Some(Self::rgb(rgb.0, rgb.1, rgb.2))
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ColorValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();

        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| format!("Invalid hex color: {s}"));
        }

        if let Some(args) = text
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let channels: Vec<u8> = args
                .split(',')
                .map(|part| part.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .map_err(|e| format!("Invalid rgb() color {s}: {e}"))?;
            return match channels.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                _ => Err(format!("rgb() color needs 3 channels: {s}")),
            };
        }

        Self::from_name(&text).ok_or_else(|| format!("Unknown color: {s}"))
    }
}

fn parse_hex(hex: &str) -> Option<ColorValue> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(ColorValue::rgb(
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(ColorValue::rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

impl TryFrom<String> for ColorValue {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        value.to_hex()
    }
}

// ============================================================================
// Playback
// ============================================================================

/// What drives the model's motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// The first clip loops; the root rotation is frozen
    #[default]
    Animating,
    /// The clip is stopped; the root spins around Y on every tick
    Rotating,
}

impl PlaybackMode {
    pub fn from_rotating(rotating: bool) -> Self {
        if rotating {
            PlaybackMode::Rotating
        } else {
            PlaybackMode::Animating
        }
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self, PlaybackMode::Rotating)
    }
}

// ============================================================================
// Inspection
// ============================================================================

/// Serializable view of the viewer, used by the command protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSnapshot {
    pub pending_color: ColorValue,
    pub committed_color: ColorValue,
    pub rotating: bool,
    /// `None` until a model has been bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PlaybackMode>,
    pub model_loaded: bool,
    pub root_rotation_y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driven_clip: Option<String>,
    pub clip_playing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_long_and_short() {
        assert_eq!("#ff0000".parse::<ColorValue>().unwrap(), ColorValue::rgb(255, 0, 0));
        assert_eq!("#0F8".parse::<ColorValue>().unwrap(), ColorValue::rgb(0, 255, 136));
        assert_eq!(" #FFFFFF ".parse::<ColorValue>().unwrap(), ColorValue::WHITE);
    }

    #[test]
    fn test_parse_rgb_function() {
        let c: ColorValue = "rgb(12, 34, 56)".parse().unwrap();
        assert_eq!(c, ColorValue::rgb(12, 34, 56));
        assert!("rgb(1, 2)".parse::<ColorValue>().is_err());
        assert!("rgb(1, 2, 300)".parse::<ColorValue>().is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("white".parse::<ColorValue>().unwrap(), ColorValue::WHITE);
        assert_eq!("Grey".parse::<ColorValue>().unwrap(), ColorValue::rgb(128, 128, 128));
        assert!("not-a-color".parse::<ColorValue>().is_err());
    }

    #[test]
    fn test_invalid_hex() {
        assert!("#12345".parse::<ColorValue>().is_err());
        assert!("#gggggg".parse::<ColorValue>().is_err());
        assert!("#".parse::<ColorValue>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&ColorValue::rgb(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: ColorValue = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(back, ColorValue::rgb(255, 0, 0));
        assert!(serde_json::from_str::<ColorValue>("\"nope\"").is_err());
    }

    #[test]
    fn test_from_linear_endpoints() {
        assert_eq!(ColorValue::from_linear_f32([1.0, 1.0, 1.0]), ColorValue::WHITE);
        assert_eq!(ColorValue::from_linear_f32([0.0, 0.0, 0.0]), ColorValue::BLACK);
        // Linear 0.214 encodes close to sRGB 0.5
        let mid = ColorValue::from_linear_f32([0.214, 0.214, 0.214]);
        assert!((mid.r as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_playback_mode_from_flag() {
        assert_eq!(PlaybackMode::from_rotating(false), PlaybackMode::Animating);
        assert_eq!(PlaybackMode::from_rotating(true), PlaybackMode::Rotating);
        assert!(PlaybackMode::Rotating.is_rotating());
        assert_eq!(PlaybackMode::default(), PlaybackMode::Animating);
    }
}
