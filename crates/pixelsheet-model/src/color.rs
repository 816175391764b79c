use core::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A fully opaque RGB color.
///
/// Serialized as six lowercase hex digits (`"ff0000"`), the same form the
/// exported worksheet uses for cell fills: each channel independently
/// zero-padded to two digits, no leading `#`, no alpha.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Exactly six lowercase hex digits, two per channel.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `"rrggbb"` (case-insensitive, optional leading `#`).
    ///
    /// Eight digits are accepted as ARGB with the alpha byte dropped, since
    /// most spreadsheet writers emit `fgColor` that way.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let rgb = match s.len() {
            6 => s,
            8 => &s[2..],
            _ => return None,
        };
        let channel = |range: core::ops::Range<usize>| u8::from_str_radix(rgb.get(range)?, 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(s.trim())
            .ok_or_else(|| D::Error::custom("color must be an rrggbb hex string (6 hex digits)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_channel_value_pads_to_two_digits() {
        // The boundary values around the one-digit/two-digit switch.
        for value in [0u8, 1, 15, 16, 255] {
            assert_eq!(Rgb::new(value, 0, 0).to_hex().len(), 6);
            assert_eq!(Rgb::new(0, value, 0).to_hex().len(), 6);
            assert_eq!(Rgb::new(0, 0, value).to_hex().len(), 6);
        }
        assert_eq!(Rgb::new(0, 1, 15).to_hex(), "00010f");
        assert_eq!(Rgb::new(16, 255, 0).to_hex(), "10ff00");
    }

    #[test]
    fn hex_is_lowercase() {
        assert_eq!(Rgb::new(255, 0, 0).to_hex(), "ff0000");
        assert_eq!(Rgb::white().to_hex(), "ffffff");
    }

    #[test]
    fn parses_six_and_eight_digit_forms() {
        assert_eq!(Rgb::from_hex("ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("#FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("FFff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("ff80"), None);
        assert_eq!(Rgb::from_hex("gg0000"), None);
    }

    #[test]
    fn serde_round_trips_through_the_hex_string() {
        let color = Rgb::new(18, 52, 86);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"123456\"");
        assert_eq!(serde_json::from_str::<Rgb>(&json).unwrap(), color);
    }

    proptest::proptest! {
        #[test]
        fn hex_round_trips(r: u8, g: u8, b: u8) {
            let color = Rgb::new(r, g, b);
            let hex = color.to_hex();
            proptest::prop_assert_eq!(hex.len(), 6);
            proptest::prop_assert_eq!(Rgb::from_hex(&hex), Some(color));
        }
    }
}
