use serde::Deserialize as _;

use crate::foundation::error::{EmblemError, EmblemResult};

/// Fill color for background compositing.
///
/// Holds the normalized bare hex digit string: 3, 6, or 8 digits, lowercase,
/// no `#` marker. The named constants map to fixed digit strings
/// (`transparent` is the 8-digit `00000000`, `black`/`white` are the 3-digit
/// shorthands), so equality and hashing distinguish digit counts: `"000"` and
/// `"00000000"` are different values even though both paint transparent-free
/// black pixels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    pub fn transparent() -> Self {
        Self("00000000".to_string())
    }

    pub fn black() -> Self {
        Self("000".to_string())
    }

    pub fn white() -> Self {
        Self("fff".to_string())
    }

    /// Parse a named constant or a `#`-optional hex string.
    pub fn parse(value: &str) -> EmblemResult<Self> {
        match value {
            "transparent" => return Ok(Self::transparent()),
            "black" => return Ok(Self::black()),
            "white" => return Ok(Self::white()),
            _ => {}
        }
        let digits = value.strip_prefix('#').unwrap_or(value);
        if !matches!(digits.len(), 3 | 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EmblemError::config(format!("not a hex color: '{value}'")));
        }
        Ok(Self(digits.to_ascii_lowercase()))
    }

    /// The bare digit string, as stored.
    pub fn hex(&self) -> &str {
        &self.0
    }

    /// The `#`-prefixed form.
    pub fn css(&self) -> String {
        format!("#{}", self.0)
    }

    /// Expand to a concrete RGBA8 pixel. 3-digit shorthand doubles each
    /// digit; without an alpha pair the color is fully opaque.
    pub fn rgba8(&self) -> [u8; 4] {
        let b = self.0.as_bytes();
        match b.len() {
            3 => {
                let r = hex_nibble(b[0]);
                let g = hex_nibble(b[1]);
                let bl = hex_nibble(b[2]);
                [r << 4 | r, g << 4 | g, bl << 4 | bl, 255]
            }
            6 => [hex_pair(b, 0), hex_pair(b, 2), hex_pair(b, 4), 255],
            8 => [
                hex_pair(b, 0),
                hex_pair(b, 2),
                hex_pair(b, 4),
                hex_pair(b, 6),
            ],
            _ => unreachable!("normalized color is always 3/6/8 digits"),
        }
    }

    /// True unless an explicit alpha pair says otherwise.
    pub fn is_opaque(&self) -> bool {
        self.0.len() != 8 || self.0.ends_with("ff")
    }
}

fn hex_nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => unreachable!("normalized color digits are lowercase hex"),
    }
}

fn hex_pair(b: &[u8], at: usize) -> u8 {
    hex_nibble(b[at]) << 4 | hex_nibble(b[at + 1])
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
