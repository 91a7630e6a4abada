use anyhow::Result;
use palette::Srgb;
use serde::{Deserialize, Serialize};

/// An 8-bit RGB color as handed to renderers.
pub type Rgb8 = [u8; 3];

/// Built-in color themes agents draw their colors from.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Default,
    Neon,
    Purple,
    Fire,
    Bright,
    Christmas,
}

impl ColorTheme {
    /// Hex codes making up the theme.
    pub fn hex_codes(self) -> &'static [&'static str] {
        match self {
            ColorTheme::Default => &["#558cf4"],
            ColorTheme::Neon => &["#ff1e76", "#4280ff", "#31dab7", "#0af9fe", "#3202c5"],
            ColorTheme::Purple => &["#440099", "#ffffff", "#ece6f5", "#c7b3e0", "#8f66c2"],
            ColorTheme::Fire => &["#ffff00", "#ffcc00", "#ff9900", "#ff6600", "#ff3300"],
            ColorTheme::Bright => &["#8582f2", "#eff282", "#f282d9", "#acf282", "#f2b182"],
            ColorTheme::Christmas => &["#d4af37", "#aaa9ad", "#f3f6f4", "#cc0000", "#274e13"],
        }
    }

    pub fn colors(self) -> Vec<Rgb8> {
        self.hex_codes()
            .iter()
            // Built-in codes are well formed.
            .filter_map(|code| parse_color(code).ok())
            .collect()
    }
}

/// How colors are assigned to newly seeded agents.
#[derive(Debug, Clone, PartialEq)]
pub enum Coloring {
    /// Each agent picks uniformly at random from the palette.
    Palette(Vec<Rgb8>),
    /// Every agent gets the same color.
    Fixed(Rgb8),
}

/// Parses `#rrggbb`, `#rgb` (leading `#` optional) or an SVG color name such as `"red"`.
/// Surrounding whitespace is ignored.
pub fn parse_color(code: &str) -> Result<Rgb8> {
    let trimmed = code.trim();
    if let Some(named) = palette::named::from_str(&trimmed.to_ascii_lowercase()) {
        let (r, g, b) = named.into_components();
        return Ok([r, g, b]);
    }
    let rgb: Srgb<u8> = trimmed
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid color '{}': {}", code, e))?;
    let (r, g, b) = rgb.into_components();
    Ok([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_stray_whitespace() {
        assert_eq!(parse_color("\t#8f66c2").unwrap(), [0x8f, 0x66, 0xc2]);
        assert_eq!(parse_color("558cf4").unwrap(), [0x55, 0x8c, 0xf4]);
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!(parse_color("red").unwrap(), [255, 0, 0]);
        assert_eq!(parse_color("White").unwrap(), [255, 255, 255]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_color("#zzzzzz").is_err());
        assert!(parse_color("not-a-color").is_err());
    }

    #[test]
    fn every_builtin_theme_parses_fully() {
        for theme in [
            ColorTheme::Default,
            ColorTheme::Neon,
            ColorTheme::Purple,
            ColorTheme::Fire,
            ColorTheme::Bright,
            ColorTheme::Christmas,
        ] {
            assert_eq!(theme.colors().len(), theme.hex_codes().len(), "{:?}", theme);
        }
    }
}
