/// 8-bit RGB colour. Opacity travels separately with each draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const GOLD: Rgb = Rgb(0xff, 0xcc, 0x00);
pub const ROSE: Rgb = Rgb(0xff, 0x33, 0x66);
pub const PINK: Rgb = Rgb(0xff, 0x66, 0x99);

impl Rgb {
    /// Converts HSL (hue in degrees, saturation and lightness in 0..=1).
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = lightness - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Rgb(
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8,
        )
    }

    /// Parses `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Rgb(r, g, b))
    }

    /// Linear interpolation towards `other`, `t` clamped to 0..=1.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb(255, 0, 0));
        assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb(0, 0, 255));
        assert_eq!(Rgb::from_hsl(360.0, 1.0, 0.5), Rgb(255, 0, 0));
    }

    #[test]
    fn firework_lightness_is_bright() {
        // hsl(h, 100%, 60%) never drops a channel below 51
        for hue in (0..360).step_by(15) {
            let c = Rgb::from_hsl(hue as f32, 1.0, 0.6);
            assert_eq!(c.0.max(c.1).max(c.2), 255);
            assert!(c.0.min(c.1).min(c.2) >= 51);
        }
    }

    #[test]
    fn parses_hex() {
        assert_eq!(Rgb::from_hex("1a1b26"), Some(Rgb(0x1a, 0x1b, 0x26)));
        assert_eq!(Rgb::from_hex("#ff3366"), Some(ROSE));
        assert_eq!(Rgb::from_hex("ff336"), None);
        assert_eq!(Rgb::from_hex("gg0000"), None);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(PINK.lerp(ROSE, 0.0), PINK);
        assert_eq!(PINK.lerp(ROSE, 1.0), ROSE);
        assert_eq!(BLACK.lerp(WHITE, 2.0), WHITE);
    }
}
