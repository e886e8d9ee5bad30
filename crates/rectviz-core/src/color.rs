use crate::steps::{TraitKey, Traits};

/// RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 0.5, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert hue/saturation/value (all in `[0, 1]`) to an opaque color.
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * f);
        let t = value * (1.0 - saturation * (1.0 - f));
        let (r, g, b) = match sector as u8 {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// `#rrggbb`, or `none` for a fully transparent color. Alpha is emitted
    /// separately as an opacity attribute.
    pub fn to_svg(&self) -> String {
        if self.is_transparent() {
            return "none".to_string();
        }
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// A color picked for one item out of a set, with the HSV inputs kept so
/// callers can inspect the spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistinctColor {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
    pub color: Color,
}

/// `n` colors whose hues are evenly spaced over `[0, 1)`. Odd indices get a
/// slightly lower saturation and value so neighbours stay apart.
pub fn generate_distinct_colors(n: usize) -> Vec<DistinctColor> {
    (0..n)
        .map(|i| {
            let hue = i as f64 / n as f64;
            let (saturation, value) = if i % 2 == 0 { (1.0, 1.0) } else { (0.8, 0.85) };
            DistinctColor {
                hue,
                saturation,
                value,
                color: Color::from_hsv(hue, saturation, value),
            }
        })
        .collect()
}

/// Light blue base fill for a step rectangle, tinted red when the area is
/// known and green when the perimeter is known.
pub fn rectangle_tint(traits: &Traits) -> Color {
    let (mut r, mut g, mut b) = (0.8_f64, 0.8_f64, 1.0_f64);
    if traits.contains(&TraitKey::Area) {
        r = (r + 0.2).min(1.0);
        b = (b - 0.1).max(0.7);
    }
    if traits.contains(&TraitKey::Perimeter) {
        g = (g + 0.2).min(1.0);
        b = (b - 0.1).max(0.7);
    }
    Color::rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::TraitValue;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_distinct_hues_evenly_spaced() {
        let colors = generate_distinct_colors(4);
        assert_eq!(colors.len(), 4);
        let hues: Vec<f64> = colors.iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![0.0, 0.25, 0.5, 0.75]);
        assert!(hues.iter().all(|h| (0.0..1.0).contains(h)));
        assert!(generate_distinct_colors(0).is_empty());
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(Color::from_hsv(0.0, 1.0, 1.0), Color::rgb(1.0, 0.0, 0.0));
        let green = Color::from_hsv(1.0 / 3.0, 1.0, 1.0);
        assert!(close(green.r, 0.0) && close(green.g, 1.0) && close(green.b, 0.0));
        let blue = Color::from_hsv(2.0 / 3.0, 1.0, 1.0);
        assert!(close(blue.r, 0.0) && close(blue.g, 0.0) && close(blue.b, 1.0));
    }

    #[test]
    fn test_svg_hex() {
        assert_eq!(Color::rgb(1.0, 0.5, 0.0).to_svg(), "#ff8000");
        assert_eq!(Color::TRANSPARENT.to_svg(), "none");
    }

    #[test]
    fn test_rectangle_tint() {
        let mut traits = Traits::default();
        assert_eq!(rectangle_tint(&traits), Color::rgb(0.8, 0.8, 1.0));

        traits.insert(TraitKey::Area, TraitValue::Single(12.0));
        let tinted = rectangle_tint(&traits);
        assert!(close(tinted.r, 1.0) && close(tinted.g, 0.8) && close(tinted.b, 0.9));

        traits.insert(TraitKey::Perimeter, TraitValue::Single(14.0));
        let both = rectangle_tint(&traits);
        assert!(close(both.r, 1.0) && close(both.g, 1.0) && close(both.b, 0.8));
    }
}
