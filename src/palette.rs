// Deterministic color allocation for chart categories

/// Opacity of the first translucent cycle
const START_OPACITY: f64 = 0.7;
/// Opacity lost on every full cycle through the base colors
const OPACITY_STEP: f64 = 0.15;
const MIN_OPACITY: f64 = 0.1;

/// Color palette for categorical data
pub struct ColorPalette {
    colors: Vec<String>,
}

impl ColorPalette {
    /// The ten base colors: blue, purple, teal, green, amber, red, pink,
    /// indigo, orange, violet
    pub fn base() -> Self {
        ColorPalette {
            colors: vec![
                "#3B82F6".to_string(),
                "#8B5CF6".to_string(),
                "#14B8A6".to_string(),
                "#22C55E".to_string(),
                "#F59E0B".to_string(),
                "#EF4444".to_string(),
                "#EC4899".to_string(),
                "#6366F1".to_string(),
                "#F97316".to_string(),
                "#A855F7".to_string(),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for a specific index.
    ///
    /// Indices inside the palette get the base color. Past it, the base colors
    /// repeat as `rgba(...)` with opacity lowered by one step per full cycle.
    pub fn get_color(&self, index: usize) -> String {
        let n = self.colors.len();
        if index < n {
            return self.colors[index].clone();
        }

        let base = &self.colors[index % n];
        let cycle = (index / n) as f64;
        let opacity = (START_OPACITY - cycle * OPACITY_STEP).max(MIN_OPACITY);
        match hex_to_rgb(base) {
            Some((r, g, b)) => format!("rgba({}, {}, {}, {:.2})", r, g, b, opacity),
            None => base.clone(),
        }
    }

    /// `count` colors, in order
    pub fn colors(&self, count: usize) -> Vec<String> {
        (0..count).map(|i| self.get_color(i)).collect()
    }
}

/// `count` colors from the base palette.
pub fn colors(count: usize) -> Vec<String> {
    ColorPalette::base().colors(count)
}

/// Parse `#RRGGBB` into its channels.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Parse either `#RRGGBB` or `rgba(r, g, b, a)` into channels and opacity.
pub fn parse_color(color: &str) -> Option<(u8, u8, u8, f64)> {
    if let Some((r, g, b)) = hex_to_rgb(color) {
        return Some((r, g, b, 1.0));
    }
    let inner = color.strip_prefix("rgba(")?.strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [r, g, b, a] => Some((r.parse().ok()?, g.parse().ok()?, b.parse().ok()?, a.parse().ok()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_palette() {
        let palette = ColorPalette::base();
        assert_eq!(palette.len(), 10);
        assert_eq!(palette.get_color(0), "#3B82F6");
        assert_eq!(palette.get_color(9), "#A855F7");
    }

    #[test]
    fn test_colors_small_count() {
        assert_eq!(colors(0), Vec::<String>::new());
        assert_eq!(colors(3), vec!["#3B82F6", "#8B5CF6", "#14B8A6"]);
        assert_eq!(colors(10), ColorPalette::base().colors);
    }

    #[test]
    fn test_colors_beyond_palette() {
        let result = colors(12);
        assert_eq!(result.len(), 12);
        assert_eq!(&result[..10], ColorPalette::base().colors.as_slice());
        assert_eq!(result[10], "rgba(59, 130, 246, 0.55)");
        assert_eq!(result[11], "rgba(139, 92, 246, 0.55)");
        for color in &result[10..] {
            let (_, _, _, alpha) = parse_color(color).unwrap();
            assert!(alpha < 0.7);
        }
    }

    #[test]
    fn test_opacity_drops_each_cycle() {
        let result = colors(31);
        assert_eq!(result[20], "rgba(59, 130, 246, 0.40)");
        assert_eq!(result[30], "rgba(59, 130, 246, 0.25)");
    }

    #[test]
    fn test_opacity_floor() {
        let palette = ColorPalette::base();
        assert_eq!(palette.get_color(100), "rgba(59, 130, 246, 0.10)");
    }

    #[test]
    fn test_colors_are_deterministic() {
        assert_eq!(colors(25), colors(25));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF0080"), Some((255, 0, 128, 1.0)));
        assert_eq!(parse_color("rgba(1, 2, 3, 0.55)"), Some((1, 2, 3, 0.55)));
        assert_eq!(parse_color("blue"), None);
        assert_eq!(hex_to_rgb("#12345"), None);
    }
}
