// Color palettes for categorical data, and color string parsing

use plotters::style::RGBColor;

/// Color palette for categorical data
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<String>,
}

impl ColorPalette {
    /// Build a palette from explicit colors. An empty list yields `None`.
    pub fn new(colors: Vec<String>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(ColorPalette { colors })
        }
    }

    /// Navy, orange and crimson: the post-type palette
    pub fn post_types() -> Self {
        ColorPalette {
            colors: vec![
                "#003366".to_string(),
                "#ff7f0e".to_string(),
                "#dc143c".to_string(),
            ],
        }
    }

    /// Create a Category10 color palette (D3-inspired)
    pub fn category10() -> Self {
        ColorPalette {
            colors: [
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
                "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }

    /// Built-in palette by name: `category10` or `post_types`
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "category10" => Some(Self::category10()),
            "post_types" => Some(Self::post_types()),
            _ => None,
        }
    }

    /// Get color for a specific index (wraps around if index > palette size)
    pub fn get_color(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::post_types()
    }
}

/// Parse a color string into RGBColor, supporting hex (#RRGGBB, #RGB) and named colors
pub fn parse_color(color_str: &str) -> Option<RGBColor> {
    let color_str = color_str.trim();

    if color_str.starts_with('#') {
        return parse_hex_color(color_str);
    }

    match color_str.to_lowercase().as_str() {
        "white" => Some(RGBColor(255, 255, 255)),
        "black" => Some(RGBColor(0, 0, 0)),
        "red" => Some(RGBColor(255, 0, 0)),
        "green" => Some(RGBColor(0, 128, 0)),
        "blue" => Some(RGBColor(0, 0, 255)),
        "orange" => Some(RGBColor(255, 165, 0)),
        "crimson" => Some(RGBColor(220, 20, 60)),
        "navy" => Some(RGBColor(0, 0, 128)),
        "cadetblue" => Some(RGBColor(95, 158, 160)),
        "cornsilk" => Some(RGBColor(255, 248, 220)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        "lightgray" | "lightgrey" => Some(RGBColor(211, 211, 211)),
        _ => None,
    }
}

/// Parse hex color (#RRGGBB or #RGB)
fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_type_palette() {
        let palette = ColorPalette::post_types();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.get_color(0), "#003366");
        assert_eq!(palette.get_color(2), "#dc143c");
        // Wraps around
        assert_eq!(palette.get_color(3), "#003366");
    }

    #[test]
    fn test_category10_wraps() {
        let palette = ColorPalette::category10();
        assert_eq!(palette.get_color(0), "#1f77b4");
        assert_eq!(palette.get_color(10), "#1f77b4");
        assert_eq!(palette.get_color(11), "#ff7f0e");
    }

    #[test]
    fn test_named_palettes() {
        assert_eq!(ColorPalette::named("category10"), Some(ColorPalette::category10()));
        assert_eq!(ColorPalette::named("post_types"), Some(ColorPalette::post_types()));
        assert_eq!(ColorPalette::named("#003366"), None);
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(ColorPalette::new(vec![]).is_none());
        let custom = ColorPalette::new(vec!["red".to_string()]).unwrap();
        assert_eq!(custom.get_color(5), "red");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_color("#003366"), Some(RGBColor(0, 51, 102)));
        assert_eq!(parse_color("#f00"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_named_color() {
        assert_eq!(parse_color("CadetBlue"), Some(RGBColor(95, 158, 160)));
        assert_eq!(parse_color(" red "), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_color("not-a-color"), None);
    }
}
