use plotters::style::RGBColor;

/// Discrete color cycle assigned to groups in order.
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    /// The classic category-10 palette.
    pub fn category10() -> Self {
        Self {
            colors: vec![
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
                RGBColor(127, 127, 127),
                RGBColor(188, 189, 34),
                RGBColor(23, 190, 207),
            ],
        }
    }

    pub fn color(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }
}

/// Parse a color name or "#rrggbb" hex string, falling back when unknown.
pub fn parse_color(color_str: &Option<String>, fallback: RGBColor) -> RGBColor {
    match color_str.as_deref() {
        Some("red") => RGBColor(255, 0, 0),
        Some("green") => RGBColor(0, 255, 0),
        Some("blue") => RGBColor(0, 0, 255),
        Some("black") => RGBColor(0, 0, 0),
        Some("yellow") => RGBColor(255, 255, 0),
        Some("cyan") => RGBColor(0, 255, 255),
        Some("magenta") => RGBColor(255, 0, 255),
        Some("white") => RGBColor(255, 255, 255),
        Some(s) => parse_hex(s).unwrap_or(fallback),
        None => fallback,
    }
}

fn parse_hex(s: &str) -> Option<RGBColor> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(RGBColor(r, g, b))
}
