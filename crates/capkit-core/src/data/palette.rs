//! Print-safe text colors.
//!
//! Text is printed with a fixed set of reflective inks. Any text layer
//! committed to an order must use one of these hex values.

use serde::{Deserialize, Serialize};

/// One printable ink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintColor {
    pub label: String,
    pub hex: String,
}

impl PrintColor {
    pub fn new(label: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hex: hex.into(),
        }
    }
}

const STOCK_INKS: [(&str, &str); 24] = [
    ("Reflective Black", "#2E2F38"),
    ("Reflective Dark Gray", "#5C5A64"),
    ("Reflective Royal Blue", "#434B91"),
    ("Reflective Yellow", "#FFBB55"),
    ("Reflective Green", "#277664"),
    ("Reflective White", "#EBF0F1"),
    ("Reflective Red", "#D03340"),
    ("Reflective Gold", "#9C7F5A"),
    ("Reflective Blue", "#4E7FAA"),
    ("Reflective Sky Blue", "#A6D9F7"),
    ("Reflective Orange", "#BC422D"),
    ("Reflective Violet", "#4F2463"),
    ("Reflective Brown", "#5C3C16"),
    ("Reflective Clear", "#F6F7F1"),
    ("Reflective Neon Red", "#FF4545"),
    ("Reflective Banana", "#FFA833"),
    ("Reflective Red Orange", "#F13021"),
    ("Reflective Neon Pink", "#FA4D68"),
    ("Reflective Neon Yellow", "#F8F646"),
    ("Reflective Neon Green", "#47F154"),
    ("Reflective Neon Orange", "#FF8440"),
    ("Reflective Snow White", "#F5EEF2"),
    ("Reflective Gray", "#BDBCC5"),
    ("Reflective Dark Navy", "#252A52"),
];

/// Ordered set of printable inks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintPalette {
    colors: Vec<PrintColor>,
}

impl Default for PrintPalette {
    fn default() -> Self {
        Self {
            colors: STOCK_INKS
                .iter()
                .map(|(label, hex)| PrintColor::new(*label, *hex))
                .collect(),
        }
    }
}

impl PrintPalette {
    /// Palette with custom inks; an empty list falls back to the stock inks.
    pub fn new(colors: Vec<PrintColor>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }

    pub fn colors(&self) -> &[PrintColor] {
        &self.colors
    }

    /// Whether `color` is one of the inks, ignoring case and surrounding blanks.
    pub fn is_allowed(&self, color: &str) -> bool {
        let wanted = normalize_hex(color);
        !wanted.is_empty() && self.colors.iter().any(|c| normalize_hex(&c.hex) == wanted)
    }

    /// `color` when allowed, otherwise the first ink.
    pub fn normalize<'a>(&'a self, color: Option<&'a str>) -> &'a str {
        match color {
            Some(c) if self.is_allowed(c) => c,
            _ => self.fallback(),
        }
    }

    /// First ink of the palette.
    pub fn fallback(&self) -> &str {
        self.colors.first().map(|c| c.hex.as_str()).unwrap_or("#2E2F38")
    }
}

fn normalize_hex(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}
