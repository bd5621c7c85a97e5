//! Camera angles of the product mockup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed camera angle of the product.
///
/// Every layer lives on exactly one view of one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Straight-on front panel.
    Front,
    /// Rear panel.
    Back,
    /// Left side panel.
    Left,
    /// Right side panel.
    Right,
    /// Crown seen from above.
    Top,
}

impl View {
    /// All views in display order.
    pub const ALL: [View; 5] = [View::Front, View::Back, View::Left, View::Right, View::Top];

    /// Wire name of the view.
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Front => "front",
            View::Back => "back",
            View::Left => "left",
            View::Right => "right",
            View::Top => "top",
        }
    }

    /// Human readable label used by view captions.
    pub fn label(&self) -> &'static str {
        match self {
            View::Front => "Front",
            View::Back => "Back",
            View::Left => "Left",
            View::Right => "Right",
            View::Top => "Top",
        }
    }
}

impl Default for View {
    fn default() -> Self {
        View::Front
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(View::Front),
            "back" => Ok(View::Back),
            "left" => Ok(View::Left),
            "right" => Ok(View::Right),
            "top" => Ok(View::Top),
            other => Err(format!("unknown view '{}'", other)),
        }
    }
}
