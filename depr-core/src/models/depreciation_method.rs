use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepreciationMethod {
    /// Percentage-of-basis tables with the convention baked into the rates.
    #[default]
    Macrs,
    /// Even amount per year over the nominal recovery life.
    StraightLine,
}

impl DepreciationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Macrs => "macrs",
            Self::StraightLine => "straight-line",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "macrs" | "MACRS" => Some(Self::Macrs),
            "straight-line" | "straight_line" | "sl" => Some(Self::StraightLine),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Macrs => "MACRS",
            Self::StraightLine => "Straight-Line",
        }
    }
}
