use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Options for [`crate::layout::compose_stacked`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StackedOptions {
    pub title: Option<String>,
    /// Figure height contributed by each panel, in pixels.
    pub height_per_panel: usize,
    #[serde(flatten)]
    pub overrides: SubplotOverrides,
}

impl Default for StackedOptions {
    fn default() -> Self {
        Self {
            title: None,
            height_per_panel: 200,
            overrides: SubplotOverrides::default(),
        }
    }
}

impl StackedOptions {
    pub fn new(title: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            ..Self::default()
        }
    }
}

/// Extra subplot grid settings passed through to the layout.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SubplotOverrides {
    /// Gap between panels as a fraction of the plot height.
    pub vertical_spacing: Option<f64>,
    /// Relative panel heights, top to bottom.
    pub row_heights: Option<Vec<f64>>,
}

/// Options for [`crate::layout::compose_scatter`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScatterOptions {
    pub title: Option<String>,
    /// Append a dashed y = x reference line.
    pub identity: bool,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Width and height of the square figure, in pixels.
    pub size: usize,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            title: None,
            identity: false,
            x_label: None,
            y_label: None,
            size: 800,
        }
    }
}

/// Options for [`crate::stats::bland_altman`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AgreementOptions {
    /// Legend label of the mean/difference scatter.
    pub name: Option<String>,
    /// Per-row labels shown on hover.
    pub text: Option<Vec<String>>,
    pub title: Option<String>,
}

/// How [`crate::layout::panel_entries`] pairs traces into panels.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// One panel per trace, no secondary axis.
    #[default]
    Alone,
    /// One panel per trace, each repeating the same secondary traces.
    #[serde(rename = "repeat_sec")]
    RepeatSecondary,
}

impl FromStr for PairingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alone" => Ok(PairingMode::Alone),
            "repeat_sec" | "repeat_secondary" => Ok(PairingMode::RepeatSecondary),
            _ => Err(format!(
                "Unknown pairing mode: {}. Expected `alone` or `repeat_sec`",
                s
            )),
        }
    }
}
