//! Trace records: one named data series plus how it should be drawn.
//!
//! A [`Trace`] is a plain value object. It knows nothing about plotly; the
//! mapping onto `plotly::Scatter` lives in [`crate::render`].
use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{PlotError, Result};
use crate::table::Table;

/// Horizontal coordinates of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XValues {
    Numeric(Vec<f64>),
    Temporal(Vec<NaiveDateTime>),
}

impl XValues {
    pub fn len(&self) -> usize {
        match self {
            XValues::Numeric(v) => v.len(),
            XValues::Temporal(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values, or `None` for a temporal axis.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            XValues::Numeric(v) => Some(v),
            XValues::Temporal(_) => None,
        }
    }
}

impl From<Vec<f64>> for XValues {
    fn from(values: Vec<f64>) -> Self {
        XValues::Numeric(values)
    }
}

impl From<Vec<NaiveDateTime>> for XValues {
    fn from(values: Vec<NaiveDateTime>) -> Self {
        XValues::Temporal(values)
    }
}

/// Area fill, named after the plotly `fill` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    ToZeroY,
    ToZeroX,
    ToNextY,
    ToNextX,
    ToSelf,
    ToNext,
}

impl FromStr for FillMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tozeroy" => Ok(FillMode::ToZeroY),
            "tozerox" => Ok(FillMode::ToZeroX),
            "tonexty" => Ok(FillMode::ToNextY),
            "tonextx" => Ok(FillMode::ToNextX),
            "toself" => Ok(FillMode::ToSelf),
            "tonext" => Ok(FillMode::ToNext),
            _ => Err(format!("Unknown fill mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Lines,
    Markers,
    LinesMarkers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Solid,
    Dot,
    Dash,
    LongDash,
    DashDot,
}

impl FromStr for Dash {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "solid" => Ok(Dash::Solid),
            "dot" => Ok(Dash::Dot),
            "dash" => Ok(Dash::Dash),
            "longdash" => Ok(Dash::LongDash),
            "dashdot" => Ok(Dash::DashDot),
            _ => Err(format!("Unknown dash pattern: {}", s)),
        }
    }
}

/// Optional per-trace style overrides. The default overrides nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceStyle {
    pub color: Option<String>,
    pub dash: Option<Dash>,
    pub width: Option<f64>,
}

impl TraceStyle {
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_dash(mut self, dash: Dash) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.dash.is_none() && self.width.is_none()
    }
}

/// One renderable data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub x: XValues,
    pub y: Vec<f64>,
    /// Legend label, and axis title when the trace owns a panel axis.
    pub name: String,
    pub fill: Option<FillMode>,
    pub mode: RenderMode,
    /// Per-point labels, one per y value.
    pub text: Option<Vec<String>>,
    pub style: TraceStyle,
}

impl Trace {
    /// A lines trace with no fill, labels or style overrides.
    pub fn new(x: impl Into<XValues>, y: Vec<f64>, name: impl Into<String>) -> Result<Self> {
        let x = x.into();
        if x.len() != y.len() {
            return Err(PlotError::invalid_input(format!(
                "x and y must have the same length (got {} and {})",
                x.len(),
                y.len()
            )));
        }

        Ok(Self {
            x,
            y,
            name: name.into(),
            fill: None,
            mode: RenderMode::default(),
            text: None,
            style: TraceStyle::default(),
        })
    }

    pub fn with_fill(mut self, fill: Option<FillMode>) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_style(mut self, style: TraceStyle) -> Self {
        self.style = style;
        self
    }

    /// Attach per-point labels; there must be exactly one per point.
    pub fn with_text(mut self, text: Option<Vec<String>>) -> Result<Self> {
        if let Some(labels) = &text {
            if labels.len() != self.y.len() {
                return Err(PlotError::invalid_input(format!(
                    "trace '{}' has {} points but {} text labels",
                    self.name,
                    self.y.len(),
                    labels.len()
                )));
            }
        }
        self.text = text;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Either a single item or a list of them, normalised with [`OneOrMany::into_vec`].
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl From<Trace> for OneOrMany<Trace> {
    fn from(trace: Trace) -> Self {
        OneOrMany::One(trace)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// Build a trace with every attribute spelled out.
///
/// # Arguments
///
/// * `x` - Horizontal coordinates, numeric or temporal.
/// * `y` - Values, same length as `x`.
/// * `name` - Legend label and axis title.
/// * `fill` - Optional area fill.
/// * `mode` - Lines or markers.
/// * `text` - Optional per-point labels.
/// * `style` - Style overrides; pass `TraceStyle::default()` for none.
pub fn build_trace(
    x: impl Into<XValues>,
    y: Vec<f64>,
    name: &str,
    fill: Option<FillMode>,
    mode: RenderMode,
    text: Option<Vec<String>>,
    style: TraceStyle,
) -> Result<Trace> {
    Trace::new(x, y, name)?
        .with_fill(fill)
        .with_mode(mode)
        .with_style(style)
        .with_text(text)
}

/// One lines trace per table column, in column order.
///
/// The table index becomes `x`, the column values `y` and the column name
/// the trace name. Fill modes are looked up by column name.
pub fn build_traces_from_table(
    table: &Table,
    fill_by_name: &HashMap<String, FillMode>,
) -> Vec<Trace> {
    table
        .columns()
        .map(|(name, values)| Trace {
            x: table.index().clone(),
            y: values.to_vec(),
            name: name.to_string(),
            fill: fill_by_name.get(name).copied(),
            mode: RenderMode::Lines,
            text: None,
            style: TraceStyle::default(),
        })
        .collect()
}
