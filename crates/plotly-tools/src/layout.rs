//! Layout composition: stacked panels sharing a time axis, and square
//! scatter panels.
//!
//! Composers only build a [`Figure`]; nothing here touches plotly.
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{PairingMode, ScatterOptions, StackedOptions, SubplotOverrides};
use crate::error::{PlotError, Result};
use crate::trace::{Dash, OneOrMany, RenderMode, Trace, TraceStyle};

/// Title of the shared x axis on the bottom panel of a stacked figure.
pub const STACKED_X_TITLE: &str = "time";

pub const IDENTITY_NAME: &str = "Identity";

/// One row of a stacked figure before composition.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelEntry {
    pub primary: Vec<Trace>,
    /// Drawn against a second y axis of the same panel.
    pub secondary: Option<Vec<Trace>>,
}

impl PanelEntry {
    pub fn new(primary: impl Into<OneOrMany<Trace>>) -> Self {
        Self {
            primary: primary.into().into_vec(),
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<OneOrMany<Trace>>) -> Self {
        self.secondary = Some(secondary.into().into_vec());
        self
    }
}

impl From<Trace> for PanelEntry {
    fn from(trace: Trace) -> Self {
        PanelEntry::new(trace)
    }
}

/// A composed panel with its axis titles resolved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Panel {
    pub primary: Vec<Trace>,
    pub secondary: Vec<Trace>,
    pub y_title: Option<String>,
    pub secondary_y_title: Option<String>,
    pub x_title: Option<String>,
}

impl Panel {
    pub fn has_secondary(&self) -> bool {
        !self.secondary.is_empty()
    }

    pub fn traces(&self) -> impl Iterator<Item = &Trace> {
        self.primary.iter().chain(self.secondary.iter())
    }
}

/// Declarative description of a whole chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Figure {
    /// Panels from top to bottom.
    pub panels: Vec<Panel>,
    pub title: Option<String>,
    pub height: Option<usize>,
    pub width: Option<usize>,
    /// All panels share one x axis. Multi-panel figures without it are not
    /// drawn by [`crate::render::PlotlyRenderer`].
    pub shared_x: bool,
    pub vertical_spacing: Option<f64>,
    pub row_heights: Option<Vec<f64>>,
}

impl Figure {
    pub fn traces(&self) -> impl Iterator<Item = &Trace> {
        self.panels.iter().flat_map(Panel::traces)
    }

    pub fn trace_count(&self) -> usize {
        self.traces().count()
    }
}

/// Set an axis title, keeping the last name written.
fn set_axis_title(slot: &mut Option<String>, name: &str, panel: usize, axis: &str) {
    if let Some(previous) = slot.as_deref() {
        if previous != name {
            warn!(
                "panel {} {} y axis title '{}' replaced by '{}'",
                panel, axis, previous, name
            );
        }
    }
    *slot = Some(name.to_string());
}

pub(crate) fn validate_overrides(overrides: &SubplotOverrides, num_panels: usize) -> Result<()> {
    if let Some(heights) = &overrides.row_heights {
        if heights.len() != num_panels {
            return Err(PlotError::invalid_input(format!(
                "row_heights has {} entries for {} panels",
                heights.len(),
                num_panels
            )));
        }
        if heights.iter().any(|h| h.is_nan() || *h <= 0.0) {
            return Err(PlotError::invalid_input("row_heights must all be positive"));
        }
    }

    if let Some(spacing) = overrides.vertical_spacing {
        let upper = if num_panels > 1 {
            1.0 / (num_panels - 1) as f64
        } else {
            1.0
        };
        if !(0.0..upper).contains(&spacing) {
            return Err(PlotError::invalid_input(format!(
                "vertical_spacing must be in [0, {}) for {} panels, got {}",
                upper, num_panels, spacing
            )));
        }
    }

    Ok(())
}

/// Stack panels vertically over one shared time axis.
///
/// Entry `i` becomes panel `i`. Primary traces go against the panel's first
/// y axis and secondary traces against its second; every trace titles its
/// axis with its own name, so with several traces on one axis the last one
/// wins. Only the bottom panel's x axis is titled ("time").
///
/// The figure height is `height_per_panel * entries.len()`.
pub fn compose_stacked(entries: Vec<PanelEntry>, options: &StackedOptions) -> Result<Figure> {
    if entries.is_empty() {
        return Err(PlotError::invalid_input(
            "a stacked figure needs at least one panel",
        ));
    }
    let num_panels = entries.len();
    validate_overrides(&options.overrides, num_panels)?;

    let mut panels = Vec::with_capacity(num_panels);
    for (i, entry) in entries.into_iter().enumerate() {
        if entry.primary.is_empty() {
            return Err(PlotError::invalid_input(format!(
                "panel {} has no primary traces",
                i
            )));
        }

        let mut panel = Panel::default();
        for trace in entry.primary {
            set_axis_title(&mut panel.y_title, &trace.name, i, "primary");
            panel.primary.push(trace);
        }
        for trace in entry.secondary.unwrap_or_default() {
            set_axis_title(&mut panel.secondary_y_title, &trace.name, i, "secondary");
            panel.secondary.push(trace);
        }
        panels.push(panel);
    }

    if let Some(bottom) = panels.last_mut() {
        bottom.x_title = Some(STACKED_X_TITLE.to_string());
    }

    let height = options
        .height_per_panel
        .checked_mul(num_panels)
        .ok_or_else(|| {
            PlotError::invalid_input(format!(
                "height_per_panel {} is too large for {} panels",
                options.height_per_panel, num_panels
            ))
        })?;

    let figure = Figure {
        panels,
        title: options.title.clone(),
        height: Some(height),
        width: None,
        shared_x: true,
        vertical_spacing: options.overrides.vertical_spacing,
        row_heights: options.overrides.row_heights.clone(),
    };
    debug!(
        "Composed stacked figure: {} panels, {} traces",
        num_panels,
        figure.trace_count()
    );

    Ok(figure)
}

/// Smallest and largest value over all x and y values, with the minimum
/// clamped to include 0.
fn identity_span(traces: &[Trace]) -> Result<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for trace in traces {
        let xs = trace.x.as_numeric().ok_or_else(|| {
            PlotError::invalid_input(format!(
                "identity line needs numeric x values, trace '{}' is temporal",
                trace.name
            ))
        })?;
        for &v in xs.iter().chain(trace.y.iter()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }

    if lo > hi {
        return Err(PlotError::invalid_input(
            "identity line needs at least one data point",
        ));
    }

    Ok((lo.min(0.0), hi))
}

fn identity_trace(lo: f64, hi: f64) -> Result<Trace> {
    Ok(Trace::new(vec![lo, hi], vec![lo, hi], IDENTITY_NAME)?
        .with_mode(RenderMode::Lines)
        .with_style(TraceStyle::default().with_color("black").with_dash(Dash::Dash)))
}

/// A single square panel, optionally with a dashed identity line.
///
/// The identity line runs from `(m, m)` to `(M, M)` where `M` is the
/// largest x or y value and `m` the smallest, clamped to at most 0.
pub fn compose_scatter(
    traces: impl Into<OneOrMany<Trace>>,
    options: &ScatterOptions,
) -> Result<Figure> {
    let mut traces = traces.into().into_vec();
    if traces.is_empty() {
        return Err(PlotError::invalid_input(
            "a scatter figure needs at least one trace",
        ));
    }

    if options.identity {
        let (lo, hi) = identity_span(&traces)?;
        debug!("Identity line spans [{}, {}]", lo, hi);
        traces.push(identity_trace(lo, hi)?);
    }

    let panel = Panel {
        primary: traces,
        secondary: Vec::new(),
        y_title: options.y_label.clone(),
        secondary_y_title: None,
        x_title: options.x_label.clone(),
    };
    debug!("Composed scatter figure: {} traces", panel.primary.len());

    Ok(Figure {
        panels: vec![panel],
        title: options.title.clone(),
        height: Some(options.size),
        width: Some(options.size),
        shared_x: false,
        vertical_spacing: None,
        row_heights: None,
    })
}

/// Turn a flat list of traces into stacked panel entries.
///
/// With [`PairingMode::Alone`] each trace gets its own panel and `secondary`
/// is ignored. With [`PairingMode::RepeatSecondary`] every panel also gets
/// a copy of the `secondary` traces on its second axis; unlike the Python
/// `list_traces_to_input`, a missing `secondary` is an error rather than
/// panels without a second axis.
pub fn panel_entries(
    traces: Vec<Trace>,
    mode: PairingMode,
    secondary: Option<OneOrMany<Trace>>,
) -> Result<Vec<PanelEntry>> {
    match mode {
        PairingMode::Alone => Ok(traces.into_iter().map(PanelEntry::new).collect()),
        PairingMode::RepeatSecondary => {
            let secondary = secondary.map(OneOrMany::into_vec).ok_or_else(|| {
                PlotError::invalid_input("repeat_sec pairing needs secondary traces")
            })?;
            Ok(traces
                .into_iter()
                .map(|trace| PanelEntry::new(trace).with_secondary(secondary.clone()))
                .collect())
        }
    }
}
