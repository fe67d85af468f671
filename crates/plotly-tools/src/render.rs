//! Rendering of a [`Figure`] into a `plotly::Plot`.
//!
//! Stacked panels are placed top to bottom by giving each panel's y axis a
//! slice of the vertical domain. All traces share the x axis `x`, which is
//! anchored to the bottom panel. A panel with secondary traces gets a second
//! y axis overlaying its first, on the right.
use log::trace;
use plotly::common::{DashType, Fill, Line, Marker, Mode, Reference, Title};
use plotly::common::AxisSide;
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};
use serde::Serialize;

use crate::config::SubplotOverrides;
use crate::error::{PlotError, Result};
use crate::layout::{validate_overrides, Figure};
use crate::trace::{Dash, FillMode, RenderMode, Trace, TraceStyle, XValues};

/// Number of y axes the typed plotly layout can address.
pub const MAX_Y_AXES: usize = 8;

const TEMPORAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Turns a declarative [`Figure`] into something displayable.
pub trait Renderer {
    type Output;
    type Error;

    fn render(&self, figure: &Figure) -> std::result::Result<Self::Output, Self::Error>;
}

/// Renders figures with plotly.
///
/// Each panel takes one y axis, plus one more when it has secondary traces.
/// plotly's typed layout addresses at most [`MAX_Y_AXES`] y axes, so a
/// figure needing more (e.g. nine single-series panels) fails with
/// [`PlotError::TooManyAxes`]. Figures with several panels must have
/// `shared_x` set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyRenderer;

/// Axis ids and vertical domain of one panel.
#[derive(Debug, Clone, PartialEq)]
struct PanelAxes {
    primary: usize,
    secondary: Option<usize>,
    domain: [f64; 2],
}

/// plotly names the first axis `y` and the rest `y2`, `y3`, ...
fn axis_ref(prefix: &str, id: usize) -> String {
    if id == 1 {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, id)
    }
}

fn allocate_axes(figure: &Figure) -> Result<Vec<PanelAxes>> {
    let n = figure.panels.len();
    if n == 0 {
        return Err(PlotError::invalid_input("cannot render a figure without panels"));
    }
    if n > 1 && !figure.shared_x {
        return Err(PlotError::invalid_input(
            "stacked panels are only rendered over a shared x axis",
        ));
    }
    // Figures may come from deserialized JSON rather than the composers.
    validate_overrides(
        &SubplotOverrides {
            vertical_spacing: figure.vertical_spacing,
            row_heights: figure.row_heights.clone(),
        },
        n,
    )?;
    let spacing = match figure.vertical_spacing {
        Some(s) => s,
        None if n > 1 => 0.3 / n as f64,
        None => 0.0,
    };
    let weights = figure
        .row_heights
        .clone()
        .unwrap_or_else(|| vec![1.0; n]);
    let total: f64 = weights.iter().sum();
    let available = 1.0 - spacing * n.saturating_sub(1) as f64;

    let mut next_id = 1;
    let mut top = 1.0;
    let mut axes = Vec::with_capacity(n);
    for (panel, weight) in figure.panels.iter().zip(weights) {
        let height = available * weight / total;
        let primary = next_id;
        next_id += 1;
        let secondary = if panel.has_secondary() {
            next_id += 1;
            Some(primary + 1)
        } else {
            None
        };

        axes.push(PanelAxes {
            primary,
            secondary,
            domain: [(top - height).max(0.0), top],
        });
        top -= height + spacing;
    }

    let required = next_id - 1;
    if required > MAX_Y_AXES {
        return Err(PlotError::TooManyAxes {
            required,
            supported: MAX_Y_AXES,
        });
    }
    trace!("Allocated {} y axes for {} panels", required, n);

    Ok(axes)
}

fn with_y_axis(layout: Layout, id: usize, axis: Axis) -> Layout {
    match id {
        1 => layout.y_axis(axis),
        2 => layout.y_axis2(axis),
        3 => layout.y_axis3(axis),
        4 => layout.y_axis4(axis),
        5 => layout.y_axis5(axis),
        6 => layout.y_axis6(axis),
        7 => layout.y_axis7(axis),
        8 => layout.y_axis8(axis),
        _ => layout,
    }
}

fn mode(mode: RenderMode) -> Mode {
    match mode {
        RenderMode::Lines => Mode::Lines,
        RenderMode::Markers => Mode::Markers,
        RenderMode::LinesMarkers => Mode::LinesMarkers,
    }
}

fn fill(fill: FillMode) -> Fill {
    match fill {
        FillMode::ToZeroY => Fill::ToZeroY,
        FillMode::ToZeroX => Fill::ToZeroX,
        FillMode::ToNextY => Fill::ToNextY,
        FillMode::ToNextX => Fill::ToNextX,
        FillMode::ToSelf => Fill::ToSelf,
        FillMode::ToNext => Fill::ToNext,
    }
}

fn dash(dash: Dash) -> DashType {
    match dash {
        Dash::Solid => DashType::Solid,
        Dash::Dot => DashType::Dot,
        Dash::Dash => DashType::Dash,
        Dash::LongDash => DashType::LongDash,
        Dash::DashDot => DashType::DashDot,
    }
}

fn line(style: &TraceStyle) -> Line {
    let mut line = Line::new();
    if let Some(color) = &style.color {
        line = line.color(color.clone());
    }
    if let Some(d) = style.dash {
        line = line.dash(dash(d));
    }
    if let Some(width) = style.width {
        line = line.width(width);
    }
    line
}

fn scatter<X>(x: Vec<X>, trace: &Trace, y_axis: &str) -> Box<Scatter<X, f64>>
where
    X: Serialize + Clone + 'static,
{
    let mut scatter = Scatter::new(x, trace.y.clone())
        .name(trace.name.as_str())
        .mode(mode(trace.mode))
        .x_axis("x")
        .y_axis(y_axis);

    if let Some(f) = trace.fill {
        scatter = scatter.fill(fill(f));
    }
    if let Some(text) = &trace.text {
        scatter = scatter.text_array(text.clone());
    }
    if !trace.style.is_empty() {
        scatter = scatter.line(line(&trace.style));
    }
    if let (RenderMode::Markers | RenderMode::LinesMarkers, Some(color)) =
        (trace.mode, &trace.style.color)
    {
        scatter = scatter.marker(Marker::new().color(color.clone()));
    }
    scatter
}

fn add_trace(plot: &mut Plot, trace: &Trace, y_axis: &str) {
    match &trace.x {
        XValues::Numeric(x) => plot.add_trace(scatter(x.clone(), trace, y_axis)),
        XValues::Temporal(x) => {
            let x = x
                .iter()
                .map(|t| t.format(TEMPORAL_FORMAT).to_string())
                .collect::<Vec<_>>();
            plot.add_trace(scatter(x, trace, y_axis))
        }
    }
}

impl Renderer for PlotlyRenderer {
    type Output = Plot;
    type Error = PlotError;

    fn render(&self, figure: &Figure) -> Result<Plot> {
        let axes = allocate_axes(figure)?;
        let mut plot = Plot::new();
        let mut layout = Layout::new();

        for (panel, panel_axes) in figure.panels.iter().zip(&axes) {
            let primary_ref = axis_ref("y", panel_axes.primary);
            for trace in &panel.primary {
                add_trace(&mut plot, trace, &primary_ref);
            }

            let mut y_axis = Axis::new().domain(&panel_axes.domain).anchor("x");
            if let Some(title) = &panel.y_title {
                y_axis = y_axis.title(Title::with_text(title.as_str()));
            }
            layout = with_y_axis(layout, panel_axes.primary, y_axis);

            if let Some(secondary_id) = panel_axes.secondary {
                let secondary_ref = axis_ref("y", secondary_id);
                for trace in &panel.secondary {
                    add_trace(&mut plot, trace, &secondary_ref);
                }

                let mut y_axis = Axis::new()
                    .overlaying(primary_ref.as_str())
                    .side(AxisSide::Right)
                    .anchor("x");
                if let Some(title) = &panel.secondary_y_title {
                    y_axis = y_axis.title(Title::with_text(title.as_str()));
                }
                layout = with_y_axis(layout, secondary_id, y_axis);
            }
        }

        // The shared x axis sits under the bottom panel and takes its title.
        if let (Some(bottom), Some(bottom_axes)) = (figure.panels.last(), axes.last()) {
            let bottom_ref = axis_ref("y", bottom_axes.primary);
            let mut x_axis = Axis::new().anchor(bottom_ref.as_str());
            if let Some(title) = &bottom.x_title {
                x_axis = x_axis.title(Title::with_text(title.as_str()));
            }
            layout = layout.x_axis(x_axis);
        }

        if let Some(title) = &figure.title {
            layout = layout.title(
                Title::with_text(title.as_str())
                    .x_ref(Reference::Paper)
                    .x(0.0),
            );
        }
        if let Some(height) = figure.height {
            layout = layout.height(height);
        }
        if let Some(width) = figure.width {
            layout = layout.width(width);
        }

        plot.set_layout(layout);
        Ok(plot)
    }
}
