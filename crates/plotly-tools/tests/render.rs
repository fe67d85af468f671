//! Integration tests for rendering figures and for option (de)serialization.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use plotly_tools::{
    bland_altman, build_traces_from_table, compose_scatter, compose_stacked, panel_entries,
    AgreementOptions, Figure, PairingMode, PanelEntry, PlotError, PlotlyRenderer, RenderMode,
    Renderer, ScatterOptions, StackedOptions, Table, Trace, TraceStyle,
};

fn series(name: &str, ys: &[f64]) -> Trace {
    let xs = (0..ys.len()).map(|i| i as f64).collect::<Vec<_>>();
    Trace::new(xs, ys.to_vec(), name).unwrap()
}

/// Records what it was asked to render instead of drawing anything.
struct CountingRenderer;

impl Renderer for CountingRenderer {
    type Output = (usize, usize);
    type Error = PlotError;

    fn render(&self, figure: &Figure) -> Result<(usize, usize), PlotError> {
        Ok((figure.panels.len(), figure.trace_count()))
    }
}

// ---------------------------------------------------------------------------
// Renderer seam
// ---------------------------------------------------------------------------

#[test]
fn figures_render_through_mock_collaborator() -> Result<()> {
    let stacked = compose_stacked(
        vec![
            PanelEntry::new(series("a", &[1.0, 2.0])).with_secondary(series("b", &[0.1, 0.2])),
            PanelEntry::new(series("c", &[3.0, 4.0])),
        ],
        &StackedOptions::default(),
    )?;
    assert_eq!(CountingRenderer.render(&stacked)?, (2, 3));

    let options = ScatterOptions {
        identity: true,
        ..ScatterOptions::default()
    };
    let scatter = compose_scatter(series("p", &[1.0, 2.0]), &options)?;
    assert_eq!(CountingRenderer.render(&scatter)?, (1, 2));
    Ok(())
}

// ---------------------------------------------------------------------------
// PlotlyRenderer
// ---------------------------------------------------------------------------

#[test]
fn plotly_stacked_figure_has_secondary_axis_and_time_title() -> Result<()> {
    let figure = compose_stacked(
        vec![
            PanelEntry::new(series("flow", &[1.0, 2.0])).with_secondary(series("valve", &[0.0, 1.0])),
            PanelEntry::new(series("level", &[3.0, 4.0])),
        ],
        &StackedOptions::new(Some("Plant")),
    )?;
    let json = PlotlyRenderer.render(&figure)?.to_json();

    assert!(json.contains("\"name\":\"flow\""));
    assert!(json.contains("\"name\":\"valve\""));
    assert!(json.contains("\"yaxis\":\"y2\""));
    assert!(json.contains("\"yaxis\":\"y3\""));
    assert!(json.contains("\"overlaying\":\"y\""));
    assert!(json.contains("time"));
    assert!(json.contains("Plant"));
    assert!(json.contains("\"height\":400"));
    Ok(())
}

#[test]
fn plotly_bland_altman_renders_limit_names() -> Result<()> {
    let table = Table::with_range_index(vec![
        ("col1".to_string(), vec![10.0, 12.0, 14.0]),
        ("col2".to_string(), vec![9.0, 13.0, 12.0]),
    ])?;
    let figure = bland_altman(&table, "col1", "col2", &AgreementOptions::default())?;
    let json = PlotlyRenderer.render(&figure)?.to_json();

    assert!(json.contains("+SD1.96: 3.661"));
    assert!(json.contains("-SD1.96: -2.327"));
    assert!(json.contains("\"width\":800"));
    Ok(())
}

#[test]
fn plotly_renders_time_series_table() -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap();
    let index = vec![start, start + Duration::minutes(30), start + Duration::hours(1)];
    let table = Table::new(
        index,
        vec![
            ("flow".to_string(), vec![1.0, 1.5, 1.25]),
            ("level".to_string(), vec![3.0, 2.5, 2.0]),
        ],
    )?;

    let traces = build_traces_from_table(&table, &HashMap::new());
    assert!(traces.iter().all(|t| t.x.as_numeric().is_none()));

    let entries = panel_entries(traces, PairingMode::Alone, None)?;
    let figure = compose_stacked(entries, &StackedOptions::default())?;
    let json = PlotlyRenderer.render(&figure)?.to_json();

    assert!(json.contains("2024-03-01 06:00:00"));
    assert!(json.contains("2024-03-01 06:30:00"));
    assert!(json.contains("2024-03-01 07:00:00"));
    assert!(json.contains("\"name\":\"level\""));
    assert!(json.contains("time"));
    Ok(())
}

#[test]
fn plotly_colors_markers_of_lines_markers_traces() -> Result<()> {
    let trace = series("p", &[1.0, 2.0])
        .with_mode(RenderMode::LinesMarkers)
        .with_style(TraceStyle::default().with_color("red"));
    let figure = compose_scatter(trace, &ScatterOptions::default())?;
    let json = PlotlyRenderer.render(&figure)?.to_json();

    assert!(json.contains("\"marker\":{\"color\":\"red\""));
    Ok(())
}

#[test]
fn plotly_rejects_short_row_heights_in_deserialized_figure() {
    let mut figure = compose_stacked(
        vec![PanelEntry::new(series("a", &[1.0])), PanelEntry::new(series("lost", &[2.0]))],
        &StackedOptions::default(),
    )
    .unwrap();
    figure.row_heights = Some(vec![1.0]);

    let json = serde_json::to_string(&figure).unwrap();
    let loaded: Figure = serde_json::from_str(&json).unwrap();
    let err = PlotlyRenderer.render(&loaded).err().unwrap();
    assert!(matches!(err, PlotError::InvalidInput(_)));
}

#[test]
fn plotly_rejects_more_than_eight_y_axes() {
    let entries =
        vec![PanelEntry::new(series("a", &[1.0])).with_secondary(series("b", &[2.0])); 5];
    let figure = compose_stacked(entries, &StackedOptions::default()).unwrap();
    let err = PlotlyRenderer.render(&figure).err().unwrap();
    assert!(matches!(err, PlotError::TooManyAxes { required: 10, .. }));
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[test]
fn stacked_options_load_from_json() {
    let options: StackedOptions =
        serde_json::from_str(r#"{"title": "Run 7", "vertical_spacing": 0.05}"#).unwrap();
    assert_eq!(options.title.as_deref(), Some("Run 7"));
    assert_eq!(options.height_per_panel, 200);
    assert_eq!(options.overrides.vertical_spacing, Some(0.05));
    assert_eq!(options.overrides.row_heights, None);
}

#[test]
fn scatter_options_round_trip_json() {
    let options = ScatterOptions {
        identity: true,
        size: 640,
        ..ScatterOptions::default()
    };
    let json = serde_json::to_string(&options).unwrap();
    let back: ScatterOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(options, back);
}

#[test]
fn figure_serializes_to_json() {
    let figure = compose_scatter(series("p", &[1.0]), &ScatterOptions::default()).unwrap();
    let json = serde_json::to_string(&figure).unwrap();
    assert!(json.contains("\"name\":\"p\""));
}
