//! plotly-tools: small helpers for building plotly figures.
//!
//! This crate turns named numeric series into traces, arranges them into
//! vertically stacked panels sharing a time axis or into a square scatter
//! panel, and builds Bland-Altman agreement plots. Composers return a
//! declarative [`layout::Figure`]; turning it into a `plotly::Plot` is the
//! job of a [`render::Renderer`].
pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod stats;
pub mod table;
pub mod trace;

pub use config::{AgreementOptions, PairingMode, ScatterOptions, StackedOptions, SubplotOverrides};
pub use error::{PlotError, Result};
pub use layout::{compose_scatter, compose_stacked, panel_entries, Figure, Panel, PanelEntry};
pub use render::{PlotlyRenderer, Renderer};
pub use stats::{bland_altman, AgreementStats, LIMITS_OF_AGREEMENT_Z};
pub use table::Table;
pub use trace::{
    build_trace, build_traces_from_table, Dash, FillMode, OneOrMany, RenderMode, Trace,
    TraceStyle, XValues,
};
