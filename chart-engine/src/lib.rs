//! FILENAME: chart-engine/src/lib.rs
//! Chart subsystem: execution results as column, bar, line, area, pie and
//! doughnut charts.
//!
//! Layers:
//! - `definition`: Serializable chart configuration (type, limits, legend, palette)
//! - `view`: Renderer-agnostic chart options (series, points, categories)
//! - `engine`: Calculation of chart options from the execution triple
//! - `validation`: Size and negative-value guards before rendering
//! - `legend`: Legend items and visibility
//! - `configuration`: Type-keyed renderer configuration
//! - `tooltip`: Tooltip rows for a hovered point
//! - `drilling`: Point drill payloads
//! - `registry`: Active chart tracking for tooltip dismissal

pub mod definition;
pub mod view;
pub mod engine;
pub mod validation;
pub mod legend;
pub mod configuration;
pub mod tooltip;
pub mod drilling;
pub mod registry;

pub use definition::*;
pub use view::*;
pub use engine::{get_chart_options, ChartTransformation};
pub use validation::{
    assign_chart_options, guard_chart_options, is_data_of_reasonable_size, validate_data,
    ChartCallback, ChartCallbacks, ChartOutcome, ValidationResult, ValidationSignal,
};
pub use legend::{get_legend, get_legend_items, should_legend_be_enabled, Legend, LegendItem};
pub use configuration::{get_renderer_configuration, RendererConfiguration, RendererType};
pub use tooltip::{get_tooltip, TooltipRow};
pub use drilling::{build_point_drill_event_data, handle_point_click};
pub use registry::ActiveChartRegistry;
