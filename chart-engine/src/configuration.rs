//! FILENAME: chart-engine/src/configuration.rs
//! Renderer Configuration - Chart options translated for the charting library.
//!
//! Built in three layers, later ones overriding earlier ones:
//! 1. common: the base template shared by every chart
//! 2. type-specific: renderer type, point width, doughnut hole
//! 3. customized: data, palette, stacking and axes of these chart options

use execution::DrillElement;
use serde::{Deserialize, Serialize};

use crate::definition::{ChartType, Stacking, DEFAULT_CATEGORIES_LIMIT};
use crate::view::{ChartOptions, Series};

/// Maximum bar or column width in pixels.
pub const MAX_POINT_WIDTH: u32 = 100;

/// Inner radius of a doughnut.
pub const DOUGHNUT_INNER_SIZE: &str = "50%";

/// X axis label rotation tried when labels collide.
pub const X_AXIS_AUTO_ROTATION: i32 = -90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererType {
    Column,
    Bar,
    Line,
    Area,
    Pie,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_rotation: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfiguration {
    pub renderer_type: RendererType,

    pub animation: bool,

    /// The renderer's own legend; the custom legend is built separately.
    pub legend_enabled: bool,

    pub data_labels_enabled: bool,

    /// Point count above which the renderer switches to its fast path.
    pub turbo_threshold: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacking: Option<Stacking>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_point_width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_size: Option<String>,

    pub x_axis: AxisConfiguration,

    pub y_axis: AxisConfiguration,

    pub colors: Vec<String>,

    pub categories: Vec<String>,

    pub series: Vec<Series>,

    /// Element reported when a point is clicked.
    pub click_element: DrillElement,

    /// Whether any point reacts to clicks.
    pub drilldown_enabled: bool,
}

// ============================================================================
// LAYERS
// ============================================================================

pub fn get_common_configuration(chart_type: ChartType) -> RendererConfiguration {
    RendererConfiguration {
        renderer_type: RendererType::Column,
        animation: false,
        legend_enabled: false,
        data_labels_enabled: false,
        turbo_threshold: DEFAULT_CATEGORIES_LIMIT,
        stacking: None,
        max_point_width: None,
        inner_size: None,
        x_axis: AxisConfiguration {
            auto_rotation: Some(X_AXIS_AUTO_ROTATION),
            ..AxisConfiguration::default()
        },
        y_axis: AxisConfiguration::default(),
        colors: Vec::new(),
        categories: Vec::new(),
        series: Vec::new(),
        click_element: chart_type.click_element(),
        drilldown_enabled: false,
    }
}

pub fn apply_type_configuration(configuration: &mut RendererConfiguration, chart_type: ChartType) {
    match chart_type {
        ChartType::Column => {
            configuration.renderer_type = RendererType::Column;
            configuration.max_point_width = Some(MAX_POINT_WIDTH);
        }
        ChartType::Bar => {
            configuration.renderer_type = RendererType::Bar;
            configuration.max_point_width = Some(MAX_POINT_WIDTH);
        }
        ChartType::Line => {
            configuration.renderer_type = RendererType::Line;
        }
        ChartType::Area => {
            configuration.renderer_type = RendererType::Area;
        }
        ChartType::Pie => {
            configuration.renderer_type = RendererType::Pie;
            configuration.x_axis.auto_rotation = None;
        }
        ChartType::Doughnut => {
            configuration.renderer_type = RendererType::Pie;
            configuration.x_axis.auto_rotation = None;
            configuration.inner_size = Some(DOUGHNUT_INNER_SIZE.to_string());
        }
    }
}

pub fn apply_customized_configuration(configuration: &mut RendererConfiguration, options: &ChartOptions) {
    configuration.stacking = options.stacking;
    configuration.colors = options.color_palette.clone();
    configuration.categories = options.data.categories.clone();
    configuration.series = options.data.series.clone();
    configuration.x_axis.title = options.x_axis_props.title.clone();
    configuration.y_axis.title = options.y_axis_props.title.clone();
    configuration.y_axis.format = options.y_axis_props.format.clone();
    configuration.drilldown_enabled = options
        .data
        .series
        .iter()
        .flat_map(|series| series.data.iter())
        .any(|point| point.drilldown);

    // Stacked columns label each segment
    if options.stacking.is_some() && !options.chart_type.is_area() {
        configuration.data_labels_enabled = true;
    }
}

/// Full renderer configuration for the chart options.
pub fn get_renderer_configuration(options: &ChartOptions) -> RendererConfiguration {
    let mut configuration = get_common_configuration(options.chart_type);
    apply_type_configuration(&mut configuration, options.chart_type);
    apply_customized_configuration(&mut configuration, options);
    configuration
}
