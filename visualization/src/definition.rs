//! FILENAME: visualization/src/definition.rs
//! Visualization Definition - Type tag and caller configuration.
//!
//! One configuration object drives every visualization type; each transform
//! reads the part that concerns it.

use std::fmt;
use std::str::FromStr;

use chart_engine::{ChartConfig, ChartLimits, ChartType, LegendConfig};
use execution::{DrillableItem, NumericSymbols, TransformError, TransformResult, ValidationError};
use headline_engine::{HeadlineOptions, DEFAULT_TERTIARY_TITLE};
use serde::{Deserialize, Serialize};
use table_engine::{TableOptions, TotalDefinition};

// ============================================================================
// VISUALIZATION TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationType {
    Table,
    Column,
    Bar,
    Line,
    Pie,
    Doughnut,
    Area,
    Headline,
}

impl VisualizationType {
    pub const ALL: [VisualizationType; 8] = [
        VisualizationType::Table,
        VisualizationType::Column,
        VisualizationType::Bar,
        VisualizationType::Line,
        VisualizationType::Pie,
        VisualizationType::Doughnut,
        VisualizationType::Area,
        VisualizationType::Headline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VisualizationType::Table => "table",
            VisualizationType::Column => "column",
            VisualizationType::Bar => "bar",
            VisualizationType::Line => "line",
            VisualizationType::Pie => "pie",
            VisualizationType::Doughnut => "doughnut",
            VisualizationType::Area => "area",
            VisualizationType::Headline => "headline",
        }
    }

    /// The chart type, for chart visualizations.
    pub fn chart_type(self) -> Option<ChartType> {
        match self {
            VisualizationType::Column => Some(ChartType::Column),
            VisualizationType::Bar => Some(ChartType::Bar),
            VisualizationType::Line => Some(ChartType::Line),
            VisualizationType::Pie => Some(ChartType::Pie),
            VisualizationType::Doughnut => Some(ChartType::Doughnut),
            VisualizationType::Area => Some(ChartType::Area),
            VisualizationType::Table | VisualizationType::Headline => None,
        }
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationType {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisualizationType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TransformError::UnknownVisualizationType(s.to_string()))
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

fn default_tertiary_title() -> String {
    DEFAULT_TERTIARY_TITLE.to_string()
}

/// Caller configuration of one visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationConfig {
    #[serde(rename = "type")]
    pub visualization_type: VisualizationType,

    #[serde(default)]
    pub limits: ChartLimits,

    #[serde(default)]
    pub legend: LegendConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacking: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub totals: Vec<TotalDefinition>,

    #[serde(default)]
    pub totals_edit_allowed: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drillable_items: Vec<DrillableItem>,

    /// Axis label suffixes for thousands, millions, ...
    #[serde(default)]
    pub numeric_symbols: NumericSymbols,

    /// Localized title of the headline comparison item.
    #[serde(default = "default_tertiary_title")]
    pub tertiary_title: String,
}

impl VisualizationConfig {
    pub fn new(visualization_type: VisualizationType) -> Self {
        VisualizationConfig {
            visualization_type,
            limits: ChartLimits::default(),
            legend: LegendConfig::default(),
            stacking: None,
            colors: Vec::new(),
            totals: Vec::new(),
            totals_edit_allowed: false,
            drillable_items: Vec::new(),
            numeric_symbols: NumericSymbols::default(),
            tertiary_title: default_tertiary_title(),
        }
    }

    /// Parses a JSON configuration. An unrecognized `type` is reported as
    /// an unknown visualization type, other problems as validation errors.
    pub fn from_json(json: &str) -> TransformResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|err| ValidationError::from_serde("config", &err))?;

        if let Some(tag) = value.get("type").and_then(serde_json::Value::as_str) {
            tag.parse::<VisualizationType>()?;
        }

        serde_json::from_value(value)
            .map_err(|err| TransformError::from(ValidationError::from_serde("config", &err)))
    }

    pub fn chart_config(&self, chart_type: ChartType) -> ChartConfig {
        ChartConfig {
            chart_type,
            legend: self.legend,
            colors: self.colors.clone(),
            stacking: self.stacking,
            limits: self.limits,
        }
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            totals: self.totals.clone(),
            totals_edit_allowed: self.totals_edit_allowed,
            drillable_items: self.drillable_items.clone(),
            ..TableOptions::default()
        }
    }

    pub fn headline_options(&self) -> HeadlineOptions {
        HeadlineOptions {
            tertiary_title: self.tertiary_title.clone(),
        }
    }
}
