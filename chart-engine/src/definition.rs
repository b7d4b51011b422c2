//! FILENAME: chart-engine/src/definition.rs
//! Chart Definition - The serializable chart configuration.
//!
//! Describes WHAT the caller asked for: chart type, stacking, palette,
//! legend placement and the size limits above which nothing is rendered.

use std::fmt;
use std::str::FromStr;

use execution::{DrillElement, DrillType, TransformError};
use serde::{Deserialize, Serialize};

/// Identifier of a mounted chart, unique within one host page.
pub type ChartId = u32;

/// Series count above which a chart is not rendered.
pub const DEFAULT_SERIES_LIMIT: usize = 1000;

/// Category count above which a chart is not rendered.
pub const DEFAULT_CATEGORIES_LIMIT: usize = 365;

/// Colors assigned to series (or pie slices) in order, cycling.
pub const DEFAULT_COLOR_PALETTE: [&str; 20] = [
    "rgb(20,178,226)",
    "rgb(0,193,141)",
    "rgb(229,77,66)",
    "rgb(241,134,0)",
    "rgb(171,85,163)",
    "rgb(244,213,33)",
    "rgb(148,161,174)",
    "rgb(107,191,216)",
    "rgb(181,136,177)",
    "rgb(238,135,128)",
    "rgb(241,171,84)",
    "rgb(133,209,188)",
    "rgb(41,117,170)",
    "rgb(4,140,103)",
    "rgb(181,60,51)",
    "rgb(163,101,46)",
    "rgb(140,57,132)",
    "rgb(136,219,244)",
    "rgb(189,234,222)",
    "rgb(239,197,194)",
];

// ============================================================================
// CHART TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Column,
    Bar,
    Line,
    Pie,
    Doughnut,
    Area,
}

impl ChartType {
    pub const ALL: [ChartType; 6] = [
        ChartType::Column,
        ChartType::Bar,
        ChartType::Line,
        ChartType::Pie,
        ChartType::Doughnut,
        ChartType::Area,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Column => "column",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::Area => "area",
        }
    }

    /// Pie and doughnut: one series, one slice per category.
    pub fn is_pie_like(self) -> bool {
        matches!(self, ChartType::Pie | ChartType::Doughnut)
    }

    pub fn is_area(self) -> bool {
        self == ChartType::Area
    }

    pub fn drill_type(self) -> DrillType {
        match self {
            ChartType::Column => DrillType::Column,
            ChartType::Bar => DrillType::Bar,
            ChartType::Line => DrillType::Line,
            ChartType::Pie => DrillType::Pie,
            ChartType::Doughnut => DrillType::Doughnut,
            ChartType::Area => DrillType::Area,
        }
    }

    /// Element reported in drill events for a click on a point.
    pub fn click_element(self) -> DrillElement {
        match self {
            ChartType::Column | ChartType::Bar => DrillElement::Bar,
            ChartType::Line | ChartType::Area => DrillElement::Point,
            ChartType::Pie | ChartType::Doughnut => DrillElement::Slice,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .iter()
            .copied()
            .find(|chart_type| chart_type.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = ChartType::ALL.iter().map(|t| t.as_str()).collect();
                TransformError::UnknownVisualizationType(format!(
                    "{} (valid chart types: {})",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

// ============================================================================
// STACKING, LIMITS, LEGEND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stacking {
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartLimits {
    pub series: usize,
    pub categories: usize,
}

impl Default for ChartLimits {
    fn default() -> Self {
        ChartLimits {
            series: DEFAULT_SERIES_LIMIT,
            categories: DEFAULT_CATEGORIES_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
}

/// Legend settings; `enabled` is further narrowed by the chart content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendConfig {
    pub enabled: bool,
    pub position: LegendPosition,
}

impl Default for LegendConfig {
    fn default() -> Self {
        LegendConfig {
            enabled: true,
            position: LegendPosition::Right,
        }
    }
}

// ============================================================================
// CHART CONFIG
// ============================================================================

/// Caller configuration of one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,

    #[serde(default)]
    pub legend: LegendConfig,

    /// Overrides the default palette when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,

    /// Explicit stacking switch. Unset means stacked for area charts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacking: Option<bool>,

    #[serde(default)]
    pub limits: ChartLimits,
}

impl ChartConfig {
    pub fn new(chart_type: ChartType) -> Self {
        ChartConfig {
            chart_type,
            legend: LegendConfig::default(),
            colors: Vec::new(),
            stacking: None,
            limits: ChartLimits::default(),
        }
    }

    pub fn color_palette(&self) -> Vec<String> {
        if self.colors.is_empty() {
            DEFAULT_COLOR_PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            self.colors.clone()
        }
    }

    /// Resolved stacking mode. Pie-like charts never stack.
    pub fn resolved_stacking(&self) -> Option<Stacking> {
        if self.chart_type.is_pie_like() {
            return None;
        }
        match self.stacking {
            Some(true) => Some(Stacking::Normal),
            Some(false) => None,
            None if self.chart_type.is_area() => Some(Stacking::Normal),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chart_type_from_str() {
        assert_eq!("doughnut".parse::<ChartType>().unwrap(), ChartType::Doughnut);
        for chart_type in ChartType::ALL {
            assert_eq!(chart_type.as_str().parse::<ChartType>().unwrap(), chart_type);
        }
        let err = "scatter".parse::<ChartType>().unwrap_err();
        assert!(matches!(err, TransformError::UnknownVisualizationType(_)));
    }

    #[test]
    fn test_click_elements() {
        assert_eq!(ChartType::Column.click_element(), DrillElement::Bar);
        assert_eq!(ChartType::Area.click_element(), DrillElement::Point);
        assert_eq!(ChartType::Doughnut.click_element(), DrillElement::Slice);
    }

    #[test]
    fn test_stacking_resolution() {
        let mut config = ChartConfig::new(ChartType::Area);
        assert_eq!(config.resolved_stacking(), Some(Stacking::Normal));
        config.stacking = Some(false);
        assert_eq!(config.resolved_stacking(), None);

        let mut column = ChartConfig::new(ChartType::Column);
        assert_eq!(column.resolved_stacking(), None);
        column.stacking = Some(true);
        assert_eq!(column.resolved_stacking(), Some(Stacking::Normal));

        let mut pie = ChartConfig::new(ChartType::Pie);
        pie.stacking = Some(true);
        assert_eq!(pie.resolved_stacking(), None);
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: ChartConfig = serde_json::from_value(json!({
            "type": "bar",
            "limits": { "series": 10 },
            "legend": { "position": "bottom" }
        }))
        .unwrap();

        assert_eq!(config.chart_type, ChartType::Bar);
        assert_eq!(config.limits.series, 10);
        assert_eq!(config.limits.categories, DEFAULT_CATEGORIES_LIMIT);
        assert!(config.legend.enabled);
        assert_eq!(config.legend.position, LegendPosition::Bottom);
        assert_eq!(config.color_palette().len(), DEFAULT_COLOR_PALETTE.len());
    }
}
