//! FILENAME: chart-engine/src/view.rs
//! Chart View - Renderer-agnostic chart options.

use execution::DrillIntersectionItem;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::definition::{ChartType, Stacking};

/// Measure, view-by element and stack-by element of one point.
pub type DrillIntersection = SmallVec<[DrillIntersectionItem; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointMarker {
    pub enabled: bool,
}

/// One data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// `None` for a null value.
    pub y: Option<f64>,

    /// Format pattern of the point's measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Slice name (pie-like charts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Slice color (pie-like charts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<PointMarker>,

    pub drilldown: bool,

    /// Filled for drillable points only.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub drill_intersection: DrillIntersection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,

    /// Series color; pie-like charts color each point instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    pub legend_index: usize,

    pub data: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub series: Vec<Series>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Format pattern for axis labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Complete chart output, handed to the renderer configuration builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(rename = "type")]
    pub chart_type: ChartType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacking: Option<Stacking>,

    pub has_stack_by_attribute: bool,

    pub has_view_by_attribute: bool,

    pub data: ChartData,

    pub color_palette: Vec<String>,

    pub x_axis_props: AxisProps,

    pub y_axis_props: AxisProps,
}

impl ChartOptions {
    /// Every value of every series.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data
            .series
            .iter()
            .flat_map(|series| series.data.iter())
            .filter_map(|point| point.y)
    }

    pub fn point(&self, series_index: usize, point_index: usize) -> Option<&Point> {
        self.data.series.get(series_index)?.data.get(point_index)
    }
}
