//! FILENAME: chart-engine/src/tooltip.rs
//! PURPOSE: Tooltip rows for a hovered point.

use execution::{format_value, FormattedValue};
use serde::{Deserialize, Serialize};

use crate::view::ChartOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
}

fn formatted_y(y: Option<f64>, format: Option<&str>) -> FormattedValue {
    let raw = y.map(|value| value.to_string());
    format_value(raw.as_deref(), format)
}

/// Label/value rows describing the point, `None` for an unknown point.
///
/// The view-by element comes first (titled by the view-by attribute), then
/// the value titled by its series. Pie slices without a view-by attribute
/// are titled by the slice itself.
pub fn get_tooltip(options: &ChartOptions, series_index: usize, point_index: usize) -> Option<Vec<TooltipRow>> {
    let series = options.data.series.get(series_index)?;
    let point = series.data.get(point_index)?;
    let value = formatted_y(point.y, point.format.as_deref()).display_value;

    let mut rows = Vec::with_capacity(2);
    if options.has_view_by_attribute {
        let category = if options.chart_type.is_pie_like() {
            point.name.clone()
        } else {
            options.data.categories.get(point_index).cloned()
        };
        rows.push(TooltipRow {
            label: options.x_axis_props.title.clone().unwrap_or_default(),
            value: category.unwrap_or_default(),
        });
        rows.push(TooltipRow {
            label: series.name.clone(),
            value,
        });
    } else {
        let label = if options.chart_type.is_pie_like() {
            point.name.clone().unwrap_or_default()
        } else {
            series.name.clone()
        };
        rows.push(TooltipRow { label, value });
    }
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ChartType;
    use crate::view::{AxisProps, ChartData, Point, Series};

    fn point(y: Option<f64>, name: Option<&str>) -> Point {
        Point {
            y,
            format: Some("#,##0.00".to_string()),
            name: name.map(String::from),
            color: None,
            legend_index: None,
            marker: None,
            drilldown: false,
            drill_intersection: Default::default(),
        }
    }

    fn options(chart_type: ChartType, has_view_by: bool, data: Vec<Point>) -> ChartOptions {
        ChartOptions {
            chart_type,
            stacking: None,
            has_stack_by_attribute: false,
            has_view_by_attribute: has_view_by,
            data: ChartData {
                series: vec![Series {
                    name: "Amount".to_string(),
                    color: None,
                    legend_index: 0,
                    data,
                }],
                categories: vec!["East".to_string(), "West".to_string()],
            },
            color_palette: Vec::new(),
            x_axis_props: AxisProps {
                title: Some("Region".to_string()),
                format: None,
            },
            y_axis_props: AxisProps::default(),
        }
    }

    #[test]
    fn test_tooltip_with_view_by() {
        let chart = options(ChartType::Column, true, vec![point(Some(1.0), None), point(Some(1234.5), None)]);
        assert_eq!(
            get_tooltip(&chart, 0, 1).unwrap(),
            vec![
                TooltipRow { label: "Region".to_string(), value: "West".to_string() },
                TooltipRow { label: "Amount".to_string(), value: "1,234.50".to_string() },
            ]
        );
    }

    #[test]
    fn test_tooltip_for_pie_slice_without_view_by() {
        let chart = options(ChartType::Pie, false, vec![point(Some(3.0), Some("Count"))]);
        assert_eq!(
            get_tooltip(&chart, 0, 0).unwrap(),
            vec![TooltipRow { label: "Count".to_string(), value: "3.00".to_string() }]
        );
    }

    #[test]
    fn test_tooltip_null_value_and_unknown_point() {
        let chart = options(ChartType::Line, true, vec![point(None, None)]);
        let rows = get_tooltip(&chart, 0, 0).unwrap();
        assert_eq!(rows[1].value, execution::EMPTY_VALUE_MARKER);
        assert!(get_tooltip(&chart, 0, 5).is_none());
        assert!(get_tooltip(&chart, 1, 0).is_none());
    }
}
