//! FILENAME: chart-engine/src/legend.rs
//! PURPOSE: Legend content and visibility.
//! CONTEXT: Pie-like charts list their slices, other charts their series.
//! The caller may disable the legend, but it is only shown when it tells
//! the reader something the chart itself does not.

use execution::common::unescape_angle_brackets;
use serde::{Deserialize, Serialize};

use crate::definition::{LegendConfig, LegendPosition};
use crate::view::ChartOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendItem {
    pub name: String,
    pub color: String,
    pub legend_index: usize,
    /// Hidden items are toggled off by the user; their series stay in the data.
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub enabled: bool,
    pub position: LegendPosition,
    pub items: Vec<LegendItem>,
}

pub fn should_legend_be_enabled(options: &ChartOptions) -> bool {
    let series = &options.data.series;
    let has_more_than_one_series = series.len() > 1;

    let is_area_chart_with_one_series = options.chart_type.is_area()
        && !has_more_than_one_series
        && !options.has_stack_by_attribute;
    let is_stacked = !is_area_chart_with_one_series && options.stacking.is_some();

    let is_pie_with_more_than_one_category = options.chart_type.is_pie_like()
        && series.first().is_some_and(|s| s.data.len() > 1);

    has_more_than_one_series || is_pie_with_more_than_one_category || is_stacked
}

pub fn get_legend_items(options: &ChartOptions) -> Vec<LegendItem> {
    if options.chart_type.is_pie_like() {
        options
            .data
            .series
            .first()
            .map(|series| {
                series
                    .data
                    .iter()
                    .enumerate()
                    .map(|(index, point)| LegendItem {
                        name: unescape_angle_brackets(point.name.as_deref().unwrap_or_default()),
                        color: point.color.clone().unwrap_or_default(),
                        legend_index: point.legend_index.unwrap_or(index),
                        is_visible: true,
                    })
                    .collect()
            })
            .unwrap_or_default()
    } else {
        options
            .data
            .series
            .iter()
            .map(|series| LegendItem {
                name: unescape_angle_brackets(&series.name),
                color: series.color.clone().unwrap_or_default(),
                legend_index: series.legend_index,
                is_visible: true,
            })
            .collect()
    }
}

pub fn get_legend(config: &LegendConfig, options: &ChartOptions) -> Legend {
    Legend {
        enabled: config.enabled && should_legend_be_enabled(options),
        position: config.position,
        items: get_legend_items(options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ChartType, Stacking};
    use crate::view::{AxisProps, ChartData, Point, Series};

    fn point(name: Option<&str>, color: Option<&str>, index: Option<usize>) -> Point {
        Point {
            y: Some(1.0),
            format: None,
            name: name.map(String::from),
            color: color.map(String::from),
            legend_index: index,
            marker: None,
            drilldown: false,
            drill_intersection: Default::default(),
        }
    }

    fn series(count: usize, points: usize) -> Vec<Series> {
        (0..count)
            .map(|i| Series {
                name: format!("Series {}", i),
                color: Some(format!("color{}", i)),
                legend_index: i,
                data: (0..points).map(|_| point(None, None, None)).collect(),
            })
            .collect()
    }

    fn options(chart_type: ChartType, series: Vec<Series>) -> ChartOptions {
        ChartOptions {
            chart_type,
            stacking: None,
            has_stack_by_attribute: false,
            has_view_by_attribute: true,
            data: ChartData {
                series,
                categories: Vec::new(),
            },
            color_palette: Vec::new(),
            x_axis_props: AxisProps::default(),
            y_axis_props: AxisProps::default(),
        }
    }

    #[test]
    fn test_single_series_has_no_legend() {
        assert!(!should_legend_be_enabled(&options(ChartType::Column, series(1, 3))));
        assert!(should_legend_be_enabled(&options(ChartType::Column, series(2, 3))));
    }

    #[test]
    fn test_stacked_chart_has_legend() {
        let mut stacked = options(ChartType::Column, series(1, 3));
        stacked.stacking = Some(Stacking::Normal);
        assert!(should_legend_be_enabled(&stacked));
    }

    #[test]
    fn test_area_with_one_series_has_no_legend() {
        let mut area = options(ChartType::Area, series(1, 3));
        area.stacking = Some(Stacking::Normal);
        assert!(!should_legend_be_enabled(&area));

        area.has_stack_by_attribute = true;
        assert!(should_legend_be_enabled(&area));
    }

    #[test]
    fn test_pie_legend_needs_more_than_one_slice() {
        assert!(!should_legend_be_enabled(&options(ChartType::Pie, series(1, 1))));
        assert!(should_legend_be_enabled(&options(ChartType::Doughnut, series(1, 2))));
        assert!(!should_legend_be_enabled(&options(ChartType::Pie, Vec::new())));
    }

    #[test]
    fn test_legend_items_for_series() {
        let items = get_legend_items(&options(ChartType::Line, series(2, 1)));
        assert_eq!(
            items[1],
            LegendItem {
                name: "Series 1".to_string(),
                color: "color1".to_string(),
                legend_index: 1,
                is_visible: true,
            }
        );
    }

    #[test]
    fn test_legend_item_names_are_unescaped() {
        let mut chart = options(ChartType::Column, series(1, 1));
        chart.data.series[0].name = "&lt;empty&gt;".to_string();
        assert_eq!(get_legend_items(&chart)[0].name, "<empty>");
    }

    #[test]
    fn test_legend_items_for_pie_slices() {
        let pie = options(
            ChartType::Pie,
            vec![Series {
                name: "Amount".to_string(),
                color: None,
                legend_index: 0,
                data: vec![
                    point(Some("East"), Some("red"), Some(0)),
                    point(Some("West"), Some("blue"), Some(1)),
                ],
            }],
        );
        let names: Vec<String> = get_legend_items(&pie).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["East", "West"]);
    }

    #[test]
    fn test_get_legend_respects_config() {
        let chart = options(ChartType::Bar, series(3, 1));

        let legend = get_legend(&LegendConfig::default(), &chart);
        assert!(legend.enabled);
        assert_eq!(legend.position, LegendPosition::Right);
        assert_eq!(legend.items.len(), 3);

        let disabled = LegendConfig {
            enabled: false,
            position: LegendPosition::Top,
        };
        let legend = get_legend(&disabled, &chart);
        assert!(!legend.enabled);
        assert_eq!(legend.position, LegendPosition::Top);
    }
}
