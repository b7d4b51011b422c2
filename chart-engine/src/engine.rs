//! FILENAME: chart-engine/src/engine.rs
//! Chart Engine - Builds chart options from the execution triple.
//!
//! The measure group lives in either dimension. The first attribute of
//! dimension 0 stacks the series, the first attribute of dimension 1 spreads
//! the points along the category axis:
//! - `[measureGroup] x [viewBy]`: one series per measure
//! - `[stackBy] x [viewBy, measureGroup]`: one series per stack element
//!
//! Pie-like charts collapse everything into a single series whose points are
//! the view-by elements (first measure only) or, without a view-by attribute,
//! the measures themselves.

use execution::{
    get_attribute_element_id_from_uri, get_measure_uri_or_identifier,
    is_attribute_element_drillable, is_drillable, parse_value, Afm, AttributeHeader, DataValue,
    DrillHeader, DrillIntersectionItem, DrillableItem, ExecutionRequest, ExecutionResponse,
    ExecutionResult, Header, MeasureHeaderItem, ObjQualifier, ResultAttributeHeaderItem,
    ResultHeaderItem, TransformError, TransformResult,
};
use log::debug;

use crate::definition::ChartConfig;
use crate::view::{AxisProps, ChartData, ChartOptions, DrillIntersection, Point, PointMarker, Series};

// ============================================================================
// SOURCE LOOKUP
// ============================================================================

struct ChartMeasure<'a> {
    item: &'a MeasureHeaderItem,
    /// Durable identification, falling back to the response header.
    qualifier: ObjQualifier,
}

#[derive(Clone, Copy)]
struct ChartAttribute<'a> {
    header: &'a AttributeHeader,
    dimension: usize,
    header_index: usize,
}

impl<'a> ChartAttribute<'a> {
    fn find(response: &'a ExecutionResponse, dimension: usize) -> Option<Self> {
        response
            .dimensions
            .get(dimension)?
            .headers
            .iter()
            .enumerate()
            .find_map(|(header_index, header)| {
                header.as_attribute().map(|header| ChartAttribute {
                    header,
                    dimension,
                    header_index,
                })
            })
    }

    fn title(&self) -> String {
        if self.header.form_of.name.is_empty() {
            self.header.name.clone()
        } else {
            self.header.form_of.name.clone()
        }
    }
}

/// Everything the builders look up while walking the data matrix.
struct ChartSource<'a> {
    result: &'a ExecutionResult,
    drillable_items: &'a [DrillableItem],
    measures: Vec<ChartMeasure<'a>>,
    measure_dimension: usize,
    measure_header_index: usize,
    view_by: Option<ChartAttribute<'a>>,
    stack_by: Option<ChartAttribute<'a>>,
}

impl<'a> ChartSource<'a> {
    fn new(
        afm: &'a Afm,
        response: &'a ExecutionResponse,
        result: &'a ExecutionResult,
        drillable_items: &'a [DrillableItem],
    ) -> TransformResult<Self> {
        let (measure_dimension, measure_header_index, group) = response
            .dimensions
            .iter()
            .enumerate()
            .find_map(|(dimension, dim)| {
                dim.headers.iter().enumerate().find_map(|(index, header)| match header {
                    Header::MeasureGroupHeader(group) => Some((dimension, index, group)),
                    Header::AttributeHeader(_) => None,
                })
            })
            .ok_or_else(|| {
                TransformError::MissingData("Chart execution response has no measure group".to_string())
            })?;

        let measures = group
            .items
            .iter()
            .map(|group_item| {
                let item = group_item.measure_header_item.as_ref().ok_or_else(|| {
                    TransformError::MissingData("Missing expected measureHeaderItem".to_string())
                })?;
                let qualifier = get_measure_uri_or_identifier(afm, &item.local_identifier)
                    .unwrap_or_else(|| item.qualifier());
                Ok(ChartMeasure { item, qualifier })
            })
            .collect::<TransformResult<Vec<_>>>()?;

        Ok(ChartSource {
            result,
            drillable_items,
            measures,
            measure_dimension,
            measure_header_index,
            view_by: ChartAttribute::find(response, 1),
            stack_by: ChartAttribute::find(response, 0),
        })
    }

    fn data_rows(&self) -> TransformResult<Vec<Vec<Option<&'a str>>>> {
        let rows = self.result.data.as_list().ok_or_else(|| {
            TransformError::MissingData("Chart data is not a list".to_string())
        })?;
        rows.iter()
            .enumerate()
            .map(|(index, row)| match row {
                DataValue::Leaf(value) => Ok(vec![value.as_deref()]),
                DataValue::List(_) => row.leaves().ok_or_else(|| {
                    TransformError::MissingData(format!("Chart data row {} is nested too deep", index))
                }),
            })
            .collect()
    }

    /// Measure of the value at (`row`, `column`) of the data matrix.
    fn measure_at(&self, row: usize, column: usize) -> TransformResult<&ChartMeasure<'a>> {
        let position = if self.measure_dimension == 0 { row } else { column };
        let index = self
            .result
            .header_items_of(self.measure_dimension, self.measure_header_index)
            .and_then(|items| items.get(position))
            .and_then(|item| match item {
                ResultHeaderItem::MeasureHeaderItem(measure) => Some(measure.order as usize),
                _ => None,
            })
            .unwrap_or(if self.measures.len() == 1 { 0 } else { position });

        self.measures.get(index).ok_or_else(|| {
            TransformError::MissingData(format!("No measure for data position {}", position))
        })
    }

    fn element_at(&self, attribute: &ChartAttribute<'a>, position: usize) -> TransformResult<&'a ResultAttributeHeaderItem> {
        self.result
            .header_items_of(attribute.dimension, attribute.header_index)
            .and_then(|items| items.get(position))
            .and_then(ResultHeaderItem::as_attribute)
            .ok_or_else(|| {
                TransformError::MissingData(format!(
                    "Missing attribute header item [{}][{}][{}]",
                    attribute.dimension, attribute.header_index, position
                ))
            })
    }

    fn view_by_names(&self) -> Vec<String> {
        self.view_by
            .and_then(|view_by| self.result.header_items_of(view_by.dimension, view_by.header_index))
            .map(|items| items.iter().map(|item| item.name().to_string()).collect())
            .unwrap_or_default()
    }

    fn is_attribute_drillable(&self, attribute: &ChartAttribute<'a>, element: &ResultAttributeHeaderItem) -> bool {
        is_drillable(&attribute.header.qualifier(), self.drillable_items)
            || is_attribute_element_drillable(&element.uri, self.drillable_items)
    }

    /// Builds a point; the intersection is kept for drillable points only.
    fn point(&self, row: usize, column: usize, value: Option<&str>) -> TransformResult<Point> {
        let measure = self.measure_at(row, column)?;
        let view_element = match &self.view_by {
            Some(view_by) => Some((*view_by, self.element_at(view_by, column)?)),
            None => None,
        };
        let stack_element = match &self.stack_by {
            Some(stack_by) => Some((*stack_by, self.element_at(stack_by, row)?)),
            None => None,
        };

        let drilldown = is_drillable(&measure.qualifier, self.drillable_items)
            || view_element
                .iter()
                .chain(stack_element.iter())
                .any(|(attribute, element)| self.is_attribute_drillable(attribute, element));

        let mut drill_intersection = DrillIntersection::new();
        if drilldown {
            drill_intersection.push(DrillIntersectionItem {
                id: measure.item.local_identifier.clone(),
                title: measure.item.name.clone(),
                header: DrillHeader::from_qualifier(&measure.qualifier),
            });
            for (attribute, element) in view_element.iter().chain(stack_element.iter()) {
                drill_intersection.push(DrillIntersectionItem {
                    id: get_attribute_element_id_from_uri(&element.uri).to_string(),
                    title: element.name.clone(),
                    header: DrillHeader::from_qualifier(&attribute.header.qualifier()),
                });
            }
        }

        Ok(Point {
            y: value.and_then(parse_value),
            format: measure.item.format.clone(),
            name: None,
            color: None,
            legend_index: None,
            marker: None,
            drilldown,
            drill_intersection,
        })
    }

    // ------------------------------------------------------------------------
    // SERIES
    // ------------------------------------------------------------------------

    fn series(&self, palette: &[String]) -> TransformResult<Vec<Series>> {
        self.data_rows()?
            .into_iter()
            .enumerate()
            .map(|(row, values)| {
                let name = match &self.stack_by {
                    Some(stack_by) => self.element_at(stack_by, row)?.name.clone(),
                    None => self.measure_at(row, 0)?.item.name.clone(),
                };
                let data = values
                    .into_iter()
                    .enumerate()
                    .map(|(column, value)| {
                        let mut point = self.point(row, column, value)?;
                        point.marker = Some(PointMarker {
                            enabled: point.y.is_some(),
                        });
                        Ok(point)
                    })
                    .collect::<TransformResult<Vec<_>>>()?;

                Ok(Series {
                    name,
                    color: Some(palette_color(palette, row)),
                    legend_index: row,
                    data,
                })
            })
            .collect()
    }

    fn pie_series(&self, palette: &[String]) -> TransformResult<Vec<Series>> {
        let rows = self.data_rows()?;

        let (name, data) = match &self.view_by {
            Some(view_by) => {
                // Slices are the view-by elements of the first measure
                if rows.len() > 1 {
                    debug!("Pie chart shows the first of {} measures", rows.len());
                }
                let values = rows.into_iter().next().unwrap_or_default();
                let data = values
                    .into_iter()
                    .enumerate()
                    .map(|(column, value)| {
                        let mut point = self.point(0, column, value)?;
                        point.name = Some(self.element_at(view_by, column)?.name.clone());
                        Ok(slice(point, palette, column))
                    })
                    .collect::<TransformResult<Vec<_>>>()?;
                let name = self
                    .measures
                    .first()
                    .map(|measure| measure.item.name.clone())
                    .unwrap_or_default();
                (name, data)
            }
            None => {
                // One slice per measure
                let data = rows
                    .into_iter()
                    .enumerate()
                    .map(|(row, values)| {
                        let value = values.into_iter().next().flatten();
                        let mut point = self.point(row, 0, value)?;
                        point.name = Some(self.measure_at(row, 0)?.item.name.clone());
                        Ok(slice(point, palette, row))
                    })
                    .collect::<TransformResult<Vec<_>>>()?;
                (String::new(), data)
            }
        };

        Ok(vec![Series {
            name,
            color: None,
            legend_index: 0,
            data,
        }])
    }
}

fn palette_color(palette: &[String], index: usize) -> String {
    if palette.is_empty() {
        return String::new();
    }
    palette[index % palette.len()].clone()
}

fn slice(mut point: Point, palette: &[String], index: usize) -> Point {
    point.color = Some(palette_color(palette, index));
    point.legend_index = Some(index);
    point
}

// ============================================================================
// CHART TRANSFORMATION
// ============================================================================

pub struct ChartTransformation<'a> {
    request: &'a ExecutionRequest,
    response: &'a ExecutionResponse,
    result: &'a ExecutionResult,
    config: &'a ChartConfig,
    drillable_items: &'a [DrillableItem],
}

impl<'a> ChartTransformation<'a> {
    pub fn new(
        request: &'a ExecutionRequest,
        response: &'a ExecutionResponse,
        result: &'a ExecutionResult,
        config: &'a ChartConfig,
        drillable_items: &'a [DrillableItem],
    ) -> Self {
        ChartTransformation {
            request,
            response,
            result,
            config,
            drillable_items,
        }
    }

    pub fn calculate(&self) -> TransformResult<ChartOptions> {
        let chart_type = self.config.chart_type;

        // Step 1: Locate measures, view-by and stack-by attributes
        let source = ChartSource::new(&self.request.afm, self.response, self.result, self.drillable_items)?;

        // Step 2: Build series
        let color_palette = self.config.color_palette();
        let series = if chart_type.is_pie_like() {
            source.pie_series(&color_palette)?
        } else {
            source.series(&color_palette)?
        };

        // Step 3: Categories
        let categories = if source.view_by.is_some() {
            source.view_by_names()
        } else if chart_type.is_pie_like() {
            series
                .iter()
                .flat_map(|s| s.data.iter())
                .filter_map(|point| point.name.clone())
                .collect()
        } else {
            Vec::new()
        };

        // Step 4: Axes
        let x_axis_props = AxisProps {
            title: source.view_by.as_ref().map(ChartAttribute::title),
            format: None,
        };
        let y_axis_props = AxisProps {
            title: match source.measures.as_slice() {
                [only] => Some(only.item.name.clone()),
                _ => None,
            },
            format: source.measures.first().and_then(|m| m.item.format.clone()),
        };

        debug!(
            "Chart '{}' built: {} series, {} categories",
            chart_type,
            series.len(),
            categories.len()
        );

        Ok(ChartOptions {
            chart_type,
            stacking: self.config.resolved_stacking(),
            has_stack_by_attribute: source.stack_by.is_some(),
            has_view_by_attribute: source.view_by.is_some(),
            data: ChartData { series, categories },
            color_palette,
            x_axis_props,
            y_axis_props,
        })
    }
}

/// Builds chart options from an execution triple.
pub fn get_chart_options(
    request: &ExecutionRequest,
    response: &ExecutionResponse,
    result: &ExecutionResult,
    config: &ChartConfig,
    drillable_items: &[DrillableItem],
) -> TransformResult<ChartOptions> {
    ChartTransformation::new(request, response, result, config, drillable_items).calculate()
}
