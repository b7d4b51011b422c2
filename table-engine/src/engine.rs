//! FILENAME: table-engine/src/engine.rs
//! Table Engine - Transforms the execution triple into a table view.
//!
//! Every dimension but the last spans the rows: its attribute headers become
//! the leading columns and its positions the table rows. The last dimension
//! spans the columns and holds the measure group, one column per measure.
//! A response with a single dimension has row attributes only.

use execution::{
    AttributeHeader, DataValue, ExecutionRequest, ExecutionResponse, ExecutionResult, Header,
    MeasureHeaderItem, ResponseDimension, ResultHeaderItem, TransformError, TransformResult,
    ValidationError,
};
use log::debug;

use crate::definition::TableOptions;
use crate::drilling::{is_cell_drillable, is_header_drillable};
use crate::sort::{get_sort_info, get_sort_item};
use crate::totals::{build_total_rows, get_footer_height, get_totals_with_data};
use crate::view::{
    AttributeCell, TableCell, TableHeader, TableHeaderType, TableRow, TableView, TableViewCell,
};

// ============================================================================
// LAYOUT
// ============================================================================

/// Split of the response dimensions into row and column dimensions.
struct TableLayout<'a> {
    row_dimensions: &'a [ResponseDimension],
    column_dimension: Option<&'a ResponseDimension>,
}

impl<'a> TableLayout<'a> {
    fn from_response(response: &'a ExecutionResponse) -> Self {
        match response.dimensions.len() {
            0 | 1 => TableLayout {
                row_dimensions: &response.dimensions,
                column_dimension: None,
            },
            n => TableLayout {
                row_dimensions: &response.dimensions[..n - 1],
                column_dimension: response.dimensions.last(),
            },
        }
    }
}

fn unsupported_layout(message: &str) -> TransformError {
    TransformError::Validation(ValidationError::Malformed {
        context: "executionResponse.dimensions".to_string(),
        message: message.to_string(),
    })
}

fn attribute_header(header: &AttributeHeader) -> TableHeader {
    let name = if header.form_of.name.is_empty() {
        header.name.clone()
    } else {
        header.form_of.name.clone()
    };
    TableHeader {
        header_type: TableHeaderType::Attribute,
        local_identifier: header.local_identifier.clone(),
        name,
        uri: header.uri.clone(),
        identifier: header.identifier.clone(),
        format: None,
    }
}

fn measure_header(item: &MeasureHeaderItem) -> TableHeader {
    TableHeader {
        header_type: TableHeaderType::Measure,
        local_identifier: item.local_identifier.clone(),
        name: item.name.clone(),
        uri: item.uri.clone(),
        identifier: item.identifier.clone(),
        format: item.format.clone(),
    }
}

// ============================================================================
// HEADERS AND ROWS
// ============================================================================

/// Table columns: row attributes first, then the measures of the column dimension.
pub fn get_headers(response: &ExecutionResponse) -> TransformResult<Vec<TableHeader>> {
    let layout = TableLayout::from_response(response);
    let mut headers = Vec::new();

    for dimension in layout.row_dimensions {
        for header in &dimension.headers {
            match header {
                Header::AttributeHeader(attribute) => headers.push(attribute_header(attribute)),
                Header::MeasureGroupHeader(_) => {
                    return Err(unsupported_layout(
                        "Measure group is only supported in the column dimension",
                    ))
                }
            }
        }
    }

    if let Some(dimension) = layout.column_dimension {
        for header in &dimension.headers {
            match header {
                Header::MeasureGroupHeader(group) => {
                    for item in &group.items {
                        let measure = item.measure_header_item.as_ref().ok_or_else(|| {
                            TransformError::MissingData("Missing expected measureHeaderItem".to_string())
                        })?;
                        headers.push(measure_header(measure));
                    }
                }
                Header::AttributeHeader(_) => {
                    return Err(unsupported_layout(
                        "Attributes are not supported in the column dimension",
                    ))
                }
            }
        }
    }

    Ok(headers)
}

/// Number of row positions along one row dimension.
fn row_position_count(result: &ExecutionResult, dimension_index: usize, dimension: &ResponseDimension) -> usize {
    if dimension.headers.is_empty() {
        // Header-less dimension still nests the data one level
        return usize::from(!result.data.is_empty());
    }
    result
        .header_items_of(dimension_index, 0)
        .map_or(0, <[ResultHeaderItem]>::len)
}

fn measure_column_count(layout: &TableLayout<'_>) -> usize {
    layout.column_dimension.map_or(0, |dimension| {
        dimension
            .headers
            .iter()
            .map(|header| match header {
                Header::MeasureGroupHeader(group) => group.items.len(),
                Header::AttributeHeader(_) => 0,
            })
            .sum()
    })
}

fn data_row_at<'a>(data: &'a DataValue, path: &[usize]) -> TransformResult<Vec<Option<&'a str>>> {
    let mut node = data;
    for &position in path {
        node = node.get(position).ok_or_else(|| {
            TransformError::MissingData(format!("Missing data row at {:?}", path))
        })?;
    }
    node.leaves()
        .ok_or_else(|| TransformError::MissingData(format!("Data row at {:?} is not flat", path)))
}

/// The data must nest exactly `counts[level]` rows at every row level.
fn check_data_extent(node: &DataValue, counts: &[usize], level: usize) -> TransformResult<()> {
    let Some(&expected) = counts.get(level) else {
        return Ok(());
    };
    let actual = node.len();
    if actual != expected {
        return Err(TransformError::MissingData(format!(
            "Data has {} rows at level {} but the row headers have {} positions",
            actual, level, expected
        )));
    }
    node.as_list()
        .unwrap_or(&[])
        .iter()
        .try_for_each(|child| check_data_extent(child, counts, level + 1))
}

/// One row per row-dimension position: attribute element cells followed by
/// the measure values at that position.
pub fn get_rows(response: &ExecutionResponse, result: &ExecutionResult) -> TransformResult<Vec<TableRow>> {
    if response.dimensions.is_empty() {
        return Ok(Vec::new());
    }

    let layout = TableLayout::from_response(response);
    let counts: Vec<usize> = layout
        .row_dimensions
        .iter()
        .enumerate()
        .map(|(index, dimension)| row_position_count(result, index, dimension))
        .collect();
    let total_rows: usize = counts.iter().product();
    let measure_count = measure_column_count(&layout);
    if measure_count > 0 {
        check_data_extent(&result.data, &counts, 0)?;
    }

    let mut rows = Vec::with_capacity(total_rows);
    let mut path = vec![0usize; counts.len()];

    for _ in 0..total_rows {
        let mut row: TableRow = Vec::new();

        for (dimension_index, dimension) in layout.row_dimensions.iter().enumerate() {
            let position = path[dimension_index];
            for header_index in 0..dimension.headers.len() {
                let element = result
                    .header_items_of(dimension_index, header_index)
                    .and_then(|items| items.get(position))
                    .and_then(ResultHeaderItem::as_attribute)
                    .ok_or_else(|| {
                        TransformError::MissingData(format!(
                            "Missing attribute header item [{}][{}][{}]",
                            dimension_index, header_index, position
                        ))
                    })?;
                row.push(TableCell::Attribute(AttributeCell {
                    uri: element.uri.clone(),
                    name: element.name.clone(),
                }));
            }
        }

        if measure_count > 0 {
            let values = data_row_at(&result.data, &path)?;
            row.extend(values.into_iter().map(|v| TableCell::Measure(v.map(String::from))));
        }

        rows.push(row);

        // Advance the position odometer, last dimension fastest
        for index in (0..path.len()).rev() {
            path[index] += 1;
            if path[index] < counts[index] {
                break;
            }
            path[index] = 0;
        }
    }

    Ok(rows)
}

/// Every row must have exactly one cell per header.
pub fn validate_table_proportions(headers: &[TableHeader], rows: &[TableRow]) -> TransformResult<()> {
    match rows.iter().position(|row| row.len() != headers.len()) {
        Some(index) => Err(TransformError::MissingData(format!(
            "Number of table columns must be equal to number of table headers (row {}: {} cells, {} headers)",
            index,
            rows[index].len(),
            headers.len()
        ))),
        None => Ok(()),
    }
}

// ============================================================================
// TABLE TRANSFORMATION
// ============================================================================

/// Table transform over one execution triple.
pub struct TableTransformation<'a> {
    request: &'a ExecutionRequest,
    response: &'a ExecutionResponse,
    result: &'a ExecutionResult,
    options: &'a TableOptions,
}

impl<'a> TableTransformation<'a> {
    pub fn new(
        request: &'a ExecutionRequest,
        response: &'a ExecutionResponse,
        result: &'a ExecutionResult,
        options: &'a TableOptions,
    ) -> Self {
        TableTransformation {
            request,
            response,
            result,
            options,
        }
    }

    /// Executes the full transformation and returns the table view.
    pub fn calculate(&self) -> TransformResult<TableView> {
        // Step 1: Build headers
        let headers = get_headers(self.response)?;

        // Step 2: Build raw rows
        let rows = get_rows(self.response, self.result)?;

        // Step 3: Fail fast on ragged data
        validate_table_proportions(&headers, &rows)?;

        // Step 4: Attach totals
        let totals_with_data = get_totals_with_data(&self.options.totals, self.result);
        let totals = if self.options.totals_visible {
            build_total_rows(&totals_with_data, &headers)?
        } else {
            Vec::new()
        };

        // Step 5: Resolve the active sort
        let sort_info = get_sort_info(get_sort_item(self.request)?, &headers);

        // Step 6: Format cells with drillability
        let cells = self.format_cells(&headers, &rows);
        let drillable_headers = headers
            .iter()
            .map(|header| is_header_drillable(&self.request.afm, header, &self.options.drillable_items))
            .collect();

        debug!(
            "Table transformed: {} columns, {} rows, {} totals",
            headers.len(),
            rows.len(),
            totals.len()
        );

        Ok(TableView {
            headers,
            rows,
            cells,
            totals,
            sort_by: sort_info.sort_by,
            sort_dir: sort_info.sort_dir,
            drillable_headers,
            footer_height: get_footer_height(
                &self.options.totals,
                self.options.totals_edit_allowed,
                self.options.totals_visible,
            ),
        })
    }

    fn format_cells(&self, headers: &[TableHeader], rows: &[TableRow]) -> Vec<Vec<TableViewCell>> {
        let afm = &self.request.afm;
        let drillable_items = &self.options.drillable_items;

        rows.iter()
            .map(|row| {
                headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| {
                        let drillable = is_cell_drillable(afm, header, cell, drillable_items);
                        TableViewCell::from_cell(header, cell, drillable)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Calculates a table view from an execution triple.
pub fn calculate_table(
    request: &ExecutionRequest,
    response: &ExecutionResponse,
    result: &ExecutionResult,
    options: &TableOptions,
) -> TransformResult<TableView> {
    TableTransformation::new(request, response, result, options).calculate()
}
