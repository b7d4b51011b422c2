//! FILENAME: table-engine/src/totals.rs
//! PURPOSE: Total rows of the table and the edits a user can make to them.
//! CONTEXT: The execution returns one value per measure for every requested
//! total (`result.totals[0][total][measure]`). A total row shows its label in
//! the first column and a value only under the measures listed in its
//! `output_measure_indexes`.

use execution::{format_value, ExecutionResult, TransformError, TransformResult};
use serde::{Deserialize, Serialize};

use crate::definition::{TotalDefinition, TotalType, ORDERED_TOTAL_TYPES};
use crate::view::{TableHeader, TotalCell, TotalRow};

/// Height of one total row.
pub const TOTAL_ROW_HEIGHT: u32 = 30;

/// Height of the row holding the add-total control.
pub const ADD_TOTAL_ROW_HEIGHT: u32 = 50;

/// A total definition together with its computed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalWithData {
    #[serde(rename = "type")]
    pub total_type: TotalType,

    pub output_measure_indexes: Vec<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// One value per measure column.
    pub values: Vec<Option<String>>,
}

impl TotalWithData {
    pub fn label(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| self.total_type.label().to_string())
    }
}

// ============================================================================
// TOTALS WITH DATA
// ============================================================================

/// Totals sorted into the canonical order (sum, max, min, avg, med, nat).
pub fn order_totals(totals: &[TotalDefinition]) -> Vec<TotalDefinition> {
    let mut ordered = totals.to_vec();
    ordered.sort_by_key(|total| total.total_type.order());
    ordered
}

/// Attaches the computed values to each total, in canonical order.
pub fn get_totals_with_data(totals: &[TotalDefinition], result: &ExecutionResult) -> Vec<TotalWithData> {
    let totals_data = result
        .totals
        .as_ref()
        .and_then(|dimensions| dimensions.first());

    order_totals(totals)
        .into_iter()
        .enumerate()
        .map(|(index, total)| TotalWithData {
            total_type: total.total_type,
            output_measure_indexes: total.output_measure_indexes,
            alias: total.alias,
            values: totals_data
                .and_then(|data| data.get(index))
                .cloned()
                .unwrap_or_default(),
        })
        .collect()
}

/// Index of the first measure column.
pub fn first_measure_index(headers: &[TableHeader]) -> Option<usize> {
    headers.iter().position(TableHeader::is_measure)
}

/// Lays out total rows column by column.
pub fn build_total_rows(
    totals_with_data: &[TotalWithData],
    headers: &[TableHeader],
) -> TransformResult<Vec<TotalRow>> {
    let measure_offset = first_measure_index(headers).unwrap_or(headers.len());

    totals_with_data
        .iter()
        .map(|total| {
            let label = total.label();
            let cells = headers
                .iter()
                .enumerate()
                .map(|(column, header)| {
                    if !header.is_measure() {
                        return Ok(if column == 0 {
                            TotalCell::Label(label.clone())
                        } else {
                            TotalCell::Blank
                        });
                    }

                    let measure_index = column - measure_offset;
                    if !total.output_measure_indexes.contains(&measure_index) {
                        // Measures-only tables carry the label in the first blank column
                        return Ok(if column == 0 {
                            TotalCell::Label(label.clone())
                        } else {
                            TotalCell::Blank
                        });
                    }

                    let value = total.values.get(measure_index).ok_or_else(|| {
                        TransformError::MissingData(format!(
                            "Missing {:?} total value for measure {}",
                            total.total_type, measure_index
                        ))
                    })?;
                    Ok(TotalCell::Value(format_value(
                        value.as_deref(),
                        header.format.as_deref(),
                    )))
                })
                .collect::<TransformResult<Vec<_>>>()?;

            Ok(TotalRow {
                total_type: total.total_type,
                label,
                cells,
            })
        })
        .collect()
}

// ============================================================================
// TOTALS EDITING
// ============================================================================

/// Adds `measure_index` to the total of `total_type`, creating the total if needed.
pub fn add_total(
    totals: &[TotalDefinition],
    total_type: TotalType,
    measure_index: usize,
) -> Vec<TotalDefinition> {
    let mut updated = totals.to_vec();
    match updated.iter_mut().find(|t| t.total_type == total_type) {
        Some(existing) => {
            if !existing.output_measure_indexes.contains(&measure_index) {
                existing.output_measure_indexes.push(measure_index);
                existing.output_measure_indexes.sort_unstable();
            }
        }
        None => updated.push(TotalDefinition::new(total_type, vec![measure_index])),
    }
    order_totals(&updated)
}

/// Removes the whole total row of `total_type`.
pub fn remove_total(totals: &[TotalDefinition], total_type: TotalType) -> Vec<TotalDefinition> {
    totals
        .iter()
        .filter(|t| t.total_type != total_type)
        .cloned()
        .collect()
}

/// Shows or hides the total of `total_type` under one measure.
pub fn toggle_measure_index(
    totals: &[TotalDefinition],
    total_type: TotalType,
    measure_index: usize,
) -> Vec<TotalDefinition> {
    totals
        .iter()
        .cloned()
        .map(|mut total| {
            if total.total_type == total_type {
                match total.output_measure_indexes.iter().position(|&i| i == measure_index) {
                    Some(pos) => {
                        total.output_measure_indexes.remove(pos);
                    }
                    None => {
                        total.output_measure_indexes.push(measure_index);
                        total.output_measure_indexes.sort_unstable();
                    }
                }
            }
            total
        })
        .collect()
}

/// Whether a total type not yet present remains to be added.
pub fn is_adding_more_totals_enabled(totals: &[TotalDefinition]) -> bool {
    ORDERED_TOTAL_TYPES
        .iter()
        .any(|total_type| totals.iter().all(|t| t.total_type != *total_type))
}

/// Pixel height of the footer holding the total rows and the add-total row.
pub fn get_footer_height(totals: &[TotalDefinition], edit_allowed: bool, totals_visible: bool) -> u32 {
    if !totals_visible {
        return 0;
    }
    let rows = totals.len() as u32 * TOTAL_ROW_HEIGHT;
    if edit_allowed {
        rows + ADD_TOTAL_ROW_HEIGHT
    } else {
        rows
    }
}
