//! FILENAME: table-engine/src/sort.rs
//! PURPOSE: Maps the request sort onto a table column and back.
//! CONTEXT: A table supports at most one sort. The active sort is read from
//! the request's result spec, and a header click produces the sort item for
//! the next execution.

use execution::{
    AttributeSortItem, ExecutionRequest, Locator, MeasureLocatorItem, MeasureSortItem,
    SortDirection, SortItem, TransformError, TransformResult,
};
use serde::{Deserialize, Serialize};

use crate::view::{TableHeader, TableHeaderType};

/// Active sort of the table: column index and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortInfo {
    pub sort_by: Option<usize>,
    pub sort_dir: Option<SortDirection>,
}

/// The single sort item of the request, if any.
pub fn get_sort_item(request: &ExecutionRequest) -> TransformResult<Option<&SortItem>> {
    let sorts = request.sorts();
    if sorts.len() > 1 {
        return Err(TransformError::UnsupportedSort(format!(
            "Table allows only one sort, found {}",
            sorts.len()
        )));
    }
    Ok(sorts.first())
}

fn find_header(headers: &[TableHeader], header_type: TableHeaderType, local_identifier: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.header_type == header_type && h.local_identifier == local_identifier)
}

/// Column index and direction of the active sort, or no sort when the
/// sorted item is not a column of this table.
pub fn get_sort_info(sort_item: Option<&SortItem>, headers: &[TableHeader]) -> SortInfo {
    let (sort_by, direction) = match sort_item {
        Some(SortItem::AttributeSortItem(item)) => (
            find_header(headers, TableHeaderType::Attribute, &item.attribute_identifier),
            item.direction,
        ),
        Some(SortItem::MeasureSortItem(item)) => {
            let measure = item.locators.iter().find_map(|locator| match locator {
                Locator::MeasureLocatorItem(measure) => Some(measure.measure_identifier.as_str()),
                Locator::AttributeLocatorItem(_) => None,
            });
            (
                measure.and_then(|id| find_header(headers, TableHeaderType::Measure, id)),
                item.direction,
            )
        }
        None => return SortInfo::default(),
    };

    match sort_by {
        Some(index) => SortInfo {
            sort_by: Some(index),
            sort_dir: Some(direction),
        },
        None => SortInfo::default(),
    }
}

/// Direction to apply when `header` is clicked. `current` is the direction
/// of this column if it is the sorted one.
pub fn get_next_sort_dir(header: &TableHeader, current: Option<SortDirection>) -> SortDirection {
    match current {
        None if header.is_measure() => SortDirection::Desc,
        None => SortDirection::Asc,
        Some(SortDirection::Asc) => SortDirection::Desc,
        Some(SortDirection::Desc) => SortDirection::Asc,
    }
}

/// Sort item requesting `header` sorted in `direction`.
pub fn create_sort_item(header: &TableHeader, direction: SortDirection) -> SortItem {
    match header.header_type {
        TableHeaderType::Attribute => SortItem::AttributeSortItem(AttributeSortItem {
            direction,
            attribute_identifier: header.local_identifier.clone(),
            aggregation: None,
        }),
        TableHeaderType::Measure => SortItem::MeasureSortItem(MeasureSortItem {
            direction,
            locators: vec![Locator::MeasureLocatorItem(MeasureLocatorItem {
                measure_identifier: header.local_identifier.clone(),
            })],
        }),
    }
}
