//! FILENAME: table-engine/src/drilling.rs
//! PURPOSE: Drillability of table headers and cells, and cell drill payloads.
//! CONTEXT: A measure column is drillable through the metadata object its
//! measure resolves to. An attribute column is drillable through its display
//! form, and a single attribute cell also through its element URI.

use execution::{
    get_attribute_element_id_from_uri, get_measure_uri_or_identifier, is_attribute_element_drillable,
    is_drillable, Afm, DrillContext, DrillElement, DrillEventData, DrillHeader,
    DrillIntersectionItem, DrillRowValue, DrillType, DrillableItem, ObjQualifier, TransformError,
    TransformResult,
};

use crate::view::{TableCell, TableHeader, TableRow};

/// Metadata object behind a column.
pub fn get_header_qualifier(afm: &Afm, header: &TableHeader) -> Option<ObjQualifier> {
    if header.is_measure() {
        get_measure_uri_or_identifier(afm, &header.local_identifier)
    } else {
        Some(header.qualifier()).filter(|qualifier| !qualifier.is_empty())
    }
}

pub fn is_header_drillable(afm: &Afm, header: &TableHeader, drillable_items: &[DrillableItem]) -> bool {
    get_header_qualifier(afm, header).is_some_and(|qualifier| is_drillable(&qualifier, drillable_items))
}

pub fn is_cell_drillable(
    afm: &Afm,
    header: &TableHeader,
    cell: &TableCell,
    drillable_items: &[DrillableItem],
) -> bool {
    if is_header_drillable(afm, header, drillable_items) {
        return true;
    }
    match cell {
        TableCell::Attribute(element) => is_attribute_element_drillable(&element.uri, drillable_items),
        TableCell::Measure(_) => false,
    }
}

fn row_for_drilling(row: &TableRow) -> Vec<DrillRowValue> {
    row.iter()
        .map(|cell| match cell {
            TableCell::Attribute(element) => DrillRowValue::Element {
                id: get_attribute_element_id_from_uri(&element.uri).to_string(),
                name: element.name.clone(),
            },
            TableCell::Measure(value) => DrillRowValue::Value(value.clone()),
        })
        .collect()
}

fn intersection_for_cell(
    afm: &Afm,
    header: &TableHeader,
    cell: &TableCell,
) -> TransformResult<DrillIntersectionItem> {
    match cell {
        TableCell::Attribute(element) => Ok(DrillIntersectionItem {
            id: get_attribute_element_id_from_uri(&element.uri).to_string(),
            title: element.name.clone(),
            header: DrillHeader::from_qualifier(&header.qualifier()),
        }),
        TableCell::Measure(_) => {
            let measure_ids = get_measure_uri_or_identifier(afm, &header.local_identifier)
                .ok_or_else(|| {
                    TransformError::MissingData(format!(
                        "Measure '{}' has not been found in execution request",
                        header.local_identifier
                    ))
                })?;
            Ok(DrillIntersectionItem {
                id: header.local_identifier.clone(),
                title: header.name.clone(),
                header: DrillHeader::from_qualifier(&measure_ids),
            })
        }
    }
}

/// Builds the drill payload for a click on the cell at (`row_index`, `column_index`).
pub fn build_cell_drill_event_data(
    afm: &Afm,
    headers: &[TableHeader],
    row: &TableRow,
    row_index: usize,
    column_index: usize,
) -> TransformResult<DrillEventData> {
    let header = headers.get(column_index).ok_or_else(|| {
        TransformError::MissingData(format!("No table header for column {}", column_index))
    })?;
    let cell = row.get(column_index).ok_or_else(|| {
        TransformError::MissingData(format!(
            "No table cell at row {} column {}",
            row_index, column_index
        ))
    })?;

    let mut drill_context = DrillContext::new(DrillType::Table, DrillElement::Cell);
    drill_context.column_index = Some(column_index);
    drill_context.row_index = Some(row_index);
    drill_context.row = Some(row_for_drilling(row));
    if let TableCell::Measure(value) = cell {
        drill_context.value = value.clone();
    }
    drill_context
        .intersection
        .push(intersection_for_cell(afm, header, cell)?);

    Ok(DrillEventData {
        execution_context: afm.clone(),
        drill_context,
    })
}
