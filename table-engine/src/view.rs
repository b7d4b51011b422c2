//! FILENAME: table-engine/src/view.rs
//! Table View - The renderable output of the table engine.

use execution::{format_value, FormattedValue, ObjQualifier, SortDirection};
use serde::{Deserialize, Serialize};

use crate::definition::TotalType;

// ============================================================================
// HEADERS AND RAW ROWS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableHeaderType {
    Attribute,
    Measure,
}

/// One table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableHeader {
    #[serde(rename = "type")]
    pub header_type: TableHeaderType,

    pub local_identifier: String,

    pub name: String,

    /// Display form (attribute) or measure URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// Measure format pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TableHeader {
    pub fn is_measure(&self) -> bool {
        self.header_type == TableHeaderType::Measure
    }

    pub fn qualifier(&self) -> ObjQualifier {
        ObjQualifier {
            uri: self.uri.clone(),
            identifier: self.identifier.clone(),
        }
    }
}

/// An attribute element shown in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCell {
    pub uri: String,
    pub name: String,
}

/// Raw cell content: an attribute element or a measure value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableCell {
    Attribute(AttributeCell),
    Measure(Option<String>),
}

pub type TableRow = Vec<TableCell>;

// ============================================================================
// RENDERED CELLS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    Left,
    Right,
}

impl CellAlign {
    pub fn for_header(header: &TableHeader) -> Self {
        if header.is_measure() {
            CellAlign::Right
        } else {
            CellAlign::Left
        }
    }
}

/// A cell ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableViewCell {
    pub label: String,

    /// Rendered with the empty-value style.
    pub is_empty: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    pub align: CellAlign,

    pub is_drillable: bool,
}

impl TableViewCell {
    pub fn from_cell(header: &TableHeader, cell: &TableCell, is_drillable: bool) -> Self {
        let styled = get_styled_label(header, cell);
        TableViewCell {
            label: styled.display_value,
            is_empty: styled.is_value_empty,
            color: styled.color,
            background_color: styled.background_color,
            align: CellAlign::for_header(header),
            is_drillable,
        }
    }
}

/// Attribute cells show the element name, measure cells the formatted value.
pub fn get_styled_label(header: &TableHeader, cell: &TableCell) -> FormattedValue {
    match cell {
        TableCell::Attribute(element) => FormattedValue {
            display_value: element.name.clone(),
            is_value_empty: false,
            color: None,
            background_color: None,
        },
        TableCell::Measure(value) => format_value(value.as_deref(), header.format.as_deref()),
    }
}

// ============================================================================
// TOTAL ROWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum TotalCell {
    /// Total name, shown in the first column.
    Label(String),
    Value(FormattedValue),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRow {
    #[serde(rename = "type")]
    pub total_type: TotalType,

    pub label: String,

    /// One cell per table column.
    pub cells: Vec<TotalCell>,
}

// ============================================================================
// TABLE VIEW
// ============================================================================

/// Complete table output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub headers: Vec<TableHeader>,

    /// Raw rows, kept for drill payloads.
    pub rows: Vec<TableRow>,

    /// Formatted rows, aligned with `rows`.
    pub cells: Vec<Vec<TableViewCell>>,

    pub totals: Vec<TotalRow>,

    /// Column index of the active sort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<SortDirection>,

    /// Per column: whether the header itself is drillable.
    pub drillable_headers: Vec<bool>,

    /// Pixel height of the totals footer.
    pub footer_height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure_header(format: &str) -> TableHeader {
        TableHeader {
            header_type: TableHeaderType::Measure,
            local_identifier: "m1".to_string(),
            name: "Amount".to_string(),
            uri: None,
            identifier: None,
            format: Some(format.to_string()),
        }
    }

    #[test]
    fn test_styled_label_for_attribute() {
        let header = TableHeader {
            header_type: TableHeaderType::Attribute,
            local_identifier: "a1".to_string(),
            name: "Region".to_string(),
            uri: None,
            identifier: None,
            format: None,
        };
        let cell = TableCell::Attribute(AttributeCell {
            uri: "/gdc/md/p/obj/4/elements?id=1".to_string(),
            name: "East".to_string(),
        });

        let view = TableViewCell::from_cell(&header, &cell, false);
        assert_eq!(view.label, "East");
        assert_eq!(view.align, CellAlign::Left);
    }

    #[test]
    fn test_styled_label_for_measure() {
        let view = TableViewCell::from_cell(
            &measure_header("[red]#,##0.00"),
            &TableCell::Measure(Some("1234".to_string())),
            true,
        );
        assert_eq!(view.label, "1,234.00");
        assert_eq!(view.color.as_deref(), Some("#ff0000"));
        assert_eq!(view.align, CellAlign::Right);
        assert!(view.is_drillable);
    }

    #[test]
    fn test_null_measure_renders_empty_marker() {
        let view = TableViewCell::from_cell(&measure_header("#,##0"), &TableCell::Measure(None), false);
        assert!(view.is_empty);
        assert_eq!(view.label, execution::EMPTY_VALUE_MARKER);
    }

    #[test]
    fn test_cell_serialization_is_untagged() {
        let cells: Vec<TableCell> =
            serde_json::from_str(r#"[{ "uri": "/e/1", "name": "East" }, "12", null]"#).unwrap();
        assert!(matches!(cells[0], TableCell::Attribute(_)));
        assert_eq!(cells[1], TableCell::Measure(Some("12".to_string())));
        assert_eq!(cells[2], TableCell::Measure(None));
    }
}
