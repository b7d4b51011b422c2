//! FILENAME: execution/src/model.rs
//! Execution Model - The wire contract with the data-execution engine.
//!
//! Three structures fully describe one computed query:
//! - `ExecutionRequest`: what was asked (the AFM plus the result layout)
//! - `ExecutionResponse`: how the result is shaped (headers per dimension)
//! - `ExecutionResult`: the data matrix and the header items along each axis
//!
//! Field names follow the engine's JSON exactly (camelCase).

use serde::{Deserialize, Serialize};

// ============================================================================
// OBJECT QUALIFIERS
// ============================================================================

/// Durable reference to a metadata object by URI and/or symbolic identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjQualifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl ObjQualifier {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        ObjQualifier {
            uri: Some(uri.into()),
            identifier: None,
        }
    }

    pub fn from_identifier(identifier: impl Into<String>) -> Self {
        ObjQualifier {
            uri: None,
            identifier: Some(identifier.into()),
        }
    }

    /// The URI, if present and non-empty.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref().filter(|s| !s.is_empty())
    }

    /// The identifier, if present and non-empty.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.uri().is_none() && self.identifier().is_none()
    }
}

// ============================================================================
// REQUEST (AFM + RESULT SPEC)
// ============================================================================

/// The executed query: attributes, measures, filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Afm {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<Measure>,

    /// Filters are carried through to drill payloads untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<serde_json::Value>,
}

impl Afm {
    pub fn find_measure(&self, local_identifier: &str) -> Option<&Measure> {
        self.measures
            .iter()
            .find(|m| m.local_identifier == local_identifier)
    }
}

/// An attribute requested by the AFM, referenced through its display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub local_identifier: String,

    pub display_form: ObjQualifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A measure requested by the AFM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    /// Request-scoped name for this measure.
    pub local_identifier: String,

    pub definition: MeasureDefinition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// How a measure is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureDefinition {
    /// Plain measure over a metadata object.
    Measure(SimpleMeasureDefinition),

    /// Same period previous year, derived from another measure of the AFM.
    PopMeasure(PopMeasureDefinition),

    /// Previous period, derived from another measure of the AFM.
    PreviousPeriodMeasure(PreviousPeriodMeasureDefinition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMeasureDefinition {
    pub item: ObjQualifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_ratio: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopMeasureDefinition {
    /// Local identifier of the master measure.
    pub measure_identifier: String,

    pub pop_attribute: ObjQualifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodMeasureDefinition {
    /// Local identifier of the master measure.
    pub measure_identifier: String,

    #[serde(default)]
    pub date_data_sets: Vec<serde_json::Value>,
}

/// Layout of the result: which items go to which dimension, and sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSpec {
    #[serde(default)]
    pub dimensions: Vec<ResultDimension>,

    #[serde(default)]
    pub sorts: Vec<SortItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDimension {
    #[serde(default)]
    pub item_identifiers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub totals: Vec<ResultTotal>,
}

/// A native total requested for one measure of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultTotal {
    pub measure_identifier: String,

    #[serde(rename = "type")]
    pub total_type: String,

    pub attribute_identifier: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortItem {
    AttributeSortItem(AttributeSortItem),
    MeasureSortItem(MeasureSortItem),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSortItem {
    pub direction: SortDirection,

    pub attribute_identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureSortItem {
    pub direction: SortDirection,

    #[serde(default)]
    pub locators: Vec<Locator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Locator {
    AttributeLocatorItem(AttributeLocatorItem),
    MeasureLocatorItem(MeasureLocatorItem),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeLocatorItem {
    pub attribute_identifier: String,
    pub element: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureLocatorItem {
    pub measure_identifier: String,
}

/// What was asked of the execution engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub afm: Afm,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_spec: Option<ResultSpec>,
}

impl ExecutionRequest {
    pub fn sorts(&self) -> &[SortItem] {
        self.result_spec
            .as_ref()
            .map(|spec| spec.sorts.as_slice())
            .unwrap_or(&[])
    }
}

// ============================================================================
// RESPONSE (DIMENSION HEADERS)
// ============================================================================

/// How the result is shaped: one entry per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    #[serde(default)]
    pub dimensions: Vec<ResponseDimension>,
}

impl ExecutionResponse {
    /// Items of the first measure group found in `dimension`.
    pub fn measure_group_items(&self, dimension: usize) -> Option<&[MeasureGroupItem]> {
        self.dimensions.get(dimension)?.headers.iter().find_map(|header| match header {
            Header::MeasureGroupHeader(group) => Some(group.items.as_slice()),
            Header::AttributeHeader(_) => None,
        })
    }

    /// Measure header items of every measure group, across all dimensions.
    pub fn measure_header_items(&self) -> impl Iterator<Item = &MeasureHeaderItem> {
        self.dimensions
            .iter()
            .flat_map(|dimension| dimension.headers.iter())
            .filter_map(|header| match header {
                Header::MeasureGroupHeader(group) => Some(group.items.iter()),
                Header::AttributeHeader(_) => None,
            })
            .flatten()
            .filter_map(|item| item.measure_header_item.as_ref())
    }

    pub fn find_measure_header_item(&self, local_identifier: &str) -> Option<&MeasureHeaderItem> {
        self.measure_header_items()
            .find(|item| item.local_identifier == local_identifier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDimension {
    #[serde(default)]
    pub headers: Vec<Header>,
}

/// One header group of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Header {
    MeasureGroupHeader(MeasureGroupHeader),
    AttributeHeader(AttributeHeader),
}

impl Header {
    pub fn as_attribute(&self) -> Option<&AttributeHeader> {
        match self {
            Header::AttributeHeader(header) => Some(header),
            Header::MeasureGroupHeader(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureGroupHeader {
    #[serde(default)]
    pub items: Vec<MeasureGroupItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureGroupItem {
    /// Absent only in broken responses; transforms report it as missing data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_header_item: Option<MeasureHeaderItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureHeaderItem {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    pub local_identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl MeasureHeaderItem {
    pub fn qualifier(&self) -> ObjQualifier {
        ObjQualifier {
            uri: self.uri.clone(),
            identifier: self.identifier.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeHeader {
    /// Display form name.
    pub name: String,

    pub local_identifier: String,

    /// Display form URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Display form identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// The attribute the display form belongs to.
    #[serde(default)]
    pub form_of: AttributeHeaderFormOf,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub total_items: Vec<serde_json::Value>,
}

impl AttributeHeader {
    /// Display-form qualifier used for drillability matching.
    pub fn qualifier(&self) -> ObjQualifier {
        ObjQualifier {
            uri: self.uri.clone(),
            identifier: self.identifier.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeHeaderFormOf {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

// ============================================================================
// RESULT (DATA + HEADER ITEMS)
// ============================================================================

/// One node of the nested data matrix. Leaves are numeric strings or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Leaf(Option<String>),
    List(Vec<DataValue>),
}

impl Default for DataValue {
    fn default() -> Self {
        DataValue::List(Vec::new())
    }
}

impl DataValue {
    pub fn as_list(&self) -> Option<&[DataValue]> {
        match self {
            DataValue::List(items) => Some(items),
            DataValue::Leaf(_) => None,
        }
    }

    /// `Some(value)` for a leaf, `None` for a nested list.
    pub fn as_leaf(&self) -> Option<Option<&str>> {
        match self {
            DataValue::Leaf(value) => Some(value.as_deref()),
            DataValue::List(_) => None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&DataValue> {
        self.as_list()?.get(index)
    }

    pub fn len(&self) -> usize {
        self.as_list().map_or(0, <[DataValue]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nesting depth along the first path, or `None` when that path ends
    /// in an empty list before reaching a leaf.
    pub fn depth(&self) -> Option<usize> {
        match self {
            DataValue::Leaf(_) => Some(0),
            DataValue::List(items) => items.first()?.depth().map(|d| d + 1),
        }
    }

    /// Leaves of a one-dimensional row. `None` if any element is nested.
    pub fn leaves(&self) -> Option<Vec<Option<&str>>> {
        self.as_list()?.iter().map(DataValue::as_leaf).collect()
    }
}

/// Header item along a result axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultHeaderItem {
    AttributeHeaderItem(ResultAttributeHeaderItem),
    MeasureHeaderItem(ResultMeasureHeaderItem),
    TotalHeaderItem(ResultTotalHeaderItem),
}

impl ResultHeaderItem {
    pub fn name(&self) -> &str {
        match self {
            ResultHeaderItem::AttributeHeaderItem(item) => &item.name,
            ResultHeaderItem::MeasureHeaderItem(item) => &item.name,
            ResultHeaderItem::TotalHeaderItem(item) => &item.name,
        }
    }

    pub fn as_attribute(&self) -> Option<&ResultAttributeHeaderItem> {
        match self {
            ResultHeaderItem::AttributeHeaderItem(item) => Some(item),
            _ => None,
        }
    }
}

/// An attribute element: its URI and display value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultAttributeHeaderItem {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMeasureHeaderItem {
    pub name: String,
    pub order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTotalHeaderItem {
    pub name: String,
}

/// Values computed by one total row: `[dimension][total][measure]`.
pub type TotalsData = Vec<Vec<Vec<Option<String>>>>;

/// The computed data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(default)]
    pub data: DataValue,

    /// `[dimension][header][item]`.
    #[serde(default)]
    pub header_items: Vec<Vec<Vec<ResultHeaderItem>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<TotalsData>,
}

impl ExecutionResult {
    /// Header items of `header` in `dimension`.
    pub fn header_items_of(&self, dimension: usize, header: usize) -> Option<&[ResultHeaderItem]> {
        self.header_items
            .get(dimension)?
            .get(header)
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_measure_definition_variants() {
        let afm: Afm = serde_json::from_value(json!({
            "measures": [
                {
                    "localIdentifier": "m1",
                    "definition": { "measure": { "item": { "uri": "/gdc/md/p/obj/1" } } }
                },
                {
                    "localIdentifier": "m1_pop",
                    "definition": {
                        "popMeasure": {
                            "measureIdentifier": "m1",
                            "popAttribute": { "identifier": "date.year" }
                        }
                    }
                }
            ]
        }))
        .unwrap();

        assert!(matches!(
            afm.find_measure("m1").unwrap().definition,
            MeasureDefinition::Measure(_)
        ));
        assert!(matches!(
            afm.find_measure("m1_pop").unwrap().definition,
            MeasureDefinition::PopMeasure(_)
        ));
        assert!(afm.find_measure("m2").is_none());
    }

    #[test]
    fn test_afm_serialization_skips_empty_lists() {
        let afm: Afm = serde_json::from_value(json!({
            "measures": [{
                "localIdentifier": "m1",
                "definition": { "measure": { "item": { "identifier": "metric.id" } } }
            }]
        }))
        .unwrap();

        let value = serde_json::to_value(&afm).unwrap();
        assert!(value.get("attributes").is_none());
        assert!(value.get("filters").is_none());
        assert_eq!(
            value["measures"][0]["definition"]["measure"]["item"]["identifier"],
            "metric.id"
        );
    }

    #[test]
    fn test_data_value_shapes() {
        let data: DataValue = serde_json::from_value(json!([["1", null], ["3", "4"]])).unwrap();
        assert_eq!(data.depth(), Some(2));
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(0).unwrap().leaves().unwrap(), vec![Some("1"), None]);

        let flat: DataValue = serde_json::from_value(json!(["42"])).unwrap();
        assert_eq!(flat.depth(), Some(1));
        assert_eq!(flat.get(0).unwrap().as_leaf(), Some(Some("42")));

        let empty = DataValue::default();
        assert_eq!(empty.depth(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_response_lookup_across_dimensions() {
        let response: ExecutionResponse = serde_json::from_value(json!({
            "dimensions": [
                { "headers": [] },
                { "headers": [{
                    "measureGroupHeader": { "items": [
                        { "measureHeaderItem": { "name": "Amount", "localIdentifier": "m1", "format": "#,##0" } }
                    ] }
                }] }
            ]
        }))
        .unwrap();

        assert!(response.measure_group_items(0).is_none());
        assert_eq!(response.measure_group_items(1).unwrap().len(), 1);
        assert_eq!(
            response.find_measure_header_item("m1").unwrap().name,
            "Amount"
        );
        assert!(response.find_measure_header_item("m2").is_none());
    }
}
