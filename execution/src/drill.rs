//! FILENAME: execution/src/drill.rs
//! PURPOSE: Identifier resolution, drillability matching and drill events.
//! CONTEXT: A visual element (headline item, table cell, chart point) is
//! drillable when the metadata object behind it matches one of the caller's
//! declared drillable items. Clicking a drillable element produces a
//! `DrillEventData` payload which an optional interceptor may suppress before
//! it is dispatched to the host as a bubbling `"drill"` event.

use log::debug;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::model::{Afm, MeasureDefinition, ObjQualifier};

/// Name of the event dispatched to the host.
pub const DRILL_EVENT_NAME: &str = "drill";

// ============================================================================
// DRILLABLE ITEMS
// ============================================================================

/// Caller-declared drill target: matches by URI and/or identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrillableItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl DrillableItem {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        DrillableItem {
            uri: Some(uri.into()),
            identifier: None,
        }
    }

    pub fn from_identifier(identifier: impl Into<String>) -> Self {
        DrillableItem {
            uri: None,
            identifier: Some(identifier.into()),
        }
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref().filter(|s| !s.is_empty())
    }

    fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref().filter(|s| !s.is_empty())
    }
}

// ============================================================================
// RESOLUTION AND MATCHING
// ============================================================================

/// Resolves the metadata object behind a measure of the AFM.
///
/// Derived measures (period over period, previous period) resolve to the
/// master measure they are computed from.
pub fn get_measure_uri_or_identifier(afm: &Afm, local_identifier: &str) -> Option<ObjQualifier> {
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut current = local_identifier;

    loop {
        if !visited.insert(current) {
            debug!("Cyclic derived measure chain at '{}'", current);
            return None;
        }

        let measure = afm.find_measure(current)?;
        match &measure.definition {
            MeasureDefinition::Measure(simple) => return Some(simple.item.clone()),
            MeasureDefinition::PopMeasure(pop) => current = &pop.measure_identifier,
            MeasureDefinition::PreviousPeriodMeasure(pp) => current = &pp.measure_identifier,
        }
    }
}

/// True iff some drillable item shares a non-empty URI or identifier with `candidate`.
pub fn is_drillable(candidate: &ObjQualifier, drillable_items: &[DrillableItem]) -> bool {
    drillable_items.iter().any(|item| {
        let uri_match = matches!((item.uri(), candidate.uri()), (Some(a), Some(b)) if a == b);
        let identifier_match = matches!(
            (item.identifier(), candidate.identifier()),
            (Some(a), Some(b)) if a == b
        );
        uri_match || identifier_match
    })
}

/// Whether the measure `local_identifier` of the AFM is drillable.
pub fn is_measure_drillable(afm: &Afm, local_identifier: &str, drillable_items: &[DrillableItem]) -> bool {
    get_measure_uri_or_identifier(afm, local_identifier)
        .is_some_and(|qualifier| is_drillable(&qualifier, drillable_items))
}

/// Whether an attribute element, identified by its URI, is declared drillable.
pub fn is_attribute_element_drillable(element_uri: &str, drillable_items: &[DrillableItem]) -> bool {
    !element_uri.is_empty() && is_drillable(&ObjQualifier::from_uri(element_uri), drillable_items)
}

// ============================================================================
// DRILL EVENT PAYLOAD
// ============================================================================

/// Visualization that produced a drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillType {
    Headline,
    Table,
    Column,
    Bar,
    Line,
    Area,
    Pie,
    Doughnut,
}

/// Clicked element within the visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrillElement {
    PrimaryValue,
    SecondaryValue,
    Cell,
    Bar,
    Point,
    Slice,
}

/// Metadata object of one intersection item; absent ids are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillHeader {
    pub identifier: String,
    pub uri: String,
}

impl DrillHeader {
    pub fn from_qualifier(qualifier: &ObjQualifier) -> Self {
        DrillHeader {
            identifier: qualifier.identifier.clone().unwrap_or_default(),
            uri: qualifier.uri.clone().unwrap_or_default(),
        }
    }
}

/// One coordinate of the clicked point: a measure or an attribute element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillIntersectionItem {
    pub id: String,
    pub title: String,
    pub header: DrillHeader,
}

/// A table row as carried in a cell drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DrillRowValue {
    Element { id: String, name: String },
    Value(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillContext {
    #[serde(rename = "type")]
    pub drill_type: DrillType,

    pub element: DrillElement,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Category index of a chart point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    /// Value of a chart point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<Vec<DrillRowValue>>,

    pub intersection: Vec<DrillIntersectionItem>,
}

impl DrillContext {
    pub fn new(drill_type: DrillType, element: DrillElement) -> Self {
        DrillContext {
            drill_type,
            element,
            value: None,
            x: None,
            y: None,
            column_index: None,
            row_index: None,
            row: None,
            intersection: Vec::new(),
        }
    }
}

/// Payload of a drill event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillEventData {
    /// The AFM the visualization was computed from.
    pub execution_context: Afm,

    pub drill_context: DrillContext,
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Interceptor verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillDecision {
    Proceed,
    Suppress,
}

/// Host-side event as dispatched to a `DrillEventTarget`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillEvent {
    pub name: &'static str,
    pub bubbles: bool,
    pub cancelable: bool,
    pub detail: DrillEventData,
}

/// Host element receiving drill events.
pub trait DrillEventTarget {
    fn dispatch_event(&mut self, event: DrillEvent);
}

/// Caller hook invoked before any drill event is dispatched.
pub type DrillInterceptor<'a> = &'a dyn Fn(&DrillEventData) -> DrillDecision;

/// Runs the interceptor (if any) and dispatches the event unless suppressed.
/// Returns whether the event was dispatched.
pub fn fire_drill_event(
    interceptor: Option<DrillInterceptor<'_>>,
    data: DrillEventData,
    target: &mut dyn DrillEventTarget,
) -> bool {
    let decision = interceptor.map_or(DrillDecision::Proceed, |intercept| intercept(&data));
    if decision == DrillDecision::Suppress {
        debug!("Drill event suppressed by interceptor");
        return false;
    }

    target.dispatch_event(DrillEvent {
        name: DRILL_EVENT_NAME,
        bubbles: true,
        cancelable: true,
        detail: data,
    });
    true
}
