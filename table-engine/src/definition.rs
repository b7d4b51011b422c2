//! FILENAME: table-engine/src/definition.rs
//! Table Definition - The serializable table configuration.
//!
//! Totals are owned by the caller: the table renders the totals it is given
//! and reports edits back as new total definitions.

use execution::DrillableItem;
use serde::{Deserialize, Serialize};

// ============================================================================
// TOTALS
// ============================================================================

/// Native total aggregations, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalType {
    Sum,
    Max,
    Min,
    Avg,
    Med,
    Nat,
}

/// Canonical display order of total rows.
pub const ORDERED_TOTAL_TYPES: [TotalType; 6] = [
    TotalType::Sum,
    TotalType::Max,
    TotalType::Min,
    TotalType::Avg,
    TotalType::Med,
    TotalType::Nat,
];

impl TotalType {
    /// Position in the canonical order.
    pub fn order(&self) -> usize {
        ORDERED_TOTAL_TYPES
            .iter()
            .position(|t| t == self)
            .unwrap_or(ORDERED_TOTAL_TYPES.len())
    }

    /// Default row label.
    pub fn label(&self) -> &'static str {
        match self {
            TotalType::Sum => "Sum",
            TotalType::Max => "Max",
            TotalType::Min => "Min",
            TotalType::Avg => "Avg",
            TotalType::Med => "Median",
            TotalType::Nat => "Rollup (Total)",
        }
    }
}

/// One total row requested for the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalDefinition {
    #[serde(rename = "type")]
    pub total_type: TotalType,

    /// Measure indexes (0-based among measure columns) showing this total.
    #[serde(default)]
    pub output_measure_indexes: Vec<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TotalDefinition {
    pub fn new(total_type: TotalType, output_measure_indexes: Vec<usize>) -> Self {
        TotalDefinition {
            total_type,
            output_measure_indexes,
            alias: None,
        }
    }
}

// ============================================================================
// TABLE OPTIONS
// ============================================================================

/// Caller configuration of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    pub totals: Vec<TotalDefinition>,

    /// Whether the user may add and remove totals.
    pub totals_edit_allowed: bool,

    pub totals_visible: bool,

    pub drillable_items: Vec<DrillableItem>,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            totals: Vec::new(),
            totals_edit_allowed: false,
            totals_visible: true,
            drillable_items: Vec::new(),
        }
    }
}
