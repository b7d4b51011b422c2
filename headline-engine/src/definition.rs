//! FILENAME: headline-engine/src/definition.rs
//! Headline Definition - The data behind a headline.
//!
//! A headline shows a primary measure value, optionally a secondary one, and
//! then a derived tertiary item with the relative change between them.

use execution::DrillElement;
use serde::{Deserialize, Serialize};

/// Local identifier of the derived comparison item.
pub const TERTIARY_ITEM_IDENTIFIER: &str = "tertiaryIdentifier";

/// Format applied to the derived comparison item.
pub const TERTIARY_ITEM_FORMAT: &str = "#,##0%";

/// Default title of the derived comparison item.
pub const DEFAULT_TERTIARY_TITLE: &str = "Versus";

/// One displayed headline value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineDataItem {
    /// Local identifier of the measure this value comes from.
    pub local_identifier: String,

    /// Measure name.
    pub title: String,

    /// Raw value as returned by the execution, `None` for null.
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    pub is_drillable: bool,
}

/// Data consumed by the headline view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineData {
    pub primary_item: HeadlineDataItem,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_item: Option<HeadlineDataItem>,

    /// Present whenever a secondary item is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_item: Option<HeadlineDataItem>,
}

/// What the user clicked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContext {
    pub local_identifier: String,

    pub element: DrillElement,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ItemContext {
    pub fn for_item(item: &HeadlineDataItem, element: DrillElement) -> Self {
        ItemContext {
            local_identifier: item.local_identifier.clone(),
            element,
            value: item.value.clone(),
        }
    }
}

/// Headline settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadlineOptions {
    /// Localized title of the tertiary item.
    pub tertiary_title: String,
}

impl Default for HeadlineOptions {
    fn default() -> Self {
        HeadlineOptions {
            tertiary_title: DEFAULT_TERTIARY_TITLE.to_string(),
        }
    }
}
