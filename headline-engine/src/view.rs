//! FILENAME: headline-engine/src/view.rs
//! Headline View - Formatted items ready for display.

use execution::{format_value, DrillElement, FormattedValue};
use serde::{Deserialize, Serialize};

use crate::definition::{HeadlineData, HeadlineDataItem, ItemContext};

/// One headline item with its label already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineItemView {
    pub title: String,
    pub value: FormattedValue,
    pub is_drillable: bool,
}

impl HeadlineItemView {
    pub fn from_item(item: &HeadlineDataItem) -> Self {
        HeadlineItemView {
            title: item.title.clone(),
            value: format_item_value(item),
            is_drillable: item.is_drillable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineView {
    pub primary: HeadlineItemView,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<HeadlineItemView>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary: Option<HeadlineItemView>,
}

impl HeadlineView {
    pub fn from_data(data: &HeadlineData) -> Self {
        HeadlineView {
            primary: HeadlineItemView::from_item(&data.primary_item),
            secondary: data.secondary_item.as_ref().map(HeadlineItemView::from_item),
            tertiary: data.tertiary_item.as_ref().map(HeadlineItemView::from_item),
        }
    }
}

/// Formats the raw value of an item with its own pattern.
pub fn format_item_value(item: &HeadlineDataItem) -> FormattedValue {
    format_value(item.value.as_deref(), item.format.as_deref())
}

/// Click context for `element`, or `None` when that item is not clickable.
pub fn click_context(data: &HeadlineData, element: DrillElement) -> Option<ItemContext> {
    let item = match element {
        DrillElement::PrimaryValue => Some(&data.primary_item),
        DrillElement::SecondaryValue => data.secondary_item.as_ref(),
        _ => None,
    }?;
    item.is_drillable
        .then(|| ItemContext::for_item(item, element))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, value: Option<&str>, format: Option<&str>, drillable: bool) -> HeadlineDataItem {
        HeadlineDataItem {
            local_identifier: id.to_string(),
            title: format!("Title {}", id),
            value: value.map(String::from),
            format: format.map(String::from),
            is_drillable: drillable,
        }
    }

    #[test]
    fn test_view_formats_every_item() {
        let data = HeadlineData {
            primary_item: item("m1", Some("1234.5"), Some("#,##0.00"), true),
            secondary_item: Some(item("m2", None, Some("#,##0"), false)),
            tertiary_item: Some(item("tertiaryIdentifier", None, Some("#,##0%"), false)),
        };

        let view = HeadlineView::from_data(&data);
        assert_eq!(view.primary.value.display_value, "1,234.50");
        assert!(view.primary.is_drillable);

        let secondary = view.secondary.unwrap();
        assert!(secondary.value.is_value_empty);
        assert_eq!(secondary.title, "Title m2");
    }

    #[test]
    fn test_click_context_only_for_drillable_items() {
        let data = HeadlineData {
            primary_item: item("m1", Some("10"), None, true),
            secondary_item: Some(item("m2", Some("5"), None, false)),
            tertiary_item: None,
        };

        let context = click_context(&data, DrillElement::PrimaryValue).unwrap();
        assert_eq!(context.local_identifier, "m1");
        assert_eq!(context.value.as_deref(), Some("10"));
        assert_eq!(context.element, DrillElement::PrimaryValue);

        assert!(click_context(&data, DrillElement::SecondaryValue).is_none());
        assert!(click_context(&data, DrillElement::Cell).is_none());
    }
}
