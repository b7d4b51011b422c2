//! FILENAME: headline-engine/src/engine.rs
//! Headline Engine - Builds headline data from the execution triple.
//!
//! Measure header items of the first dimension are paired with the data
//! values by position. The first two become the primary and secondary items;
//! a secondary item always brings the derived tertiary item along.

use execution::{
    fire_drill_event, get_measure_uri_or_identifier, is_measure_drillable, parse_value,
    DrillContext, DrillEventData, DrillEventTarget, DrillHeader, DrillIntersectionItem,
    DrillInterceptor, DrillType, DrillableItem, ExecutionRequest, ExecutionResponse,
    ExecutionResult, MeasureHeaderItem, TransformError, TransformResult,
};
use log::debug;

use crate::definition::{
    HeadlineData, HeadlineDataItem, HeadlineOptions, ItemContext, TERTIARY_ITEM_FORMAT,
    TERTIARY_ITEM_IDENTIFIER,
};
use crate::view::HeadlineView;

// ============================================================================
// DATA EXTRACTION
// ============================================================================

/// A measure header paired with its value.
struct ExecutionDataItem<'a> {
    header: &'a MeasureHeaderItem,
    value: Option<&'a str>,
}

fn get_execution_data<'a>(
    response: &'a ExecutionResponse,
    result: &'a ExecutionResult,
) -> TransformResult<Vec<ExecutionDataItem<'a>>> {
    let items = response.measure_group_items(0).unwrap_or(&[]);

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let value = result
                .data
                .get(index)
                .and_then(|node| node.as_leaf())
                .ok_or_else(|| {
                    TransformError::MissingData(
                        "Undefined execution value data for headline transformation".to_string(),
                    )
                })?;
            let header = item.measure_header_item.as_ref().ok_or_else(|| {
                TransformError::MissingData("Missing expected measureHeaderItem".to_string())
            })?;
            Ok(ExecutionDataItem { header, value })
        })
        .collect()
}

fn create_headline_data_item(data_item: &ExecutionDataItem<'_>) -> HeadlineDataItem {
    HeadlineDataItem {
        local_identifier: data_item.header.local_identifier.clone(),
        title: data_item.header.name.clone(),
        value: data_item.value.map(String::from),
        format: data_item.header.format.clone(),
        is_drillable: false,
    }
}

/// Relative change of primary against secondary, when both are numeric,
/// the secondary is non-zero and the change itself is non-zero.
fn compute_tertiary_value(primary: Option<&str>, secondary: Option<&str>) -> Option<String> {
    let primary = primary.and_then(parse_value)?;
    let secondary = secondary.and_then(parse_value)?;
    if secondary == 0.0 {
        return None;
    }

    let change = (primary - secondary) / secondary;
    (change.is_finite() && change != 0.0).then(|| change.to_string())
}

fn create_tertiary_item(
    execution_data: &[ExecutionDataItem<'_>],
    tertiary_title: &str,
) -> Option<HeadlineDataItem> {
    let secondary = execution_data.get(1)?;
    let primary_value = execution_data.first().and_then(|item| item.value);

    Some(HeadlineDataItem {
        local_identifier: TERTIARY_ITEM_IDENTIFIER.to_string(),
        title: tertiary_title.to_string(),
        value: compute_tertiary_value(primary_value, secondary.value),
        format: Some(TERTIARY_ITEM_FORMAT.to_string()),
        is_drillable: false,
    })
}

/// Builds headline data from the response headers and result values.
pub fn get_headline_data(
    response: &ExecutionResponse,
    result: &ExecutionResult,
    tertiary_title: &str,
) -> TransformResult<HeadlineData> {
    let execution_data = get_execution_data(response, result)?;

    let primary_item = execution_data
        .first()
        .map(create_headline_data_item)
        .ok_or_else(|| {
            TransformError::MissingData("Headline requires at least one measure".to_string())
        })?;

    Ok(HeadlineData {
        primary_item,
        secondary_item: execution_data.get(1).map(create_headline_data_item),
        tertiary_item: create_tertiary_item(&execution_data, tertiary_title),
    })
}

// ============================================================================
// DRILLING
// ============================================================================

/// Returns a copy of `data` with drillability resolved for the primary and
/// secondary items. The tertiary item is never drillable.
pub fn apply_drillable_items(
    data: &HeadlineData,
    drillable_items: &[DrillableItem],
    request: &ExecutionRequest,
) -> HeadlineData {
    let mut updated = data.clone();
    let afm = &request.afm;

    updated.primary_item.is_drillable =
        is_measure_drillable(afm, &updated.primary_item.local_identifier, drillable_items);

    if let Some(secondary) = updated.secondary_item.as_mut() {
        secondary.is_drillable = is_measure_drillable(afm, &secondary.local_identifier, drillable_items);
    }

    if let Some(tertiary) = updated.tertiary_item.as_mut() {
        tertiary.is_drillable = false;
    }

    updated
}

/// Builds the drill payload for a click on a headline item.
pub fn build_drill_event_data(
    item_context: &ItemContext,
    request: &ExecutionRequest,
    response: &ExecutionResponse,
) -> TransformResult<DrillEventData> {
    let header = response
        .measure_group_items(0)
        .unwrap_or(&[])
        .iter()
        .filter_map(|item| item.measure_header_item.as_ref())
        .find(|header| header.local_identifier == item_context.local_identifier)
        .ok_or_else(|| {
            TransformError::MissingData(
                "The metric uri has not been found in execution response!".to_string(),
            )
        })?;

    let measure_ids = get_measure_uri_or_identifier(&request.afm, &item_context.local_identifier)
        .ok_or_else(|| {
            TransformError::MissingData(
                "The metric ids has not been found in execution request!".to_string(),
            )
        })?;

    let mut drill_context = DrillContext::new(DrillType::Headline, item_context.element);
    drill_context.value = item_context.value.clone();
    drill_context.intersection.push(DrillIntersectionItem {
        id: header.local_identifier.clone(),
        title: header.name.clone(),
        header: DrillHeader::from_qualifier(&measure_ids),
    });

    Ok(DrillEventData {
        execution_context: request.afm.clone(),
        drill_context,
    })
}

// ============================================================================
// HEADLINE TRANSFORMATION
// ============================================================================

/// Headline transform over one execution triple.
pub struct HeadlineTransformation<'a> {
    request: &'a ExecutionRequest,
    response: &'a ExecutionResponse,
    result: &'a ExecutionResult,
    drillable_items: &'a [DrillableItem],
    options: HeadlineOptions,
}

impl<'a> HeadlineTransformation<'a> {
    pub fn new(
        request: &'a ExecutionRequest,
        response: &'a ExecutionResponse,
        result: &'a ExecutionResult,
        drillable_items: &'a [DrillableItem],
        options: HeadlineOptions,
    ) -> Self {
        HeadlineTransformation {
            request,
            response,
            result,
            drillable_items,
            options,
        }
    }

    /// Headline data with drillability applied.
    pub fn data(&self) -> TransformResult<HeadlineData> {
        // Step 1: Pair headers with values
        let data = get_headline_data(self.response, self.result, &self.options.tertiary_title)?;

        // Step 2: Resolve drillability
        let data = apply_drillable_items(&data, self.drillable_items, self.request);

        debug!(
            "Headline transformed: primary '{}', secondary {}",
            data.primary_item.local_identifier,
            data.secondary_item.is_some()
        );
        Ok(data)
    }

    /// Formatted headline ready for display.
    pub fn view(&self) -> TransformResult<HeadlineView> {
        self.data().map(|data| HeadlineView::from_data(&data))
    }

    /// Builds and fires the drill event for a clicked item.
    /// Returns whether the event was dispatched.
    pub fn handle_drill(
        &self,
        item_context: &ItemContext,
        interceptor: Option<DrillInterceptor<'_>>,
        target: &mut dyn DrillEventTarget,
    ) -> TransformResult<bool> {
        let event_data = build_drill_event_data(item_context, self.request, self.response)?;
        Ok(fire_drill_event(interceptor, event_data, target))
    }
}

/// Calculates headline data for a triple with default options.
pub fn calculate_headline(
    request: &ExecutionRequest,
    response: &ExecutionResponse,
    result: &ExecutionResult,
    drillable_items: &[DrillableItem],
) -> TransformResult<HeadlineData> {
    HeadlineTransformation::new(request, response, result, drillable_items, HeadlineOptions::default())
        .data()
}

#[cfg(test)]
mod tests {
    use super::*;
    use execution::{DrillDecision, DrillElement, DrillEvent};
    use serde_json::{json, Value};

    fn request_with_items(items: Value) -> ExecutionRequest {
        let measures: Vec<Value> = items
            .as_array()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                json!({
                    "localIdentifier": format!("m{}", i + 1),
                    "definition": { "measure": { "item": item } }
                })
            })
            .collect();
        serde_json::from_value(json!({ "afm": { "measures": measures } })).unwrap()
    }

    fn uri_request() -> ExecutionRequest {
        request_with_items(json!([{ "uri": "/gdc/md/project_id/obj/1" }]))
    }

    fn identifier_request() -> ExecutionRequest {
        request_with_items(json!([{ "identifier": "metric.lost" }]))
    }

    fn two_measure_request() -> ExecutionRequest {
        request_with_items(json!([
            { "uri": "/gdc/md/project_id/obj/1" },
            { "uri": "/gdc/md/project_id/obj/2" }
        ]))
    }

    fn response(measures: &[(&str, &str, &str)]) -> ExecutionResponse {
        let items: Vec<Value> = measures
            .iter()
            .map(|(id, name, format)| {
                json!({ "measureHeaderItem": { "localIdentifier": id, "name": name, "format": format } })
            })
            .collect();
        serde_json::from_value(json!({
            "dimensions": [{ "headers": [{ "measureGroupHeader": { "items": items } }] }]
        }))
        .unwrap()
    }

    fn single_response() -> ExecutionResponse {
        response(&[("m1", "Lost", "$#,##0.00")])
    }

    fn two_measure_response() -> ExecutionResponse {
        response(&[("m1", "Lost", "$#,##0.00"), ("m2", "Found", "$#,##0.00")])
    }

    fn result(values: Value) -> ExecutionResult {
        serde_json::from_value(json!({ "data": values })).unwrap()
    }

    fn item(id: &str, title: &str, value: &str, drillable: bool) -> HeadlineDataItem {
        HeadlineDataItem {
            local_identifier: id.to_string(),
            title: title.to_string(),
            value: Some(value.to_string()),
            format: None,
            is_drillable: drillable,
        }
    }

    #[derive(Default)]
    struct RecordingTarget {
        events: Vec<DrillEvent>,
    }

    impl DrillEventTarget for RecordingTarget {
        fn dispatch_event(&mut self, event: DrillEvent) {
            self.events.push(event);
        }
    }

    #[test]
    fn test_primary_item_from_result() {
        let data = get_headline_data(&single_response(), &result(json!(["42470571.16"])), "Versus")
            .unwrap();

        assert_eq!(
            data,
            HeadlineData {
                primary_item: HeadlineDataItem {
                    local_identifier: "m1".to_string(),
                    title: "Lost".to_string(),
                    value: Some("42470571.16".to_string()),
                    format: Some("$#,##0.00".to_string()),
                    is_drillable: false,
                },
                secondary_item: None,
                tertiary_item: None,
            }
        );
    }

    #[test]
    fn test_secondary_and_tertiary_items() {
        let data = get_headline_data(&two_measure_response(), &result(json!(["120", "100"])), "Versus")
            .unwrap();

        let secondary = data.secondary_item.unwrap();
        assert_eq!(secondary.local_identifier, "m2");
        assert_eq!(secondary.value.as_deref(), Some("100"));

        let tertiary = data.tertiary_item.unwrap();
        assert_eq!(tertiary.local_identifier, "tertiaryIdentifier");
        assert_eq!(tertiary.title, "Versus");
        assert_eq!(tertiary.value.as_deref(), Some("0.2"));
        assert_eq!(tertiary.format.as_deref(), Some("#,##0%"));
        assert!(!tertiary.is_drillable);
    }

    #[test]
    fn test_tertiary_value_null_when_secondary_is_zero_or_missing() {
        let zero = get_headline_data(&two_measure_response(), &result(json!(["120", "0"])), "Versus")
            .unwrap();
        assert_eq!(zero.tertiary_item.unwrap().value, None);

        let null = get_headline_data(&two_measure_response(), &result(json!(["120", null])), "Versus")
            .unwrap();
        assert_eq!(null.tertiary_item.unwrap().value, None);

        let primary_null =
            get_headline_data(&two_measure_response(), &result(json!([null, "10"])), "Versus").unwrap();
        assert_eq!(primary_null.tertiary_item.unwrap().value, None);
    }

    #[test]
    fn test_tertiary_value_zero_change_is_null() {
        let data = get_headline_data(&two_measure_response(), &result(json!(["50", "50"])), "Versus")
            .unwrap();
        let tertiary = data.tertiary_item.unwrap();
        assert_eq!(tertiary.value, None);
        assert!(!tertiary.is_drillable);
    }

    #[test]
    fn test_custom_tertiary_title() {
        let data = get_headline_data(&two_measure_response(), &result(json!(["1", "2"])), "Compared to")
            .unwrap();
        assert_eq!(data.tertiary_item.unwrap().title, "Compared to");
    }

    #[test]
    fn test_missing_value_is_missing_data() {
        let err = get_headline_data(&single_response(), &result(json!([])), "Versus").unwrap_err();
        assert_eq!(
            err,
            TransformError::MissingData(
                "Undefined execution value data for headline transformation".to_string()
            )
        );
    }

    #[test]
    fn test_missing_measure_header_item_is_missing_data() {
        let response: ExecutionResponse = serde_json::from_value(json!({
            "dimensions": [{ "headers": [{ "measureGroupHeader": { "items": [{}] } }] }]
        }))
        .unwrap();
        let err = get_headline_data(&response, &result(json!(["1"])), "Versus").unwrap_err();
        assert!(matches!(err, TransformError::MissingData(_)));
    }

    #[test]
    fn test_no_measures_is_missing_data() {
        let err = get_headline_data(&ExecutionResponse::default(), &result(json!(["1"])), "Versus")
            .unwrap_err();
        assert!(matches!(err, TransformError::MissingData(_)));
    }

    #[test]
    fn test_reset_drilling_when_nothing_matches() {
        let data = HeadlineData {
            primary_item: item("m1", "Lost", "120", true),
            secondary_item: None,
            tertiary_item: None,
        };
        let drillable = vec![DrillableItem {
            uri: Some("some-uri".to_string()),
            identifier: Some("some-identifier".to_string()),
        }];

        let updated = apply_drillable_items(&data, &drillable, &uri_request());
        assert!(!updated.primary_item.is_drillable);
    }

    #[test]
    fn test_enable_drilling_by_uri_and_identifier() {
        let data = HeadlineData {
            primary_item: item("m1", "Lost", "120", false),
            secondary_item: None,
            tertiary_item: None,
        };

        let by_uri = apply_drillable_items(
            &data,
            &[DrillableItem::from_uri("/gdc/md/project_id/obj/1")],
            &uri_request(),
        );
        assert!(by_uri.primary_item.is_drillable);

        let by_identifier = apply_drillable_items(
            &data,
            &[DrillableItem::from_identifier("metric.lost")],
            &identifier_request(),
        );
        assert!(by_identifier.primary_item.is_drillable);
    }

    #[test]
    fn test_apply_drillable_items_leaves_input_untouched() {
        let data = HeadlineData {
            primary_item: item("m1", "Lost", "120", false),
            secondary_item: Some(item("m2", "Found", "100", false)),
            tertiary_item: Some(item("tertiaryIdentifier", "Versus", "0.2", false)),
        };
        let snapshot = data.clone();

        let updated = apply_drillable_items(
            &data,
            &[
                DrillableItem::from_uri("/gdc/md/project_id/obj/1"),
                DrillableItem::from_uri("/gdc/md/project_id/obj/2"),
            ],
            &two_measure_request(),
        );

        assert_eq!(data, snapshot);
        assert!(updated.primary_item.is_drillable);
        assert!(updated.secondary_item.unwrap().is_drillable);
        assert!(!updated.tertiary_item.unwrap().is_drillable);
    }

    #[test]
    fn test_build_drill_event_data_with_uri() {
        let context = ItemContext {
            local_identifier: "m1".to_string(),
            element: DrillElement::PrimaryValue,
            value: Some("42".to_string()),
        };
        let event = build_drill_event_data(&context, &uri_request(), &single_response()).unwrap();

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "executionContext": {
                    "measures": [{
                        "localIdentifier": "m1",
                        "definition": { "measure": { "item": { "uri": "/gdc/md/project_id/obj/1" } } }
                    }]
                },
                "drillContext": {
                    "type": "headline",
                    "element": "primaryValue",
                    "value": "42",
                    "intersection": [{
                        "id": "m1",
                        "title": "Lost",
                        "header": { "identifier": "", "uri": "/gdc/md/project_id/obj/1" }
                    }]
                }
            })
        );
    }

    #[test]
    fn test_build_drill_event_data_with_identifier() {
        let context = ItemContext {
            local_identifier: "m1".to_string(),
            element: DrillElement::PrimaryValue,
            value: Some("42".to_string()),
        };
        let event = build_drill_event_data(&context, &identifier_request(), &single_response()).unwrap();

        let header = &event.drill_context.intersection[0].header;
        assert_eq!(header.identifier, "metric.lost");
        assert_eq!(header.uri, "");
    }

    #[test]
    fn test_build_drill_event_data_unknown_item() {
        let context = ItemContext {
            local_identifier: "m9".to_string(),
            element: DrillElement::PrimaryValue,
            value: Some("42".to_string()),
        };
        let err = build_drill_event_data(&context, &uri_request(), &single_response()).unwrap_err();
        assert_eq!(
            err,
            TransformError::MissingData(
                "The metric uri has not been found in execution response!".to_string()
            )
        );
    }

    #[test]
    fn test_build_drill_event_data_measure_missing_in_request() {
        let context = ItemContext {
            local_identifier: "m2".to_string(),
            element: DrillElement::SecondaryValue,
            value: None,
        };
        let err = build_drill_event_data(&context, &uri_request(), &two_measure_response())
            .unwrap_err();
        assert!(matches!(err, TransformError::MissingData(_)));
    }

    #[test]
    fn test_transformation_end_to_end() {
        let request = uri_request();
        let response = single_response();
        let result = result(json!(["42470571.16"]));
        let drillable = vec![DrillableItem::from_uri("/gdc/md/project_id/obj/1")];
        let transformation = HeadlineTransformation::new(
            &request,
            &response,
            &result,
            &drillable,
            HeadlineOptions::default(),
        );

        let view = transformation.view().unwrap();
        assert_eq!(view.primary.value.display_value, "$42,470,571.16");
        assert!(view.primary.is_drillable);

        let context = crate::view::click_context(&transformation.data().unwrap(), DrillElement::PrimaryValue)
            .unwrap();
        let mut target = RecordingTarget::default();
        assert!(transformation.handle_drill(&context, None, &mut target).unwrap());
        assert_eq!(target.events.len(), 1);
        assert_eq!(target.events[0].detail.drill_context.value.as_deref(), Some("42470571.16"));

        let suppress = |_: &DrillEventData| DrillDecision::Suppress;
        assert!(!transformation.handle_drill(&context, Some(&suppress), &mut target).unwrap());
        assert_eq!(target.events.len(), 1);
    }

    #[test]
    fn test_transformation_is_idempotent() {
        let request = two_measure_request();
        let response = two_measure_response();
        let result = result(json!(["120", "100"]));
        let drillable = vec![DrillableItem::from_uri("/gdc/md/project_id/obj/2")];

        let first = calculate_headline(&request, &response, &result, &drillable).unwrap();
        let second = calculate_headline(&request, &response, &result, &drillable).unwrap();
        assert_eq!(first, second);
        assert!(!first.primary_item.is_drillable);
        assert!(first.secondary_item.unwrap().is_drillable);
    }
}
