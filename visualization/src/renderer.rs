//! FILENAME: visualization/src/renderer.rs
//! PURPOSE: Per-chart renderer state between data assignments.
//! CONTEXT: A mounted chart keeps the outcome of its last assignment so it
//! can re-render, answer clicks and build its legend without recomputing.
//! Every assignment recomputes; `invalidate` drops the memo explicitly.

use chart_engine::{
    assign_chart_options, get_legend, get_renderer_configuration, get_tooltip, handle_point_click,
    ActiveChartRegistry, ChartCallbacks, ChartConfig, ChartId, ChartOptions, ChartOutcome, Legend,
    RendererConfiguration, TooltipRow,
};
use execution::{
    abbreviate_number, Afm, DrillEventTarget, DrillInterceptor, DrillableItem, ExecutionRequest,
    ExecutionResponse, ExecutionResult, NumericSymbols, TransformError, TransformResult,
};
use log::debug;

/// Everything the external charting library needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRendererProps {
    pub chart_options: ChartOptions,
    pub configuration: RendererConfiguration,
    pub legend: Legend,
    pub numeric_symbols: NumericSymbols,
}

impl ChartRendererProps {
    /// Y axis label for `value`, abbreviated with the configured symbols.
    pub fn axis_label(&self, value: f64) -> String {
        abbreviate_number(value, &self.numeric_symbols)
    }
}

struct AssignedChart {
    afm: Afm,
    outcome: ChartOutcome,
}

pub struct ChartRenderer {
    id: ChartId,
    config: ChartConfig,
    numeric_symbols: NumericSymbols,
    assigned: Option<AssignedChart>,
}

impl ChartRenderer {
    pub fn new(id: ChartId, config: ChartConfig, numeric_symbols: NumericSymbols) -> Self {
        ChartRenderer {
            id,
            config,
            numeric_symbols,
            assigned: None,
        }
    }

    pub fn id(&self) -> ChartId {
        self.id
    }

    /// Recomputes chart options for new data and remembers the outcome.
    pub fn assign(
        &mut self,
        request: &ExecutionRequest,
        response: &ExecutionResponse,
        result: &ExecutionResult,
        drillable_items: &[DrillableItem],
        callbacks: &mut ChartCallbacks<'_>,
    ) -> TransformResult<&ChartOutcome> {
        // A failed assignment must not leave stale options behind
        self.assigned = None;

        let outcome = assign_chart_options(request, response, result, &self.config, drillable_items, callbacks)?;
        debug!("Chart {} assigned, renderable: {}", self.id, outcome.is_renderable());

        let assigned = self.assigned.insert(AssignedChart {
            afm: request.afm.clone(),
            outcome,
        });
        Ok(&assigned.outcome)
    }

    pub fn invalidate(&mut self) {
        self.assigned = None;
    }

    pub fn outcome(&self) -> Option<&ChartOutcome> {
        self.assigned.as_ref().map(|assigned| &assigned.outcome)
    }

    /// Last assigned options, renderable or not.
    pub fn chart_options(&self) -> Option<&ChartOptions> {
        self.outcome().map(ChartOutcome::options)
    }

    /// Render props, or `None` when nothing is assigned or the chart was suppressed.
    pub fn render(&self) -> Option<ChartRendererProps> {
        match self.outcome()? {
            ChartOutcome::Render(options) => Some(ChartRendererProps {
                chart_options: options.clone(),
                configuration: get_renderer_configuration(options),
                legend: get_legend(&self.config.legend, options),
                numeric_symbols: self.numeric_symbols.clone(),
            }),
            ChartOutcome::Suppressed { .. } => None,
        }
    }

    pub fn tooltip(&self, series_index: usize, point_index: usize) -> Option<Vec<TooltipRow>> {
        get_tooltip(self.chart_options()?, series_index, point_index)
    }

    /// Fires a drill event for a clicked point of the rendered chart.
    pub fn handle_click(
        &self,
        series_index: usize,
        point_index: usize,
        interceptor: Option<DrillInterceptor<'_>>,
        target: &mut dyn DrillEventTarget,
    ) -> TransformResult<bool> {
        let assigned = self.assigned.as_ref().ok_or_else(|| {
            TransformError::MissingData(format!("Chart {} has no assigned data", self.id))
        })?;
        let options = assigned.outcome.options();
        let point = options.point(series_index, point_index).ok_or_else(|| {
            TransformError::MissingData(format!(
                "Chart {} has no point [{}][{}]",
                self.id, series_index, point_index
            ))
        })?;
        handle_point_click(
            &assigned.afm,
            options.chart_type,
            point,
            point_index,
            interceptor,
            target,
        )
    }

    /// Registers a tap; returns the chart whose tooltip must be dismissed.
    pub fn handle_tap(&self, registry: &mut ActiveChartRegistry) -> Option<ChartId> {
        registry.activate(self.id)
    }

    pub fn unmount(&mut self, registry: &mut ActiveChartRegistry) {
        registry.clear(self.id);
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_engine::ChartType;
    use execution::DrillEvent;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingTarget {
        events: Vec<DrillEvent>,
    }

    impl DrillEventTarget for RecordingTarget {
        fn dispatch_event(&mut self, event: DrillEvent) {
            self.events.push(event);
        }
    }

    fn triple(values: serde_json::Value) -> (ExecutionRequest, ExecutionResponse, ExecutionResult) {
        let request = serde_json::from_value(json!({
            "afm": {
                "measures": [
                    { "localIdentifier": "m1", "definition": { "measure": { "item": { "uri": "/gdc/md/p/obj/1" } } } },
                    { "localIdentifier": "m2", "definition": { "measure": { "item": { "uri": "/gdc/md/p/obj/2" } } } }
                ]
            }
        }))
        .unwrap();
        let response = serde_json::from_value(json!({
            "dimensions": [
                { "headers": [{ "measureGroupHeader": { "items": [
                    { "measureHeaderItem": { "name": "Amount", "localIdentifier": "m1", "format": "#,##0" } },
                    { "measureHeaderItem": { "name": "Count", "localIdentifier": "m2", "format": "#,##0" } }
                ] } }] },
                { "headers": [{ "attributeHeader": {
                    "name": "Region", "localIdentifier": "a1", "uri": "/gdc/md/p/obj/5",
                    "formOf": { "name": "Region" }
                } }] }
            ]
        }))
        .unwrap();
        let result = serde_json::from_value(json!({
            "data": values,
            "headerItems": [
                [[
                    { "measureHeaderItem": { "name": "Amount", "order": 0 } },
                    { "measureHeaderItem": { "name": "Count", "order": 1 } }
                ]],
                [[
                    { "attributeHeaderItem": { "uri": "/gdc/md/p/obj/4/elements?id=1", "name": "East" } },
                    { "attributeHeaderItem": { "uri": "/gdc/md/p/obj/4/elements?id=2", "name": "West" } }
                ]]
            ]
        }))
        .unwrap();
        (request, response, result)
    }

    fn assign(renderer: &mut ChartRenderer, values: serde_json::Value, items: &[DrillableItem]) -> bool {
        let (request, response, result) = triple(values);
        let mut on_data_too_large = |_: &ChartOptions| {};
        let mut callbacks = ChartCallbacks {
            on_data_too_large: &mut on_data_too_large,
            on_negative_values: None,
        };
        renderer
            .assign(&request, &response, &result, items, &mut callbacks)
            .unwrap()
            .is_renderable()
    }

    #[test]
    fn test_render_after_assign() {
        let mut renderer = ChartRenderer::new(1, ChartConfig::new(ChartType::Column), NumericSymbols::default());
        assert!(renderer.render().is_none());

        assert!(assign(&mut renderer, json!([["1500", "20"], ["3", "4"]]), &[]));
        let props = renderer.render().unwrap();
        assert_eq!(props.chart_options.data.series.len(), 2);
        assert!(props.legend.enabled);
        assert_eq!(props.legend.items.len(), 2);
        assert_eq!(props.configuration.categories, vec!["East", "West"]);
        assert_eq!(props.axis_label(1500.0), "1.5k");
    }

    #[test]
    fn test_every_assignment_recomputes() {
        let mut renderer = ChartRenderer::new(1, ChartConfig::new(ChartType::Line), NumericSymbols::default());
        assign(&mut renderer, json!([["1", "2"], ["3", "4"]]), &[]);
        assign(&mut renderer, json!([["10", "20"], ["30", "40"]]), &[]);
        let options = renderer.chart_options().unwrap();
        assert_eq!(options.data.series[1].data[1].y, Some(40.0));
    }

    #[test]
    fn test_invalidate_drops_memo() {
        let mut renderer = ChartRenderer::new(1, ChartConfig::new(ChartType::Bar), NumericSymbols::default());
        assign(&mut renderer, json!([["1", "2"], ["3", "4"]]), &[]);
        renderer.invalidate();
        assert!(renderer.chart_options().is_none());
        assert!(renderer.render().is_none());
    }

    #[test]
    fn test_suppressed_chart_does_not_render() {
        let mut config = ChartConfig::new(ChartType::Column);
        config.limits.series = 1;
        let mut renderer = ChartRenderer::new(1, config, NumericSymbols::default());

        assert!(!assign(&mut renderer, json!([["1", "2"], ["3", "4"]]), &[]));
        assert!(renderer.render().is_none());
        assert!(renderer.chart_options().is_some());
    }

    #[test]
    fn test_failed_assignment_clears_previous_outcome() {
        let mut renderer = ChartRenderer::new(1, ChartConfig::new(ChartType::Column), NumericSymbols::default());
        assign(&mut renderer, json!([["1", "2"], ["3", "4"]]), &[]);

        let (request, response, mut result) = triple(json!([]));
        result.header_items.clear();
        result.data = serde_json::from_value(json!([["1", "2", "3"]])).unwrap();
        let mut on_data_too_large = |_: &ChartOptions| {};
        let mut callbacks = ChartCallbacks {
            on_data_too_large: &mut on_data_too_large,
            on_negative_values: None,
        };
        assert!(renderer
            .assign(&request, &response, &result, &[], &mut callbacks)
            .is_err());
        assert!(renderer.chart_options().is_none());
    }

    #[test]
    fn test_click_and_tooltip() {
        let mut renderer = ChartRenderer::new(7, ChartConfig::new(ChartType::Column), NumericSymbols::default());
        let items = vec![DrillableItem::from_uri("/gdc/md/p/obj/2")];
        assign(&mut renderer, json!([["1", "2"], ["3", "4"]]), &items);

        let mut target = RecordingTarget::default();
        assert!(!renderer.handle_click(0, 1, None, &mut target).unwrap());
        assert!(renderer.handle_click(1, 1, None, &mut target).unwrap());
        let context = &target.events[0].detail.drill_context;
        assert_eq!(context.x, Some(1.0));
        assert_eq!(context.y, Some(4.0));
        assert_eq!(context.intersection[0].id, "m2");

        assert!(renderer.handle_click(5, 0, None, &mut target).is_err());

        let rows = renderer.tooltip(1, 0).unwrap();
        assert_eq!(rows[0].value, "East");
        assert_eq!(rows[1].label, "Count");
    }

    #[test]
    fn test_tap_and_unmount() {
        let mut registry = ActiveChartRegistry::new();
        let first = ChartRenderer::new(1, ChartConfig::new(ChartType::Pie), NumericSymbols::default());
        let mut second = ChartRenderer::new(2, ChartConfig::new(ChartType::Pie), NumericSymbols::default());

        assert_eq!(first.handle_tap(&mut registry), None);
        assert_eq!(second.handle_tap(&mut registry), Some(1));
        second.unmount(&mut registry);
        assert_eq!(registry.active(), None);
    }
}
