//! FILENAME: chart-engine/src/drilling.rs
//! PURPOSE: Drill payloads for clicked chart points.
//! CONTEXT: Drillable points already carry their intersection (measure,
//! view-by element, stack-by element), so a click only adds the chart type,
//! the clicked element kind and the point coordinates.

use execution::{
    fire_drill_event, Afm, DrillContext, DrillEventData, DrillEventTarget, DrillInterceptor,
    TransformError, TransformResult,
};
use log::debug;

use crate::definition::ChartType;
use crate::view::Point;

/// Builds the drill payload for a click on `point` at category index `x`.
pub fn build_point_drill_event_data(
    afm: &Afm,
    chart_type: ChartType,
    point: &Point,
    x: usize,
) -> TransformResult<DrillEventData> {
    if point.drill_intersection.is_empty() {
        return Err(TransformError::MissingData(format!(
            "Clicked {} point at {} has no drill intersection",
            chart_type, x
        )));
    }

    let mut drill_context = DrillContext::new(chart_type.drill_type(), chart_type.click_element());
    drill_context.x = Some(x as f64);
    drill_context.y = point.y;
    drill_context.intersection = point.drill_intersection.to_vec();

    Ok(DrillEventData {
        execution_context: afm.clone(),
        drill_context,
    })
}

/// Fires a drill event for a clicked point. Clicks on non-drillable points
/// are ignored and report `false`.
pub fn handle_point_click(
    afm: &Afm,
    chart_type: ChartType,
    point: &Point,
    x: usize,
    interceptor: Option<DrillInterceptor<'_>>,
    target: &mut dyn DrillEventTarget,
) -> TransformResult<bool> {
    if !point.drilldown {
        debug!("Ignoring click on non-drillable {} point", chart_type);
        return Ok(false);
    }
    let data = build_point_drill_event_data(afm, chart_type, point, x)?;
    Ok(fire_drill_event(interceptor, data, target))
}
