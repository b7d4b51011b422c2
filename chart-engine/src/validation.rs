//! FILENAME: chart-engine/src/validation.rs
//! PURPOSE: Size and value guards run before a chart is rendered.
//! CONTEXT: A chart that is too large or a pie with negative slices is not
//! rendered. These are expected outcomes, reported through caller callbacks
//! rather than errors. Data too large always wins over negative values.

use execution::{
    DrillableItem, ExecutionRequest, ExecutionResponse, ExecutionResult, TransformResult,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::definition::{ChartConfig, ChartLimits};
use crate::engine::get_chart_options;
use crate::view::{ChartData, ChartOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub data_too_large: bool,
    pub has_negative_value: bool,
}

/// Why a chart was not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationSignal {
    DataTooLarge,
    NegativeValues,
}

pub fn is_data_of_reasonable_size(data: &ChartData, limits: &ChartLimits) -> bool {
    data.series.len() <= limits.series && data.categories.len() <= limits.categories
}

pub fn validate_data(limits: &ChartLimits, options: &ChartOptions) -> ValidationResult {
    ValidationResult {
        data_too_large: !is_data_of_reasonable_size(&options.data, limits),
        has_negative_value: options.chart_type.is_pie_like() && options.values().any(|y| y < 0.0),
    }
}

// ============================================================================
// ASSIGNMENT
// ============================================================================

pub type ChartCallback<'a> = &'a mut dyn FnMut(&ChartOptions);

/// Caller hooks for the non-renderable outcomes.
pub struct ChartCallbacks<'a> {
    pub on_data_too_large: ChartCallback<'a>,
    pub on_negative_values: Option<ChartCallback<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum ChartOutcome {
    Render(ChartOptions),
    Suppressed {
        signal: ValidationSignal,
        options: ChartOptions,
    },
}

impl ChartOutcome {
    pub fn options(&self) -> &ChartOptions {
        match self {
            ChartOutcome::Render(options) => options,
            ChartOutcome::Suppressed { options, .. } => options,
        }
    }

    pub fn is_renderable(&self) -> bool {
        matches!(self, ChartOutcome::Render(_))
    }

    pub fn signal(&self) -> Option<ValidationSignal> {
        match self {
            ChartOutcome::Render(_) => None,
            ChartOutcome::Suppressed { signal, .. } => Some(*signal),
        }
    }
}

/// Applies the guards to built options, notifying the matching callback.
pub fn guard_chart_options(
    options: ChartOptions,
    limits: &ChartLimits,
    callbacks: &mut ChartCallbacks<'_>,
) -> ChartOutcome {
    let validation = validate_data(limits, &options);

    if validation.data_too_large {
        debug!(
            "Chart data too large: {} series, {} categories",
            options.data.series.len(),
            options.data.categories.len()
        );
        (callbacks.on_data_too_large)(&options);
        return ChartOutcome::Suppressed {
            signal: ValidationSignal::DataTooLarge,
            options,
        };
    }

    if validation.has_negative_value {
        match callbacks.on_negative_values.as_deref_mut() {
            Some(on_negative_values) => on_negative_values(&options),
            None => warn!("Negative values in a '{}' chart and no callback to report them", options.chart_type),
        }
        return ChartOutcome::Suppressed {
            signal: ValidationSignal::NegativeValues,
            options,
        };
    }

    ChartOutcome::Render(options)
}

/// Builds chart options and runs them through the guards.
pub fn assign_chart_options(
    request: &ExecutionRequest,
    response: &ExecutionResponse,
    result: &ExecutionResult,
    config: &ChartConfig,
    drillable_items: &[DrillableItem],
    callbacks: &mut ChartCallbacks<'_>,
) -> TransformResult<ChartOutcome> {
    let options = get_chart_options(request, response, result, config, drillable_items)?;
    Ok(guard_chart_options(options, &config.limits, callbacks))
}
