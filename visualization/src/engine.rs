//! FILENAME: visualization/src/engine.rs
//! Visualization Engine - Dispatches an execution triple to its transform.
//!
//! The triple is validated once at the boundary, then handed to exactly one
//! of the table, chart or headline transforms according to the type tag.

use chart_engine::{assign_chart_options, ChartCallbacks, ChartOutcome, ChartType};
use execution::{
    validate_execution, ExecutionRequest, ExecutionResponse, ExecutionResult, ExecutionTriple,
    TransformResult,
};
use headline_engine::{HeadlineData, HeadlineTransformation};
use log::debug;
use serde::Serialize;
use table_engine::{TableTransformation, TableView};

use crate::definition::{VisualizationConfig, VisualizationType};

/// Output of one transform, tagged by visualization family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "model")]
pub enum VisualizationModel {
    Table(TableView),
    Chart(ChartOutcome),
    Headline(HeadlineData),
}

impl VisualizationModel {
    pub fn as_table(&self) -> Option<&TableView> {
        match self {
            VisualizationModel::Table(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_chart(&self) -> Option<&ChartOutcome> {
        match self {
            VisualizationModel::Chart(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn as_headline(&self) -> Option<&HeadlineData> {
        match self {
            VisualizationModel::Headline(data) => Some(data),
            _ => None,
        }
    }
}

/// Validates the triple and runs the transform selected by `config`.
/// `callbacks` are only consulted by charts.
pub fn transform(
    request: &ExecutionRequest,
    response: &ExecutionResponse,
    result: &ExecutionResult,
    config: &VisualizationConfig,
    callbacks: &mut ChartCallbacks<'_>,
) -> TransformResult<VisualizationModel> {
    validate_execution(request, response, result)?;
    debug!("Transforming '{}' visualization", config.visualization_type);

    let chart_type = match config.visualization_type {
        VisualizationType::Table => {
            let options = config.table_options();
            return TableTransformation::new(request, response, result, &options)
                .calculate()
                .map(VisualizationModel::Table);
        }
        VisualizationType::Headline => {
            return HeadlineTransformation::new(
                request,
                response,
                result,
                &config.drillable_items,
                config.headline_options(),
            )
            .data()
            .map(VisualizationModel::Headline);
        }
        VisualizationType::Column => ChartType::Column,
        VisualizationType::Bar => ChartType::Bar,
        VisualizationType::Line => ChartType::Line,
        VisualizationType::Pie => ChartType::Pie,
        VisualizationType::Doughnut => ChartType::Doughnut,
        VisualizationType::Area => ChartType::Area,
    };

    assign_chart_options(
        request,
        response,
        result,
        &config.chart_config(chart_type),
        &config.drillable_items,
        callbacks,
    )
    .map(VisualizationModel::Chart)
}

/// Same as `transform` for an already decoded triple.
pub fn transform_triple(
    triple: &ExecutionTriple,
    config: &VisualizationConfig,
    callbacks: &mut ChartCallbacks<'_>,
) -> TransformResult<VisualizationModel> {
    transform(
        &triple.execution_request,
        &triple.execution_response,
        &triple.execution_result,
        config,
        callbacks,
    )
}
