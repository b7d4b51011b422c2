//! FILENAME: execution/src/validate.rs
//! PURPOSE: Decodes and shape-checks the execution triple at the input boundary.
//! CONTEXT: Transforms assume a well-formed triple. Every malformed input is
//! rejected here once, with an error that distinguishes a missing field from a
//! wrongly typed one and from a data matrix whose nesting does not match the
//! response dimensions.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{
    ExecutionRequest, ExecutionResponse, ExecutionResult, MeasureDefinition,
};

/// One computed query: request, response and result together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTriple {
    pub execution_request: ExecutionRequest,
    pub execution_response: ExecutionResponse,
    pub execution_result: ExecutionResult,
}

impl ExecutionTriple {
    /// Decodes the three JSON documents and validates them together.
    pub fn from_json(request: &str, response: &str, result: &str) -> Result<Self, ValidationError> {
        let triple = ExecutionTriple {
            execution_request: decode("executionRequest", request)?,
            execution_response: decode("executionResponse", response)?,
            execution_result: decode("executionResult", result)?,
        };
        validate_execution(
            &triple.execution_request,
            &triple.execution_response,
            &triple.execution_result,
        )?;
        Ok(triple)
    }
}

fn decode<T: DeserializeOwned>(context: &str, json: &str) -> Result<T, ValidationError> {
    serde_json::from_str(json).map_err(|err| ValidationError::from_serde(context, &err))
}

/// Checks invariants serde cannot express.
pub fn validate_execution(
    request: &ExecutionRequest,
    response: &ExecutionResponse,
    result: &ExecutionResult,
) -> Result<(), ValidationError> {
    // Step 1: Every measure must be addressable and resolvable
    for (index, measure) in request.afm.measures.iter().enumerate() {
        if measure.local_identifier.is_empty() {
            return Err(ValidationError::MissingField {
                context: format!("afm.measures[{}]", index),
                message: "missing field `localIdentifier`".to_string(),
            });
        }
        if let MeasureDefinition::Measure(simple) = &measure.definition {
            if simple.item.is_empty() {
                return Err(ValidationError::MissingField {
                    context: format!("afm.measures[{}].definition.measure.item", index),
                    message: "missing field `uri` or `identifier`".to_string(),
                });
            }
        }
    }

    // Step 2: Data nesting must follow the response dimensions
    let dimension_count = response.dimensions.len();
    if let Some(depth) = result.data.depth() {
        if dimension_count > 0 && depth != dimension_count {
            return Err(ValidationError::DimensionalityMismatch {
                context: "executionResult.data".to_string(),
                expected: dimension_count,
                actual: depth,
            });
        }
    }

    // Step 3: Header items, when present, are per dimension and per header
    if !result.header_items.is_empty() {
        if result.header_items.len() != dimension_count {
            return Err(ValidationError::DimensionalityMismatch {
                context: "executionResult.headerItems".to_string(),
                expected: dimension_count,
                actual: result.header_items.len(),
            });
        }
        for (index, (items, dimension)) in result
            .header_items
            .iter()
            .zip(&response.dimensions)
            .enumerate()
        {
            if !items.is_empty() && items.len() != dimension.headers.len() {
                return Err(ValidationError::DimensionalityMismatch {
                    context: format!("executionResult.headerItems[{}]", index),
                    expected: dimension.headers.len(),
                    actual: items.len(),
                });
            }
        }
    }

    debug!(
        "Validated execution: {} dimensions, {} measures",
        dimension_count,
        request.afm.measures.len()
    );
    Ok(())
}
