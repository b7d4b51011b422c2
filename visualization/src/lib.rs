//! FILENAME: visualization/src/lib.rs
//! Visualization entry point: one execution triple, one visualization model.
//!
//! Layers:
//! - `definition`: Visualization type tag and caller configuration
//! - `engine`: Validation and dispatch to the table, chart or headline transform
//! - `renderer`: Per-chart state between data assignments

pub mod definition;
pub mod engine;
pub mod renderer;

pub use definition::{VisualizationConfig, VisualizationType};
pub use engine::{transform, transform_triple, VisualizationModel};
pub use renderer::{ChartRenderer, ChartRendererProps};
