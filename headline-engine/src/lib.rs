//! FILENAME: headline-engine/src/lib.rs
//! Headline subsystem: one or two key numbers and their relative change.
//!
//! Layers:
//! - `definition`: Headline data items and click context (WHAT the headline IS)
//! - `view`: Formatted items ready for display (WHAT we display)
//! - `engine`: Transformation from the execution triple (HOW we calculate)

pub mod definition;
pub mod view;
pub mod engine;

pub use definition::*;
pub use view::*;
pub use engine::{
    apply_drillable_items, build_drill_event_data, calculate_headline, get_headline_data,
    HeadlineTransformation,
};
