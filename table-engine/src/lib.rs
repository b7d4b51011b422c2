//! FILENAME: table-engine/src/lib.rs
//! Table subsystem: execution results as a sortable, drillable grid with totals.
//!
//! Layers:
//! - `definition`: Serializable configuration (totals, editing flags)
//! - `view`: Renderable output (headers, rows, formatted cells, total rows)
//! - `engine`: Calculation from the execution triple
//! - `totals`: Total rows and totals editing
//! - `sort`: Active sort detection and header-click sort requests
//! - `drilling`: Cell drillability and drill payloads

pub mod definition;
pub mod view;
pub mod engine;
pub mod totals;
pub mod sort;
pub mod drilling;

pub use definition::*;
pub use view::*;
pub use engine::{
    calculate_table, get_headers, get_rows, validate_table_proportions, TableTransformation,
};
pub use sort::{create_sort_item, get_next_sort_dir, get_sort_info, get_sort_item, SortInfo};
pub use totals::{
    add_total, build_total_rows, first_measure_index, get_footer_height, get_totals_with_data,
    is_adding_more_totals_enabled, order_totals, remove_total, toggle_measure_index,
    TotalWithData,
};
pub use drilling::{build_cell_drill_event_data, is_cell_drillable, is_header_drillable};
