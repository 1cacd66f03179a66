//! Edge table loading and attribute mapping

pub mod table;

pub use table::{
    load_edge_table, read_frame, EdgeTable, NodeAttribute, TableFormat, ID_COLUMN,
    METRIC_COLUMNS, SOURCE_COLUMN, TARGET_COLUMN,
};
