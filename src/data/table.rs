//! CSV and Parquet edge tables

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use polars::prelude::*;

pub const SOURCE_COLUMN: &str = "source";
pub const TARGET_COLUMN: &str = "target";

/// Row identifier column, renumbered on output
pub const ID_COLUMN: &str = "Id";

/// Columns computed for every output row
pub const METRIC_COLUMNS: [&str; 3] = ["source_degree", "target_degree", "edge_betweenness"];

/// Supported on-disk table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("parquet") | Some("pq") => Ok(TableFormat::Parquet),
            _ => Err(anyhow!("Unsupported table format: {}", path.display())),
        }
    }
}

/// A per-node attribute taken from the rows where the node is the source
#[derive(Debug, Clone)]
pub struct NodeAttribute {
    pub name: String,

    /// Original column type, restored on output
    pub dtype: DataType,

    /// First non-null value seen for each source node, as text
    pub values: HashMap<String, String>,
}

impl NodeAttribute {
    pub fn value_for(&self, node: &str) -> Option<&str> {
        self.values.get(node).map(String::as_str)
    }
}

/// An edge list plus everything needed to write rows back in the same shape
#[derive(Debug, Clone)]
pub struct EdgeTable {
    /// Column names in their original order
    pub columns: Vec<String>,

    /// (source, target) pairs normalised to text
    pub edges: Vec<(String, String)>,

    pub source_dtype: DataType,
    pub target_dtype: DataType,

    /// Attribute columns remapped by source node
    pub attributes: Vec<NodeAttribute>,
}

impl EdgeTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }
}

/// Read a CSV or Parquet file into a DataFrame
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    log::info!("Reading edge table: {}", path.display());

    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }

    let df = match TableFormat::from_path(path)? {
        TableFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        TableFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())?.collect()?,
    };

    log::info!("File schema: {:?}", df.schema());
    log::info!("Loaded {} rows", df.height());

    Ok(df)
}

/// Load an edge table from disk
pub fn load_edge_table(path: &Path) -> Result<EdgeTable> {
    let df = read_frame(path)?;
    EdgeTable::from_frame(&df)
}

/// Whether a column is carried over as a node attribute
fn is_attribute_column(name: &str) -> bool {
    name != SOURCE_COLUMN
        && name != TARGET_COLUMN
        && name != ID_COLUMN
        && !METRIC_COLUMNS.contains(&name)
        // Edge-level values do not survive rewiring
        && !name.to_ascii_lowercase().contains("edge")
}

/// Text values of a column, one per row
fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.str()?;
    Ok((0..df.height())
        .map(|i| values.get(i).map(str::to_string))
        .collect())
}

impl EdgeTable {
    /// Normalise a frame with `source` and `target` columns
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        for required in [SOURCE_COLUMN, TARGET_COLUMN] {
            if !columns.iter().any(|column| column == required) {
                return Err(anyhow!("Missing required column: {}", required));
            }
        }

        let source_dtype = df.column(SOURCE_COLUMN)?.dtype().clone();
        let target_dtype = df.column(TARGET_COLUMN)?.dtype().clone();
        log::info!("Source dtype: {}, target dtype: {}", source_dtype, target_dtype);

        let sources = text_values(df, SOURCE_COLUMN)?;
        let targets = text_values(df, TARGET_COLUMN)?;

        let mut edges = Vec::with_capacity(df.height());
        for (row, (src, dst)) in sources.iter().zip(&targets).enumerate() {
            match (src, dst) {
                (Some(src), Some(dst)) => edges.push((src.clone(), dst.clone())),
                _ => return Err(anyhow!("Row {} has a missing source or target", row)),
            }
        }

        let mut attributes = Vec::new();
        for name in columns.iter().filter(|name| is_attribute_column(name)) {
            let dtype = df.column(name)?.dtype().clone();
            let mut values = HashMap::new();
            for (src, value) in sources.iter().zip(text_values(df, name)?) {
                if let (Some(src), Some(value)) = (src, value) {
                    values.entry(src.clone()).or_insert(value);
                }
            }
            attributes.push(NodeAttribute {
                name: name.clone(),
                dtype,
                values,
            });
        }

        log::info!(
            "Loaded {} edges with {} node attributes",
            edges.len(),
            attributes.len()
        );

        Ok(Self {
            columns,
            edges,
            source_dtype,
            target_dtype,
            attributes,
        })
    }
}
