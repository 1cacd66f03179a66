//! Results persistence module

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use polars::prelude::*;
use serde_json::{json, to_string_pretty};

use crate::data::{
    EdgeTable, TableFormat, ID_COLUMN, METRIC_COLUMNS, SOURCE_COLUMN, TARGET_COLUMN,
};
use crate::modify::{EdgeRecord, ModificationResult, Mutation};
use crate::stats::{compare, StatComparison};

/// Cast a text column back to its original type, keeping text if that fails
fn restore_dtype(series: Series, dtype: &DataType) -> Series {
    if *dtype == DataType::String {
        return series;
    }
    match series.strict_cast(dtype) {
        Ok(restored) => restored,
        Err(e) => {
            log::warn!(
                "Keeping column {} as text, cannot cast back to {}: {}",
                series.name(),
                dtype,
                e
            );
            series
        }
    }
}

/// Build output rows: original column order first, new metric columns last
pub fn build_output_frame(table: &EdgeTable, records: &[EdgeRecord]) -> Result<DataFrame> {
    let sources: Vec<&str> = records.iter().map(|r| r.source.as_str()).collect();
    let targets: Vec<&str> = records.iter().map(|r| r.target.as_str()).collect();

    let mut computed: HashMap<String, Series> = HashMap::new();

    computed.insert(
        SOURCE_COLUMN.to_string(),
        restore_dtype(Series::new(SOURCE_COLUMN.into(), &sources), &table.source_dtype),
    );
    computed.insert(
        TARGET_COLUMN.to_string(),
        restore_dtype(Series::new(TARGET_COLUMN.into(), &targets), &table.target_dtype),
    );
    if table.has_column(ID_COLUMN) {
        let ids: Vec<i64> = (0..records.len() as i64).collect();
        computed.insert(ID_COLUMN.to_string(), Series::new(ID_COLUMN.into(), ids));
    }
    for attribute in &table.attributes {
        let values: Vec<Option<&str>> = sources.iter().map(|src| attribute.value_for(src)).collect();
        let series = Series::new(attribute.name.as_str().into(), values);
        computed.insert(attribute.name.clone(), restore_dtype(series, &attribute.dtype));
    }

    let source_degrees: Vec<u64> = records.iter().map(|r| r.source_degree as u64).collect();
    let target_degrees: Vec<u64> = records.iter().map(|r| r.target_degree as u64).collect();
    let betweenness: Vec<f64> = records.iter().map(|r| r.edge_betweenness).collect();
    let [source_degree, target_degree, edge_betweenness] = METRIC_COLUMNS;
    computed.insert(
        source_degree.to_string(),
        Series::new(source_degree.into(), source_degrees),
    );
    computed.insert(
        target_degree.to_string(),
        Series::new(target_degree.into(), target_degrees),
    );
    computed.insert(
        edge_betweenness.to_string(),
        Series::new(edge_betweenness.into(), betweenness),
    );

    // Columns without a computed counterpart (edge-level values) are dropped
    let mut columns: Vec<Column> = Vec::with_capacity(computed.len());
    for name in &table.columns {
        if let Some(series) = computed.remove(name) {
            columns.push(Column::from(series));
        }
    }
    for name in METRIC_COLUMNS {
        if let Some(series) = computed.remove(name) {
            columns.push(Column::from(series));
        }
    }

    Ok(DataFrame::new(columns)?)
}

/// Write a frame in the format implied by the path
pub fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    match TableFormat::from_path(path)? {
        TableFormat::Csv => CsvWriter::new(&mut file).include_header(true).finish(df)?,
        TableFormat::Parquet => {
            ParquetWriter::new(file).finish(df)?;
        }
    }
    Ok(())
}

/// Save the modified edge rows
pub fn save_modified_table(table: &EdgeTable, records: &[EdgeRecord], path: &Path) -> Result<()> {
    log::info!("Saving {} edges to {}", records.len(), path.display());

    let mut df = build_output_frame(table, records)?;
    write_frame(&mut df, path)?;

    log::info!("Modified network data saved to {}", path.display());
    Ok(())
}

/// Paths of the JSON and CSV statistics files for a base path
pub fn statistics_paths(base: &Path) -> (PathBuf, PathBuf) {
    (base.with_extension("json"), base.with_extension("csv"))
}

/// Save the before/after statistics as JSON and CSV next to `base`
pub fn save_statistics(result: &ModificationResult, base: &Path) -> Result<(PathBuf, PathBuf)> {
    let rows = compare(&result.original_stats, &result.new_stats);
    let (json_path, csv_path) = statistics_paths(base);

    if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    save_statistics_json(result, &rows, &json_path)?;
    save_statistics_csv(&rows, &csv_path)?;

    log::info!(
        "Network statistics saved to {} and {}",
        json_path.display(),
        csv_path.display()
    );
    Ok((json_path, csv_path))
}

fn save_statistics_json(
    result: &ModificationResult,
    rows: &[StatComparison],
    path: &Path,
) -> Result<()> {
    let (operation, requested, delivered) = match result.mutation {
        Mutation::Unchanged => ("none", 0, 0),
        Mutation::Added(outcome) => ("add", outcome.requested, outcome.added),
        Mutation::Removed(outcome) => ("remove", outcome.requested, outcome.removed),
    };

    let summary = json!({
        "target_edges": result.target_edges,
        "mutation": {
            "operation": operation,
            "requested": requested,
            "delivered": delivered,
            "shortfall": result.mutation.shortfall(),
        },
        "statistics": rows.iter().map(|row| json!({
            "metric": row.metric,
            "original": row.original,
            "modified": row.modified,
            "change": row.change_display(),
        })).collect::<Vec<_>>(),
    });

    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;
    Ok(())
}

fn save_statistics_csv(rows: &[StatComparison], path: &Path) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "metric,original,modified,change")?;
    for row in rows {
        writeln!(
            file,
            "{},{},{},{}",
            row.metric,
            row.original,
            row.modified,
            row.change_display()
        )?;
    }
    Ok(())
}
