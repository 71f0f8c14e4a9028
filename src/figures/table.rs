use std::io::Write;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::processing::statistics::{SeriesStats, Statistic};

/// Name of the first column of the exported table.
pub const STATISTIC_COLUMN: &str = "statistic";

/// Per-series statistics side by side, one column per series.
///
/// Rows follow `Statistic::ALL`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    pub columns: Vec<(String, SeriesStats)>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, stats: SeriesStats) {
        self.columns.push((name.into(), stats));
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&SeriesStats> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn value(&self, column: &str, stat: Statistic) -> Option<f64> {
        self.column(column).map(|s| s.get(stat))
    }

    /// Concatenate tables side by side, appending `.<suffix>` to the
    /// column names of each. An empty suffix becomes the 1-based table
    /// number. Missing suffixes leave names unchanged. Names that would
    /// repeat get a further `.2`, `.3`, ... so the result stays exportable.
    pub fn merge_suffixed(tables: Vec<StatsTable>, suffixes: &[String]) -> Self {
        let mut merged = StatsTable::new();
        for (i, table) in tables.into_iter().enumerate() {
            for (name, stats) in table.columns {
                let name = match suffixes.get(i) {
                    Some(suffix) if suffix.is_empty() => format!("{name}.{}", i + 1),
                    Some(suffix) => format!("{name}.{suffix}"),
                    None => name,
                };
                let name = merged.unused_name(name);
                merged.push(name, stats);
            }
        }
        merged
    }

    fn unused_name(&self, name: String) -> String {
        let mut candidate = name.clone();
        let mut n = 2;
        while self.column(&candidate).is_some() {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        candidate
    }

    /// The table as a DataFrame: a `statistic` name column followed by one
    /// f64 column per series.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names: Vec<&str> = Statistic::ALL.iter().map(|s| s.label()).collect();
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Series::new(STATISTIC_COLUMN.into(), names).into());
        for (name, stats) in &self.columns {
            let values: Vec<f64> = Statistic::ALL.iter().map(|s| stats.get(*s)).collect();
            columns.push(Series::new(name.as_str().into(), values).into());
        }
        Ok(DataFrame::new(columns)?)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut df = self.to_dataframe()?;
        CsvWriter::new(writer).include_header(true).finish(&mut df)?;
        Ok(())
    }
}
