//! CSV file sampling.
//!
//! ```yaml
//! sampler:
//!     type: csv
//!     csv_file: samples.csv
//!     row_headers: false
//! ```
//!
//! With column headers (the default) the first record names the parameters
//! and each later record is one sample. With `row_headers: true` each record
//! is `name, v1, v2, ...` and sample `i` takes `v_i` from every record.
//! Values are kept as strings. The file is only read when samples or
//! parameter names are requested.

use super::base::{self, SampleCache};
use super::{Sampler, SamplerKind};
use crate::models::{Result, Sample, SamplerError, SamplerSpec, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const KIND: SamplerKind = SamplerKind::Csv;

/// Sampler over the contents of a CSV file.
#[derive(Debug)]
pub struct CsvSampler {
    spec: SamplerSpec,
    samples: SampleCache,
}

impl CsvSampler {
    pub fn new(spec: SamplerSpec) -> Self {
        Self {
            spec,
            samples: SampleCache::new(),
        }
    }

    fn path(&self) -> Result<&Path> {
        match self.spec.get("csv_file") {
            Some(Value::String(path)) => Ok(Path::new(path)),
            Some(_) => Err(SamplerError::invalid(KIND, "csv_file must be a string")),
            None => Err(SamplerError::invalid(KIND, "csv_file must be included in the sampler data")),
        }
    }

    fn row_headers(&self) -> Result<bool> {
        match self.spec.get("row_headers") {
            None => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(_) => Err(SamplerError::invalid(KIND, "row_headers must be a boolean")),
        }
    }

    /// Read every record, trimmed, skipping blank lines.
    fn read_records(&self) -> Result<Vec<Vec<String>>> {
        let path = self.path()?;
        debug!(path = %path.display(), "Reading CSV samples");

        let to_csv = |source: csv::Error| SamplerError::Csv {
            path: PathBuf::from(path),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(to_csv)?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(to_csv)?;
            records.push(record.iter().map(str::to_string).collect());
        }
        Ok(records)
    }

    /// Header names and per-sample values, oriented by `row_headers`.
    fn table(&self) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut records = self.read_records()?;
        if records.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let (headers, columns) = if self.row_headers()? {
            let mut headers = Vec::with_capacity(records.len());
            let mut columns = Vec::with_capacity(records.len());
            for mut record in records.into_iter().filter(|r| !r.is_empty()) {
                headers.push(record.remove(0));
                columns.push(record);
            }
            (headers, transpose(columns)?)
        } else {
            let headers = records.remove(0);
            (headers, records)
        };

        if let Some((index, row)) = columns
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(SamplerError::RowShapeMismatch {
                row: index + 1,
                line: index + 2,
                expected: headers.len(),
                found: row.len(),
            });
        }

        Ok((headers, columns))
    }

    fn build_samples(&self) -> Result<Vec<Sample>> {
        let constants = base::constants(&self.spec, KIND)?;
        let (headers, rows) = self.table()?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let values = headers.iter().cloned().zip(row.into_iter().map(Value::String));
                base::overlay(constants, values)
            })
            .collect())
    }
}

/// Turn per-parameter value rows into per-sample rows.
fn transpose(columns: Vec<Vec<String>>) -> Result<Vec<Vec<String>>> {
    let count = columns.first().map_or(0, Vec::len);
    if let Some((index, column)) = columns.iter().enumerate().find(|(_, c)| c.len() != count) {
        return Err(SamplerError::RowShapeMismatch {
            row: index + 1,
            line: index + 1,
            expected: count,
            found: column.len(),
        });
    }

    let mut rows = vec![Vec::with_capacity(columns.len()); count];
    for column in columns {
        for (row, value) in rows.iter_mut().zip(column) {
            row.push(value);
        }
    }
    Ok(rows)
}

impl Sampler for CsvSampler {
    fn kind(&self) -> SamplerKind {
        KIND
    }

    fn validate(&self) -> Result<()> {
        base::check_base(&self.spec, KIND)?;
        self.path()?;
        self.row_headers()?;
        Ok(())
    }

    fn parameters(&self) -> Vec<String> {
        let mut parameters = base::constant_keys(&self.spec);
        match self.table() {
            Ok((headers, _)) => parameters.extend(headers),
            Err(e) => warn!(error = %e, "Could not read CSV parameter names"),
        }
        parameters
    }

    fn get_samples(&self) -> Result<&[Sample]> {
        self.samples.get_or_build(KIND, || self.build_samples())
    }
}
