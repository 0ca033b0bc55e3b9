use crate::error::{Error, Result};
use crate::sample::{Dataset, FeatureSchema, Sample};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Largest magnitude an integer cell may have and still be exact as `f64`.
pub const MAX_EXACT_COUNT: u64 = 1 << 53;

/// Which data rows to keep while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Keep every row.
    #[default]
    Full,
    /// Keep rows `0, step, 2·step, ...` in file order.
    Systematic {
        /// Distance between kept rows.
        step: usize,
    },
}

impl Sampling {
    /// The exploratory setting: every 5th row, starting with the first.
    pub fn examination() -> Self {
        Sampling::Systematic { step: 5 }
    }

    fn keeps(&self, row: usize) -> bool {
        match *self {
            Sampling::Full => true,
            Sampling::Systematic { step } => row % step == 0,
        }
    }
}

/// Loads a feature table into a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct TableReader {
    sampling: Sampling,
}

impl TableReader {
    /// Reader that keeps every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row sampling policy.
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Load from a file.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), sampling = ?self.sampling, "loading feature table");
        self.load(File::open(path)?)
    }

    /// Load from any byte source.
    ///
    /// Any bad row fails the whole load; nothing is skipped.
    pub fn load<R: Read>(&self, rdr: R) -> Result<Dataset> {
        if let Sampling::Systematic { step: 0 } = self.sampling {
            return Err(Error::InvalidParameter {
                name: "step",
                message: "systematic sampling step must be at least 1",
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let headers = reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(Error::MalformedRow {
                line: 1,
                message: "header needs an identifier column and at least one feature".into(),
            });
        }
        let id_label = headers.get(0).unwrap_or_default().to_string();
        let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
        let schema = FeatureSchema::new(id_label, names);
        let width = headers.len();

        let mut samples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| row_error(e, row as u64 + 2))?;
            let line = record.position().map_or(row as u64 + 2, |p| p.line());
            if record.len() != width {
                return Err(Error::MalformedRow {
                    line,
                    message: format!("expected {width} columns, found {}", record.len()),
                });
            }

            let mut values = Vec::with_capacity(width - 1);
            for (col, cell) in record.iter().enumerate().skip(1) {
                let v: i64 = cell.trim().parse().map_err(|_| Error::MalformedRow {
                    line,
                    message: format!(
                        "column '{}' is not an integer: {cell:?}",
                        &headers[col]
                    ),
                })?;
                if v.unsigned_abs() > MAX_EXACT_COUNT {
                    return Err(Error::MalformedRow {
                        line,
                        message: format!(
                            "column '{}' value {v} is beyond ±2^53 and cannot be kept exactly",
                            &headers[col]
                        ),
                    });
                }
                values.push(v as f64);
            }

            if self.sampling.keeps(row) {
                let name = record.get(0).unwrap_or_default();
                samples.push(Sample::new(name, values));
            }
        }

        tracing::info!(
            samples = samples.len(),
            dimensions = schema.len(),
            "loaded feature table"
        );
        Dataset::new(schema, samples)
    }
}

// Row-level decoding failures carry the same variant as column problems.
fn row_error(err: csv::Error, fallback_line: u64) -> Error {
    if let csv::ErrorKind::Utf8 { pos, err: utf8 } = err.kind() {
        return Error::MalformedRow {
            line: pos.as_ref().map_or(fallback_line, |p| p.line()),
            message: format!("invalid UTF-8: {utf8}"),
        };
    }
    Error::Csv(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "name,love,night\nsong1,3,0\nsong2,1,4\n";

    #[test]
    fn test_load_header_and_rows() {
        let ds = TableReader::new().load(TABLE.as_bytes()).unwrap();
        assert_eq!(ds.schema().id_label(), "name");
        assert_eq!(ds.schema().names(), &["love".to_string(), "night".to_string()]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.sample(1).name(), "song2");
        assert_eq!(ds.sample(1).value(1), 4.0);
    }

    #[test]
    fn test_examination_keeps_every_fifth() {
        let mut table = String::from("name,x\n");
        for i in 0..10 {
            table.push_str(&format!("row{},{}\n", i + 1, i));
        }
        let ds = TableReader::new()
            .with_sampling(Sampling::examination())
            .load(table.as_bytes())
            .unwrap();

        let names: Vec<&str> = ds.samples().iter().map(Sample::name).collect();
        assert_eq!(names, vec!["row1", "row6"]);
    }

    #[test]
    fn test_short_row_reports_line() {
        let table = "name,a,b\nok,1,2\nbad,1\n";
        let err = TableReader::new().load(table.as_bytes()).unwrap_err();
        match err {
            Error::MalformedRow { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 3 columns"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_integer_cell() {
        let table = "name,a\nx,1.5\n";
        let err = TableReader::new().load(table.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_count_beyond_exact_float_range() {
        let table = "name,a\nx,9007199254740993\n";
        let err = TableReader::new().load(table.as_bytes()).unwrap_err();
        match err {
            Error::MalformedRow { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("2^53"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // The boundary itself is exact and loads.
        let table = "name,a\nx,9007199254740992\ny,-9007199254740992\n";
        let ds = TableReader::new().load(table.as_bytes()).unwrap();
        assert_eq!(ds.sample(0).value(0), 9007199254740992.0);
        assert_eq!(ds.sample(1).value(0), -9007199254740992.0);
    }

    #[test]
    fn test_invalid_utf8_row_is_malformed() {
        let table: &[u8] = b"name,a\nx,1\n\xff,2\n";
        let err = TableReader::new().load(table).unwrap_err();
        match err {
            Error::MalformedRow { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("UTF-8"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_row_fails_even_when_sampled_out() {
        let table = "name,a\nx,1\ny,oops\n";
        let reader = TableReader::new().with_sampling(Sampling::examination());
        assert!(reader.load(table.as_bytes()).is_err());
    }

    #[test]
    fn test_header_without_features() {
        let err = TableReader::new().load("name\nx\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn test_zero_step_rejected() {
        let reader = TableReader::new().with_sampling(Sampling::Systematic { step: 0 });
        assert!(matches!(
            reader.load(TABLE.as_bytes()),
            Err(Error::InvalidParameter { name: "step", .. })
        ));
    }
}
