//! CSV directory bar source.
//!
//! Each `*.csv` file in the directory is one instrument, identified by its
//! file stem. Headers are matched case-insensitively; `Open`, `High`, `Low`
//! and `Close` are required, `Date` is optional.

use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tradegame_core::domain::{Bar, InstrumentId};

use crate::data_loader::{BarSource, DataSource, LoadError};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, instrument: &str) -> PathBuf {
        self.dir.join(format!("{instrument}.csv"))
    }
}

impl BarSource for CsvDirectorySource {
    fn kind(&self) -> DataSource {
        DataSource::CsvFile
    }

    fn instruments(&self) -> Result<Vec<InstrumentId>, LoadError> {
        if !self.dir.is_dir() {
            return Err(LoadError::NoDataSource {
                path: self.dir.clone(),
            });
        }

        let mut instruments = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                instruments.push(stem.to_string());
            }
        }
        instruments.sort();
        Ok(instruments)
    }

    fn load(&self, instrument: &str) -> Result<Vec<Bar>, LoadError> {
        let path = self.path_for(instrument);
        if !path.is_file() {
            return Err(LoadError::UnknownInstrument {
                instrument: instrument.to_string(),
            });
        }
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(&path)?;
        parse_bars(instrument, &mut reader)
    }
}

/// Column positions resolved from the header row.
struct Columns {
    date: Option<usize>,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl Columns {
    fn resolve(instrument: &str, headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| LoadError::MissingColumn {
                instrument: instrument.to_string(),
                column: name.to_string(),
            })
        };

        Ok(Self {
            date: find("Date"),
            open: require("Open")?,
            high: require("High")?,
            low: require("Low")?,
            close: require("Close")?,
        })
    }
}

fn parse_bars<R: std::io::Read>(
    instrument: &str,
    reader: &mut csv::Reader<R>,
) -> Result<Vec<Bar>, LoadError> {
    let columns = Columns::resolve(instrument, reader.headers()?)?;
    let mut bars = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let price = |col: usize, name: &str| -> Result<f64, LoadError> {
            let raw = record.get(col).unwrap_or_default();
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| LoadError::Parse {
                    instrument: instrument.to_string(),
                    row,
                    reason: format!("invalid {name} value '{raw}'"),
                })
        };

        let date = match columns.date.and_then(|c| record.get(c)) {
            Some(raw) => normalize_date(raw),
            None => row.to_string(),
        };

        bars.push(Bar {
            date,
            open: price(columns.open, "Open")?,
            high: price(columns.high, "High")?,
            low: price(columns.low, "Low")?,
            close: price(columns.close, "Close")?,
        });
    }

    Ok(bars)
}

/// Render recognizable dates as `YYYY-MM-DD`; keep anything else verbatim.
fn normalize_date(raw: &str) -> String {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.format("%Y-%m-%d").to_string();
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }
    raw.to_string()
}
