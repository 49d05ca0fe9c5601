use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

/// Immigration table: one row per period, one count column per category.
pub const IMMIGRATION_PERIOD_COLUMNS: [&str; 2] = ["Year", "Period"];
pub const HOUSING_PERIOD_COLUMN: &str = "Year";
pub const HOUSING_CATEGORY_COLUMN: &str = "Province";
pub const HOUSING_VALUE_COLUMN: &str = "AveragePrice_CAD";
pub const UNEMPLOYMENT_CATEGORY_COLUMN: &str = "Province";
pub const UNEMPLOYMENT_RATE_COLUMN: &str = "Unemployment rate";
pub const UNEMPLOYMENT_IMMIGRANTS_COLUMN: &str = "Number of immigrants";
pub const HEALTH_CATEGORY_COLUMN: &str = "province";
pub const HEALTH_VALUE_COLUMN: &str = "unmet needs percentage";

/// One period of a wide time series. Values are parsed once at load time;
/// `None` marks a missing or malformed measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRecord {
    pub period: i32,
    pub values: BTreeMap<String, Option<f64>>,
}

impl TimeSeriesRecord {
    pub fn new(period: i32) -> Self {
        Self {
            period,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, category: impl Into<String>, value: f64) -> Self {
        self.values.insert(category.into(), Some(value));
        self
    }

    /// Present value for `category`; absent columns and missing cells are `None`.
    pub fn value(&self, category: &str) -> Option<f64> {
        self.values.get(category).copied().flatten()
    }
}

/// Wide time series sorted by period, periods unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeriodTable {
    pub categories: Vec<String>,
    pub records: Vec<TimeSeriesRecord>,
}

impl PeriodTable {
    pub fn periods(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.period).collect()
    }

    pub fn record(&self, period: i32) -> Option<&TimeSeriesRecord> {
        self.records
            .binary_search_by_key(&period, |r| r.period)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn last_period(&self) -> Option<i32> {
        self.records.last().map(|r| r.period)
    }
}

/// Long-form measurement: one value for a (period, category) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub period: i32,
    pub category: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnemploymentRow {
    pub province: String,
    pub unemployment_rate: Option<f64>,
    pub immigrants: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthRow {
    pub province: String,
    pub unmet_needs_pct: Option<f64>,
}

#[derive(Debug)]
pub enum TableError {
    Csv(csv::Error),
    MissingColumn { column: String },
    MalformedRow { line: u64, reason: String },
    DuplicatePeriod { period: i32 },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Csv(e) => write!(f, "CSV error: {e}"),
            TableError::MissingColumn { column } => write!(f, "missing column {column:?}"),
            TableError::MalformedRow { line, reason } => {
                write!(f, "malformed row at line {line}: {reason}")
            }
            TableError::DuplicatePeriod { period } => write!(f, "duplicate period {period}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

/// Numeric coercion for measurement cells.
///
/// Blank, unparseable and non-finite cells become `None` instead of failing.
pub fn parse_number(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// Periods are keys: `"2001"` and `"2001.0"` are accepted, anything else is not.
pub fn parse_period(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(p) = raw.parse::<i32>() {
        return Some(p);
    }
    let v: f64 = raw.parse().ok()?;
    (v.is_finite() && v.fract() == 0.0 && v.abs() <= i32::MAX as f64).then_some(v as i32)
}

struct Table {
    headers: StringRecord,
    rows: Vec<(u64, StringRecord)>,
}

impl Table {
    fn read(payload: &str) -> Result<Self, TableError> {
        let payload = payload.strip_prefix('\u{feff}').unwrap_or(payload);
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(payload.as_bytes());
        let headers = reader.headers().map_err(TableError::Csv)?.clone();
        let mut rows = Vec::new();
        for (i, row) in reader.records().enumerate() {
            let row = row.map_err(TableError::Csv)?;
            let line = row.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
            rows.push((line, row));
        }
        Ok(Self { headers, rows })
    }

    fn column(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn {
                column: name.to_string(),
            })
    }

    fn column_ignore_case(&self, names: &[&str]) -> Result<usize, TableError> {
        names
            .iter()
            .find_map(|name| {
                self.headers
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| TableError::MissingColumn {
                column: names.join("|"),
            })
    }
}

fn cell<'a>(row: &'a StringRecord, index: usize) -> &'a str {
    row.get(index).unwrap_or("")
}

fn period_cell(line: u64, row: &StringRecord, index: usize) -> Result<i32, TableError> {
    let raw = cell(row, index);
    parse_period(raw).ok_or_else(|| TableError::MalformedRow {
        line,
        reason: format!("period {raw:?} is not an integer"),
    })
}

/// Wide table: a period column plus one numeric column per category.
pub fn parse_period_table(payload: &str) -> Result<PeriodTable, TableError> {
    let table = Table::read(payload)?;
    let period_col = table.column_ignore_case(&IMMIGRATION_PERIOD_COLUMNS)?;

    let categories: Vec<(usize, String)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != period_col && !h.is_empty())
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(table.rows.len());
    for (line, row) in &table.rows {
        let period = period_cell(*line, row, period_col)?;
        if !seen.insert(period) {
            return Err(TableError::DuplicatePeriod { period });
        }
        let mut record = TimeSeriesRecord::new(period);
        for (i, name) in &categories {
            record.values.insert(name.clone(), parse_number(cell(row, *i)));
        }
        records.push(record);
    }
    records.sort_by_key(|r| r.period);

    debug!(
        rows = records.len(),
        categories = categories.len(),
        "parsed period table"
    );
    Ok(PeriodTable {
        categories: categories.into_iter().map(|(_, name)| name).collect(),
        records,
    })
}

/// Long table: period, category, value.
pub fn parse_observations(payload: &str) -> Result<Vec<Observation>, TableError> {
    let table = Table::read(payload)?;
    let period_col = table.column(HOUSING_PERIOD_COLUMN)?;
    let category_col = table.column(HOUSING_CATEGORY_COLUMN)?;
    let value_col = table.column(HOUSING_VALUE_COLUMN)?;

    let mut out = Vec::with_capacity(table.rows.len());
    for (line, row) in &table.rows {
        out.push(Observation {
            period: period_cell(*line, row, period_col)?,
            category: cell(row, category_col).to_string(),
            value: parse_number(cell(row, value_col)),
        });
    }
    debug!(rows = out.len(), "parsed observations");
    Ok(out)
}

pub fn parse_unemployment(payload: &str) -> Result<Vec<UnemploymentRow>, TableError> {
    let table = Table::read(payload)?;
    let province_col = table.column(UNEMPLOYMENT_CATEGORY_COLUMN)?;
    let rate_col = table.column(UNEMPLOYMENT_RATE_COLUMN)?;
    let immigrants_col = table.column(UNEMPLOYMENT_IMMIGRANTS_COLUMN)?;

    Ok(table
        .rows
        .iter()
        .map(|(_, row)| UnemploymentRow {
            province: cell(row, province_col).to_string(),
            unemployment_rate: parse_number(cell(row, rate_col)),
            immigrants: parse_number(cell(row, immigrants_col)),
        })
        .collect())
}

pub fn parse_health(payload: &str) -> Result<Vec<HealthRow>, TableError> {
    let table = Table::read(payload)?;
    let province_col = table.column(HEALTH_CATEGORY_COLUMN)?;
    let value_col = table.column(HEALTH_VALUE_COLUMN)?;

    Ok(table
        .rows
        .iter()
        .map(|(_, row)| HealthRow {
            province: cell(row, province_col).to_string(),
            unmet_needs_pct: parse_number(cell(row, value_col)),
        })
        .collect())
}
