//! CSV file data adapter.
//!
//! A run named `r` lives in three files under the base directory:
//! `r_prices.csv`, `r_equity.csv` and `r_trades.csv`. Columns are matched by
//! header name, so column order and extra columns do not matter.

use crate::domain::error::TradelensError;
use crate::domain::raw::{
    ingest_equity, ingest_prices, ingest_trades, RawEquityRecord, RawPriceRecord, RawTradeRecord,
    RawValue,
};
use crate::domain::series::{EquityPoint, PricePoint, TradeEvent};
use crate::ports::data_port::DataPort;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
    run: String,
}

/// Header row resolved to column positions.
struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn position(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn value(&self, record: &StringRecord, name: &str) -> RawValue {
        match self.position(name).and_then(|i| record.get(i)) {
            Some(cell) if !cell.trim().is_empty() => RawValue::Text(cell.trim().to_string()),
            _ => RawValue::Null,
        }
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf, run: impl Into<String>) -> Self {
        Self {
            base_path,
            run: run.into(),
        }
    }

    fn csv_path(&self, part: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", self.run, part))
    }

    fn read_rows(&self, part: &str) -> Result<(String, Columns, Vec<StringRecord>), TradelensError> {
        let path = self.csv_path(part);
        let source_name = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|e| TradelensError::DataRead {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| TradelensError::DataFormat {
                source_name: source_name.clone(),
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let columns = Columns { headers };
        if columns.position("date").is_none() {
            return Err(TradelensError::DataFormat {
                source_name,
                reason: "missing date column".into(),
            });
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TradelensError::DataFormat {
                source_name: source_name.clone(),
                reason: format!("CSV parse error: {}", e),
            })?;
            rows.push(record);
        }

        tracing::debug!(file = %source_name, rows = rows.len(), "read CSV");
        Ok((source_name, columns, rows))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self) -> Result<Vec<PricePoint>, TradelensError> {
        let (source_name, cols, rows) = self.read_rows("prices")?;
        let records: Vec<RawPriceRecord> = rows
            .iter()
            .map(|r| RawPriceRecord {
                date: cols.value(r, "date"),
                open: cols.value(r, "open"),
                high: cols.value(r, "high"),
                low: cols.value(r, "low"),
                close: cols.value(r, "close"),
                volume: cols.value(r, "volume"),
            })
            .collect();
        ingest_prices(&records, &source_name)
    }

    fn fetch_equity(&self) -> Result<Vec<EquityPoint>, TradelensError> {
        let (source_name, cols, rows) = self.read_rows("equity")?;
        let records: Vec<RawEquityRecord> = rows
            .iter()
            .map(|r| RawEquityRecord {
                date: cols.value(r, "date"),
                equity: cols.value(r, "equity"),
            })
            .collect();
        ingest_equity(&records, &source_name)
    }

    fn fetch_trades(&self) -> Result<Vec<TradeEvent>, TradelensError> {
        let (source_name, cols, rows) = self.read_rows("trades")?;
        let records: Vec<RawTradeRecord> = rows
            .iter()
            .map(|r| RawTradeRecord {
                date: cols.value(r, "date"),
                action: cols.value(r, "action"),
                price: cols.value(r, "price"),
                shares: cols.value(r, "shares"),
                profit: cols.value(r, "profit"),
                profit_percent: cols.value(r, "profit_percent"),
                holding_days: cols.value(r, "holding_days"),
                trigger_reason: cols.value(r, "trigger_reason"),
                before_cash: cols.value(r, "before_cash"),
                after_cash: cols.value(r, "after_cash"),
            })
            .collect();
        ingest_trades(&records, &source_name)
    }
}
