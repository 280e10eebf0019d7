use std::error::Error;
use std::io::Write;

use clap::ValueEnum;
use kd_core::IndicatorResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Serialize)]
struct KdRow {
    date: String,
    close: f64,
    window_high: f64,
    window_low: f64,
    rsv: f64,
    k: f64,
    d: f64,
    j: f64,
}

impl From<&IndicatorResult> for KdRow {
    fn from(r: &IndicatorResult) -> Self {
        Self {
            date: r.date.to_string(),
            close: r.close_price,
            window_high: r.window_high,
            window_low: r.window_low,
            rsv: r.rsv,
            k: r.k,
            d: r.d,
            j: r.j(),
        }
    }
}

pub fn write_results<W: Write>(
    results: &[IndicatorResult],
    format: OutputFormat,
    writer: W,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for row in results.iter().map(KdRow::from) {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<KdRow> = results.iter().map(KdRow::from).collect();
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &rows)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
