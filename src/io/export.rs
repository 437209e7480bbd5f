//! CSV export for per-step simulation records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepRecord;

/// Column header for the step trace.
pub const HEADER: &str = "step,timestamp,load_customer_w,load_inverter_w,solar_w,\
                          battery_energy_wh,energy_gap_wh";

/// Exports step records to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[StepRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes step records as CSV to any writer. Output is deterministic for
/// identical input.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[StepRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.step.to_string(),
            r.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            format!("{:.4}", r.load_customer_w),
            format!("{:.4}", r.load_inverter_w),
            format!("{:.4}", r.solar_w),
            format!("{:.4}", r.battery_energy_wh),
            format!("{:.4}", r.energy_gap_wh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
