//! CSV export of a report's count tables.
//!
//! One row per counted key, tagged with the table it came from:
//!
//! ```text
//! section,key,count
//! operations,login,1532
//! services,auth-gateway,2210
//! hourly_volume,2025-10-07 13:00,87
//! ```
//!
//! Only sections present in the report are exported.

use crate::report::Report;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;

/// Write the count tables of `report` to a CSV file at `path`.
pub fn export_csv(report: &Report, path: &str) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create export file: {}", path))?;
    write_csv(report, file).with_context(|| format!("Failed to write export file: {}", path))
}

/// Write the count tables of `report` as CSV to any writer.
pub fn write_csv<W: Write>(report: &Report, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["section", "key", "count"])?;

    if let Some(ops) = &report.operations {
        for (section, table) in [
            ("operations", &ops.operations),
            ("services", &ops.services),
            ("users", &ops.users),
        ] {
            for (key, count) in table.iter() {
                let count = count.to_string();
                writer.write_record([section, key, count.as_str()])?;
            }
        }
    }

    if let Some(perf) = &report.performance {
        for (hour, count) in &perf.hourly_volume {
            let count = count.to_string();
            writer.write_record(["hourly_volume", hour.as_str(), count.as_str()])?;
        }
        for (service, count) in perf.service_volume.iter() {
            let count = count.to_string();
            writer.write_record(["service_volume", service, count.as_str()])?;
        }
    }

    writer.flush()?;
    Ok(())
}
