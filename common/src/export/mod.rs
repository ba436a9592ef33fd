//! Export core modules shared by the CLI export adapters.

pub mod report_core;

#[cfg(feature = "excel")]
pub mod excel_core;

pub use report_core::{BillReport, ReportRow, BILL_COLUMNS};
