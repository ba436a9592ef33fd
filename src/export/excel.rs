//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに書き出す

use crate::error::{EstimateError, Result};
use blueprint_estimate_common::export::excel_core::generate_bill_buffer;
use blueprint_estimate_common::export::report_core::BillReport;
use std::path::Path;

pub fn generate_excel(report: &BillReport, output_path: &Path) -> Result<()> {
    let buffer = generate_bill_buffer(report).map_err(EstimateError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
