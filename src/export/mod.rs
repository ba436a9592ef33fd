pub mod layout;
pub mod pdf;
pub mod docx;
pub mod excel;

use crate::error::Result;
use blueprint_estimate_common::export::report_core::BillReport;
use blueprint_estimate_common::{EstimationSummary, ExportFormat};
use regex::Regex;
use std::path::{Path, PathBuf};

/// ファイル名に使えない文字を置換したタイトル
pub fn sanitize_file_stem(title: &str) -> String {
    lazy_static::lazy_static! {
        static ref INVALID_RE: Regex = Regex::new(r#"[\\/:*?"<>|\s]+"#).unwrap();
    }

    let stem = INVALID_RE.replace_all(title.trim(), "_");
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "estimation".to_string()
    } else {
        stem.to_string()
    }
}

/// 既定のファイル名（タイトル + 作成日 + IDの先頭8桁）
pub fn default_file_stem(summary: &EstimationSummary, title: &str) -> String {
    let id = summary.id().to_string();
    format!(
        "{}_{}_{}",
        sanitize_file_stem(title),
        summary.created_at().format("%Y%m%d"),
        &id[..8]
    )
}

pub fn output_path_for_format(output: &Path, stem: &str, format: ExportFormat) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, format.extension()))
    } else {
        output.to_path_buf()
    }
}

/// 見積もりサマリーを指定形式で出力する
pub fn export_summary(
    summary: &EstimationSummary,
    format: ExportFormat,
    output: &Path,
    title: &str,
    currency_symbol: &str,
) -> Result<PathBuf> {
    let report = BillReport::from_summary(summary, title, currency_symbol);
    let output_path = output_path_for_format(output, &default_file_stem(summary, title), format);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    println!("- {}を生成中...", format.label());
    match format {
        ExportFormat::Pdf => pdf::generate_pdf(&report, &output_path)?,
        ExportFormat::Docx => docx::generate_docx(&report, &output_path)?,
        ExportFormat::Xlsx => excel::generate_excel(&report, &output_path)?,
    }
    tracing::info!(path = %output_path.display(), %format, "report written");
    println!("✔ {}出力: {}", format.label(), output_path.display());

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Site A / Floor 2"), "Site_A_Floor_2");
        assert_eq!(sanitize_file_stem("  "), "estimation");
        assert_eq!(sanitize_file_stem("見積書:2026"), "見積書_2026");
    }

    #[test]
    fn test_output_path_with_extension() {
        let path = output_path_for_format(Path::new("out/bill.pdf"), "x", ExportFormat::Pdf);
        assert_eq!(path, PathBuf::from("out/bill.pdf"));
    }

    #[test]
    fn test_output_path_directory() {
        let path = output_path_for_format(Path::new("out"), "bill", ExportFormat::Xlsx);
        assert_eq!(path, PathBuf::from("out/bill.xlsx"));
    }
}
