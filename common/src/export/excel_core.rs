//! Excel生成（共通ライブラリ）
//!
//! report_core.rs の列定義を使用して見積書形式のExcelを生成

use super::report_core::{BillReport, BILL_COLUMNS, TOTAL_LABEL};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::*;

/// 列幅（文字数）
const COLUMN_WIDTHS: [f64; 4] = [28.0, 10.0, 14.0, 16.0];

/// Excelをバッファに生成
pub fn generate_bill_buffer(report: &BillReport) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let money_format_str = format!("\"{}\"#,##0.00", report.currency_symbol);

    // フォーマット定義
    let title_format = Format::new().set_bold().set_font_size(16.0);

    let label_format = Format::new()
        .set_bold()
        .set_font_size(9.0)
        .set_font_color(Color::RGB(0x555555))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x1F2937))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let text_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let count_format = text_format.clone().set_align(FormatAlign::Center);

    let money_format = text_format.clone().set_num_format(&money_format_str);

    let total_label_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Right)
        .set_background_color(Color::RGB(0xE0E7FF))
        .set_border(FormatBorder::Thin);

    let total_format = Format::new()
        .set_bold()
        .set_num_format(&money_format_str)
        .set_background_color(Color::RGB(0xE0E7FF))
        .set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Estimate")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    // タイトル・日付
    worksheet.write_string_with_format(0, 0, &report.title, &title_format)
        .map_err(|e| format!("タイトル書き込みエラー: {}", e))?;
    worksheet.write_string(1, 0, &report.date)
        .map_err(|e| format!("日付書き込みエラー: {}", e))?;

    // 連絡先（A列:ラベル、B-D列:値）
    let mut row: u32 = 3;
    for (label, value) in &report.contact {
        worksheet.write_string_with_format(row, 0, *label, &label_format)
            .map_err(|e| format!("ラベル書き込みエラー: {}", e))?;
        worksheet.merge_range(row, 1, row, 3, value, &text_format)
            .map_err(|e| format!("セルマージエラー: {}", e))?;
        row += 1;
    }

    // 明細表ヘッダー
    row += 1;
    for (col, column) in BILL_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, column.label, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    row += 1;

    // 明細
    for item in &report.rows {
        worksheet.write_string_with_format(row, 0, &item.name, &text_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(row, 1, item.count as f64, &count_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(row, 2, to_cell_number(item.unit_price), &money_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(row, 3, to_cell_number(item.line_total), &money_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        row += 1;
    }

    // 合計行
    worksheet.merge_range(row, 0, row, 2, TOTAL_LABEL, &total_label_format)
        .map_err(|e| format!("セルマージエラー: {}", e))?;
    worksheet.write_number_with_format(row, 3, to_cell_number(report.total), &total_format)
        .map_err(|e| format!("合計書き込みエラー: {}", e))?;

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn to_cell_number(value: rust_decimal::Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::assemble;
    use crate::types::{LineItem, UserDetails};
    use rust_decimal::Decimal;

    #[test]
    fn test_generate_bill_buffer() {
        let items = vec![
            LineItem::aggregate(10),
            LineItem::detected("window", 5, Decimal::ONE_HUNDRED, None),
        ];
        let summary = assemble(&UserDetails::new("A", "a@b.com"), &items).unwrap();
        let report = BillReport::from_summary(&summary, "Estimate", "$");

        let buffer = generate_bill_buffer(&report).unwrap();
        // xlsx は zip コンテナ
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_to_cell_number() {
        assert_eq!(to_cell_number(Decimal::new(1250, 2)), 12.5);
    }
}
