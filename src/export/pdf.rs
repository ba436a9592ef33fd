use super::layout::{PdfLayout, BODY_FONT_PT, TITLE_FONT_PT};
use crate::error::{EstimateError, Result};
use blueprint_estimate_common::export::report_core::{BillReport, BILL_COLUMNS, TOTAL_LABEL};
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// 描画中のページとY座標
struct PageCursor {
    layer: PdfLayerReference,
    y_mm: f32,
}

pub fn generate_pdf(report: &BillReport, output_path: &Path) -> Result<()> {
    let layout = PdfLayout::a4();
    let (doc, page1, layer1) = PdfDocument::new(
        &report.title,
        Mm(layout.page_width_mm),
        Mm(layout.page_height_mm),
        "Layer 1",
    );

    let font = doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| EstimateError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| EstimateError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?;

    let mut cursor = PageCursor {
        layer: doc.get_page(page1).get_layer(layer1),
        y_mm: layout.content_start_y_mm(),
    };
    let xs = layout.column_x_mm();
    let line_mm = layout.row_height_mm;

    // タイトル・日付
    cursor.layer.use_text(&report.title, TITLE_FONT_PT, Mm(layout.margin_mm), Mm(cursor.y_mm), &bold);
    cursor.y_mm -= line_mm * 1.5;
    cursor.layer.use_text(format!("Date: {}", report.date), BODY_FONT_PT, Mm(layout.margin_mm), Mm(cursor.y_mm), &font);
    cursor.y_mm -= line_mm * 1.5;

    // 連絡先
    for (label, value) in &report.contact {
        cursor.layer.use_text(*label, BODY_FONT_PT, Mm(xs[0]), Mm(cursor.y_mm), &bold);
        cursor.layer.use_text(value.as_str(), BODY_FONT_PT, Mm(xs[1]), Mm(cursor.y_mm), &font);
        cursor.y_mm -= line_mm;
    }
    cursor.y_mm -= line_mm;

    // 明細表
    draw_table_header(&cursor, &layout, &xs, &bold);
    cursor.y_mm -= line_mm;

    for row in report.cells() {
        if cursor.y_mm < layout.content_end_y_mm() {
            let (page, layer) = doc.add_page(
                Mm(layout.page_width_mm),
                Mm(layout.page_height_mm),
                "Layer 1",
            );
            cursor = PageCursor {
                layer: doc.get_page(page).get_layer(layer),
                y_mm: layout.content_start_y_mm(),
            };
            draw_table_header(&cursor, &layout, &xs, &bold);
            cursor.y_mm -= line_mm;
        }

        for (x, cell) in xs.iter().zip(row.iter()) {
            cursor.layer.use_text(cell.as_str(), BODY_FONT_PT, Mm(*x), Mm(cursor.y_mm), &font);
        }
        cursor.y_mm -= line_mm;
    }

    // 合計行
    draw_rule(&cursor.layer, &layout, cursor.y_mm + line_mm * 0.6);
    cursor.layer.use_text(TOTAL_LABEL, BODY_FONT_PT, Mm(xs[2]), Mm(cursor.y_mm), &bold);
    cursor.layer.use_text(report.total_text(), BODY_FONT_PT, Mm(xs[3]), Mm(cursor.y_mm), &bold);

    // 保存
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| EstimateError::PdfGeneration(format!("PDF保存エラー: {:?}", e)))?;

    Ok(())
}

fn draw_table_header(cursor: &PageCursor, layout: &PdfLayout, xs: &[f32; 4], font: &IndirectFontRef) {
    for (x, column) in xs.iter().zip(BILL_COLUMNS.iter()) {
        cursor.layer.use_text(column.label, BODY_FONT_PT, Mm(*x), Mm(cursor.y_mm), font);
    }
    draw_rule(&cursor.layer, layout, cursor.y_mm - layout.row_height_mm * 0.4);
}

fn draw_rule(layer: &PdfLayerReference, layout: &PdfLayout, y_mm: f32) {
    let line = Line {
        points: vec![
            (Point::new(Mm(layout.margin_mm), Mm(y_mm)), false),
            (Point::new(Mm(layout.page_width_mm - layout.margin_mm), Mm(y_mm)), false),
        ],
        is_closed: false,
    };
    layer.set_outline_thickness(0.5);
    layer.add_line(line);
}
