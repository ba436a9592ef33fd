//! レイアウト設定モジュール
//!
//! mm基準のレイアウト定義（PDF見積書）

// ============================================
// mm基準レイアウト
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白設定（mm）
pub const MARGIN_MM: f32 = 15.0;

/// 明細行の高さ（mm）
pub const ROW_HEIGHT_MM: f32 = 8.0;

/// 利用可能幅（mm）
pub const USABLE_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_MM * 2.0; // 180mm

/// 列幅の比率（Symbol Name / Count / Price / Total Price）
pub const COLUMN_RATIOS: [f32; 4] = [0.40, 0.15, 0.20, 0.25];

/// フォントサイズ（pt）
pub const TITLE_FONT_PT: f32 = 18.0;
pub const BODY_FONT_PT: f32 = 10.0;

// ============================================
// レイアウト設定構造体
// ============================================

/// PDFレイアウト設定
#[derive(Debug, Clone)]
pub struct PdfLayout {
    /// ページ幅（mm）
    pub page_width_mm: f32,
    /// ページ高さ（mm）
    pub page_height_mm: f32,
    /// マージン（mm）
    pub margin_mm: f32,
    /// 行高さ（mm）
    pub row_height_mm: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self::a4()
    }
}

impl PdfLayout {
    pub fn a4() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            row_height_mm: ROW_HEIGHT_MM,
        }
    }

    /// 利用可能幅（mm）
    pub fn usable_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    /// コンテンツ開始Y座標（mm、下から）
    pub fn content_start_y_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }

    /// 改ページが必要になるY座標（mm）
    pub fn content_end_y_mm(&self) -> f32 {
        self.margin_mm + self.row_height_mm
    }

    /// 各列の左端X座標（mm）
    pub fn column_x_mm(&self) -> [f32; 4] {
        let width = self.usable_width_mm();
        let mut xs = [0.0; 4];
        let mut x = self.margin_mm;
        for (i, ratio) in COLUMN_RATIOS.iter().enumerate() {
            xs[i] = x;
            x += width * ratio;
        }
        xs
    }
}
