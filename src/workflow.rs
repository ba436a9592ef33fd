//! コマンド共通の処理
//!
//! 解析結果の読み込み、`--set` の適用、保存確定をまとめる。

use crate::cli::ItemEdit;
use crate::config::Config;
use crate::error::{EstimateError, Result};
use crate::export;
use crate::history::SummaryArchive;
use crate::view;
use blueprint_estimate_common::{
    AnalysisPayload, EstimationSession, EstimationSummary, ExportFormat, NormalizationStats,
    SessionState, UserDetails,
};
use std::path::{Path, PathBuf};

/// 解析結果JSONを読み込んでセッションを作る
pub fn open_session(path: &Path, config: &Config) -> Result<(EstimationSession, NormalizationStats)> {
    if !path.exists() {
        return Err(EstimateError::FileNotFound(path.display().to_string()));
    }

    let payload = AnalysisPayload::from_file(path)?;
    let mut session = EstimationSession::new(config.normalization_options());
    let stats = session.load_payload(&payload);
    tracing::debug!(
        path = %path.display(),
        classes = stats.source_classes,
        excluded = stats.excluded.len(),
        "analysis result loaded"
    );

    Ok((session, stats))
}

/// 明細がない場合はエラー
pub fn require_items(session: &EstimationSession, path: &Path) -> Result<()> {
    if session.state() == SessionState::Empty {
        return Err(EstimateError::EmptyPayload(path.display().to_string()));
    }
    Ok(())
}

/// `--set` の修正を順に適用する。単価省略時は現在の単価を引き継ぐ
pub fn apply_edits(session: &mut EstimationSession, edits: &[ItemEdit]) -> Result<()> {
    for edit in edits {
        let current = session
            .store()
            .get_by_name(&edit.name)
            .ok_or_else(|| EstimateError::ItemNotFound(edit.name.clone()))?;
        let price = edit.price.unwrap_or(current.price);

        session.edit_by_name(&edit.name, edit.count, price);
        for event in session.drain_events() {
            println!("{}", view::event_message(&event));
        }
    }
    Ok(())
}

/// 保存確定してアーカイブに書き出す
pub fn summarize_and_archive(
    session: &mut EstimationSession,
    user: &UserDetails,
    archive: &SummaryArchive,
) -> Result<(EstimationSummary, PathBuf)> {
    let summary = session.summarize(user)?.clone();
    let path = archive.save(&summary)?;
    Ok((summary, path))
}

/// 保存済みサマリーを出力する。書き出しに成功した場合のみ出力済みにする
pub fn export_session(
    session: &mut EstimationSession,
    format: ExportFormat,
    output: &Path,
    title: &str,
    currency_symbol: &str,
) -> Result<PathBuf> {
    let summary = session.exportable_summary()?.clone();
    let path = export::export_summary(&summary, format, output, title, currency_symbol)?;
    session.mark_exported(format)?;
    Ok(path)
}

/// 保存済み見積もりをファイルパスまたはIDの先頭部分から読み込む
pub fn resolve_summary(reference: &str, config: &Config) -> Result<EstimationSummary> {
    let path = Path::new(reference);
    if path.is_file() {
        return SummaryArchive::load_file(path);
    }
    let archive = SummaryArchive::new(config.archive_dir()?);
    Ok(archive.find(reference)?.summary)
}
