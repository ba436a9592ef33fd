//! 保存済み見積もりの管理
//!
//! サマリー1件をJSONファイル1つとして保存する。

use crate::error::{EstimateError, Result};
use blueprint_estimate_common::EstimationSummary;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const FILE_PREFIX: &str = "estimate-";

/// 保存済み見積もり1件
#[derive(Debug, Clone)]
pub struct ArchivedSummary {
    pub path: PathBuf,
    pub summary: EstimationSummary,
}

#[derive(Debug, Clone)]
pub struct SummaryArchive {
    dir: PathBuf,
}

impl SummaryArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, summary: &EstimationSummary) -> PathBuf {
        self.dir.join(format!("{}{}.json", FILE_PREFIX, summary.id()))
    }

    /// サマリーを保存する
    pub fn save(&self, summary: &EstimationSummary) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(summary);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, summary)?;
        tracing::info!(path = %path.display(), "summary archived");
        Ok(path)
    }

    /// JSONファイルから読み込む
    pub fn load_file(path: &Path) -> Result<EstimationSummary> {
        if !path.exists() {
            return Err(EstimateError::FileNotFound(path.display().to_string()));
        }
        let reader = BufReader::new(File::open(path)?);
        let summary = serde_json::from_reader(reader)?;
        Ok(summary)
    }

    /// 保存済み一覧（新しい順）。読めないファイルはスキップ
    pub fn list(&self) -> Vec<ArchivedSummary> {
        if !self.dir.exists() {
            return Vec::new();
        }

        let mut entries: Vec<ArchivedSummary> = WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_archive_file(e.path()))
            .filter_map(|e| match Self::load_file(e.path()) {
                Ok(summary) => Some(ArchivedSummary {
                    path: e.path().to_path_buf(),
                    summary,
                }),
                Err(err) => {
                    tracing::warn!(path = %e.path().display(), %err, "unreadable summary skipped");
                    None
                }
            })
            .collect();

        entries.sort_by(|a, b| b.summary.created_at().cmp(&a.summary.created_at()));
        entries
    }

    /// 氏名・メールで絞り込み（大文字小文字を区別しない）
    pub fn search(&self, query: &str) -> Vec<ArchivedSummary> {
        let query = query.trim().to_lowercase();
        self.list()
            .into_iter()
            .filter(|e| {
                query.is_empty()
                    || e.summary.user().name.to_lowercase().contains(&query)
                    || e.summary.user().email.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// IDの先頭部分で1件を特定する
    pub fn find(&self, id_prefix: &str) -> Result<ArchivedSummary> {
        let prefix = id_prefix.trim().to_lowercase();
        let mut matches: Vec<ArchivedSummary> = self
            .list()
            .into_iter()
            .filter(|e| !prefix.is_empty() && e.summary.id().to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(EstimateError::SummaryNotFound(id_prefix.to_string())),
            n => Err(EstimateError::SummaryNotFound(format!(
                "{} ({}件が一致、もっと長く指定してください)",
                id_prefix, n
            ))),
        }
    }

    /// IDの先頭部分で指定した見積もりを削除する
    pub fn delete(&self, id_prefix: &str) -> Result<ArchivedSummary> {
        let entry = self.find(id_prefix)?;
        std::fs::remove_file(&entry.path)?;
        tracing::info!(path = %entry.path.display(), "summary deleted");
        Ok(entry)
    }
}

fn is_archive_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    name.starts_with(FILE_PREFIX) && name.ends_with(".json")
}
