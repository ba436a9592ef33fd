//! 保存済み見積もり（一覧・検索・削除）の統合テスト

use blueprint_estimate::history::SummaryArchive;
use blueprint_estimate_common::summary::assemble_at;
use blueprint_estimate_common::{EstimationSummary, LineItem, UserDetails};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn summary(name: &str, email: &str, day: u32) -> EstimationSummary {
    let items = vec![
        LineItem::aggregate(3),
        LineItem::detected("window", 3, Decimal::ONE_HUNDRED, None),
    ];
    let created_at = Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap();
    assemble_at(&UserDetails::new(name, email), &items, created_at).unwrap()
}

#[test]
fn test_list_newest_first() {
    let dir = tempdir().expect("Failed to create temp dir");
    let archive = SummaryArchive::new(dir.path());

    let old = summary("Old", "old@example.com", 1);
    let new = summary("New", "new@example.com", 15);
    archive.save(&old).unwrap();
    archive.save(&new).unwrap();
    // 見積もり以外のファイルは無視
    std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

    let entries = archive.list();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].summary.id(), new.id());
    assert_eq!(entries[1].summary.id(), old.id());
}

#[test]
fn test_search_by_name_and_email() {
    let dir = tempdir().expect("Failed to create temp dir");
    let archive = SummaryArchive::new(dir.path());
    archive.save(&summary("Hanako Sato", "hanako@example.com", 2)).unwrap();
    archive.save(&summary("Taro Yamada", "taro@corp.jp", 3)).unwrap();

    assert_eq!(archive.search("sato").len(), 1);
    assert_eq!(archive.search("CORP.JP").len(), 1);
    assert_eq!(archive.search("").len(), 2);
    assert!(archive.search("nobody").is_empty());
}

#[test]
fn test_delete_by_id_prefix() {
    let dir = tempdir().expect("Failed to create temp dir");
    let archive = SummaryArchive::new(dir.path());
    let saved = summary("A", "a@b.com", 5);
    let path = archive.save(&saved).unwrap();

    let prefix = saved.id().to_string()[..8].to_string();
    let removed = archive.delete(&prefix).unwrap();

    assert_eq!(removed.path, path);
    assert!(!path.exists());
    assert!(archive.list().is_empty());
}

#[test]
fn test_unreadable_file_skipped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let archive = SummaryArchive::new(dir.path());
    archive.save(&summary("A", "a@b.com", 5)).unwrap();
    std::fs::write(dir.path().join("estimate-broken.json"), "{ broken").unwrap();

    assert_eq!(archive.list().len(), 1);
}
