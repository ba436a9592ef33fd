//! 見積もり明細ストア
//!
//! 1セッションが専有する明細リスト。更新経路は `edit_*` のみで、
//! 更新のたびに表示側向けのイベントを積む。

use crate::types::LineItem;
use rust_decimal::Decimal;
use uuid::Uuid;

/// 表示側へ通知するイベント
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// 明細リストが丸ごと置き換わった
    Replaced { items: usize },
    /// 明細が更新された
    ItemUpdated { id: Uuid, name: String },
}

/// 更新結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    /// 対象が見つからず何も変更していない
    NotFound,
}

impl EditOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, EditOutcome::Updated)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EstimationStore {
    items: Vec<LineItem>,
    events: Vec<StoreEvent>,
}

impl EstimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<LineItem>) -> Self {
        let mut store = Self::new();
        store.replace_all(items);
        store
    }

    /// 明細リストを丸ごと置き換える（前の状態は引き継がない）
    pub fn replace_all(&mut self, items: Vec<LineItem>) {
        self.items = items;
        self.events.push(StoreEvent::Replaced {
            items: self.items.len(),
        });
    }

    /// 現在の明細（挿入順）
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// 名前で明細を更新する
    ///
    /// 同名が複数ある場合は先頭の1件のみ。見つからなければ何もしない。
    pub fn edit_by_name(&mut self, name: &str, count: u64, price: Decimal) -> EditOutcome {
        match self.items.iter().position(|i| i.name == name) {
            Some(index) => self.apply_edit(index, count, price),
            None => {
                tracing::debug!(name, "edit target not found; ignored");
                EditOutcome::NotFound
            }
        }
    }

    /// IDで明細を更新する
    pub fn edit_by_id(&mut self, id: Uuid, count: u64, price: Decimal) -> EditOutcome {
        match self.items.iter().position(|i| i.id == id) {
            Some(index) => self.apply_edit(index, count, price),
            None => {
                tracing::debug!(%id, "edit target not found; ignored");
                EditOutcome::NotFound
            }
        }
    }

    fn apply_edit(&mut self, index: usize, count: u64, price: Decimal) -> EditOutcome {
        let item = &mut self.items[index];
        item.count = count;
        // 集計行の単価は常に0
        item.price = if item.is_aggregate() {
            Decimal::ZERO
        } else {
            price.max(Decimal::ZERO)
        };

        tracing::info!(
            name = %item.name,
            count = item.count,
            price = %item.price,
            "item updated"
        );
        self.events.push(StoreEvent::ItemUpdated {
            id: item.id,
            name: item.name.clone(),
        });
        EditOutcome::Updated
    }

    /// 溜まったイベントを取り出す
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TOTAL_SYMBOLS_NAME;

    fn sample_store() -> EstimationStore {
        EstimationStore::with_items(vec![
            LineItem::aggregate(10),
            LineItem::detected("window", 5, Decimal::ONE_HUNDRED, Some("/w.png".into())),
            LineItem::detected("wall", 3, Decimal::ONE_HUNDRED, None),
        ])
    }

    #[test]
    fn test_edit_by_id_and_lookup() {
        let mut store = sample_store();
        let wall_id = store.items()[2].id;

        assert_eq!(store.edit_by_id(wall_id, 7, Decimal::new(25, 0)), EditOutcome::Updated);
        let wall = store.get_by_id(wall_id).unwrap();
        assert_eq!(wall.count, 7);
        assert_eq!(wall.price, Decimal::new(25, 0));

        let unknown = Uuid::new_v4();
        assert!(store.get_by_id(unknown).is_none());
        assert_eq!(store.edit_by_id(unknown, 1, Decimal::ONE), EditOutcome::NotFound);
    }

    #[test]
    fn test_edit_round_trip() {
        let mut store = sample_store();
        let outcome = store.edit_by_name("wall", 7, Decimal::new(125, 1));
        assert!(outcome.is_updated());

        let wall = store.get_by_name("wall").unwrap();
        assert_eq!(wall.count, 7);
        assert_eq!(wall.price, Decimal::new(125, 1));
    }

    #[test]
    fn test_edit_missing_name_is_noop() {
        let mut store = sample_store();
        let before = store.items().to_vec();
        store.drain_events();

        let outcome = store.edit_by_name("roof", 1, Decimal::ONE);
        assert_eq!(outcome, EditOutcome::NotFound);
        assert_eq!(store.items(), before.as_slice());
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_edit_emits_event() {
        let mut store = sample_store();
        assert_eq!(store.drain_events(), vec![StoreEvent::Replaced { items: 3 }]);

        let window_id = store.get_by_name("window").unwrap().id;
        store.edit_by_id(window_id, 6, Decimal::ONE_HUNDRED);
        assert_eq!(
            store.drain_events(),
            vec![StoreEvent::ItemUpdated {
                id: window_id,
                name: "window".to_string()
            }]
        );
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_items_idempotent() {
        let store = sample_store();
        assert_eq!(store.items(), store.items());
    }

    #[test]
    fn test_replace_all_discards_previous() {
        let mut store = sample_store();
        store.replace_all(vec![LineItem::aggregate(1)]);
        assert_eq!(store.len(), 1);
        assert!(store.get_by_name("window").is_none());
    }

    #[test]
    fn test_duplicate_names_first_match_wins() {
        let mut store = EstimationStore::with_items(vec![
            LineItem::detected("beam", 1, Decimal::ONE_HUNDRED, None),
            LineItem::detected("beam", 2, Decimal::ONE_HUNDRED, None),
        ]);
        store.edit_by_name("beam", 9, Decimal::ONE);
        assert_eq!(store.items()[0].count, 9);
        assert_eq!(store.items()[1].count, 2);

        let second = store.items()[1].id;
        store.edit_by_id(second, 4, Decimal::ONE);
        assert_eq!(store.items()[1].count, 4);
    }

    #[test]
    fn test_aggregate_price_stays_zero() {
        let mut store = sample_store();
        store.edit_by_name(TOTAL_SYMBOLS_NAME, 12, Decimal::new(50, 0));
        let total = store.get_by_name(TOTAL_SYMBOLS_NAME).unwrap();
        assert_eq!(total.count, 12);
        assert_eq!(total.price, Decimal::ZERO);
    }

    #[test]
    fn test_negative_price_clamped() {
        let mut store = sample_store();
        store.edit_by_name("window", 1, Decimal::new(-5, 0));
        assert_eq!(store.get_by_name("window").unwrap().price, Decimal::ZERO);
    }
}
