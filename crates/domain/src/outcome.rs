//! # 削除結果
//!
//! 削除戦略の実行結果を表す。
//!
//! - [`DeletionOutcome::Deleted`]: 対象行が見つかり削除した。テーブルごとの削除件数を持つ
//! - [`DeletionOutcome::NotFound`]: 対象行が存在しなかった（未登録、または削除済み）
//!
//! `NotFound` はエラーではない。キューは at-least-once 配信のため、
//! 同じ削除要求が再配信されれば 2 回目は必ず `NotFound` になる。

use serde::Serialize;

use crate::collection::Table;

/// 1 テーブル分の削除件数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDeletion {
    pub table:         Table,
    pub deleted_count: u64,
}

/// テーブルごとの削除件数（実行順）
///
/// 同じテーブルを複数回記録した場合は件数を合算する。
/// 人物カスケードで複数の健診を削除したときの所見件数などが該当する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeletionCounts(Vec<TableDeletion>);

impl DeletionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// 削除件数を記録する
    pub fn record(&mut self, table: Table, deleted_count: u64) {
        match self.0.iter_mut().find(|d| d.table == table) {
            Some(entry) => entry.deleted_count += deleted_count,
            None => self.0.push(TableDeletion {
                table,
                deleted_count,
            }),
        }
    }

    /// 別の集計を取り込む
    pub fn merge(&mut self, other: &DeletionCounts) {
        for deletion in &other.0 {
            self.record(deletion.table, deletion.deleted_count);
        }
    }

    /// 指定テーブルの削除件数（未記録なら 0）
    pub fn get(&self, table: Table) -> u64 {
        self.0
            .iter()
            .find(|d| d.table == table)
            .map_or(0, |d| d.deleted_count)
    }

    /// 全テーブルの合計件数
    pub fn total(&self) -> u64 {
        self.0.iter().map(|d| d.deleted_count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableDeletion> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 削除戦略の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// 対象を削除した
    Deleted(DeletionCounts),
    /// 対象が存在しなかった
    NotFound {
        /// 外部 ID で検索したテーブル
        table: Table,
    },
}

/// レスポンス向けの結果種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeletionStatus {
    Deleted,
    NotFound,
}

impl DeletionOutcome {
    pub fn status(&self) -> DeletionStatus {
        match self {
            Self::Deleted(_) => DeletionStatus::Deleted,
            Self::NotFound { .. } => DeletionStatus::NotFound,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// テーブルごとの削除件数（`NotFound` なら空）
    pub fn counts(&self) -> DeletionCounts {
        match self {
            Self::Deleted(counts) => counts.clone(),
            Self::NotFound { .. } => DeletionCounts::new(),
        }
    }

    /// 指定テーブルの削除件数
    pub fn deleted_count(&self, table: Table) -> u64 {
        match self {
            Self::Deleted(counts) => counts.get(table),
            Self::NotFound { .. } => 0,
        }
    }

    /// 合計削除件数
    pub fn total_deleted(&self) -> u64 {
        match self {
            Self::Deleted(counts) => counts.total(),
            Self::NotFound { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_recordは同じテーブルの件数を合算し順序を保つ() {
        let mut counts = DeletionCounts::new();
        counts.record(Table::FactPeopleEnrollment, 1);
        counts.record(Table::FactObservation, 2);
        counts.record(Table::FactObservation, 3);
        counts.record(Table::DimPerson, 1);

        let tables: Vec<_> = counts.iter().map(|d| (d.table, d.deleted_count)).collect();
        assert_eq!(
            tables,
            vec![
                (Table::FactPeopleEnrollment, 1),
                (Table::FactObservation, 5),
                (Table::DimPerson, 1),
            ]
        );
        assert_eq!(counts.total(), 7);
    }

    #[test]
    fn test_mergeは件数を取り込む() {
        let mut person = DeletionCounts::new();
        person.record(Table::FactPeopleEnrollment, 1);

        let mut medical = DeletionCounts::new();
        medical.record(Table::FactObservation, 2);
        medical.record(Table::FactMedical, 1);

        person.merge(&medical);
        person.merge(&medical);

        assert_eq!(person.get(Table::FactObservation), 4);
        assert_eq!(person.get(Table::FactMedical), 2);
        assert_eq!(person.get(Table::DimPerson), 0);
    }

    #[test]
    fn test_not_foundの件数はすべて0() {
        let outcome = DeletionOutcome::NotFound {
            table: Table::DimPerson,
        };

        assert!(outcome.is_not_found());
        assert_eq!(outcome.status(), DeletionStatus::NotFound);
        assert_eq!(outcome.total_deleted(), 0);
        assert_eq!(outcome.deleted_count(Table::DimPerson), 0);
        assert!(outcome.counts().is_empty());
    }

    #[test]
    fn test_deletion_countsはテーブルと件数の配列としてシリアライズされる() {
        let mut counts = DeletionCounts::new();
        counts.record(Table::FactMedical, 1);

        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "table": "fact_medical", "deleted_count": 1 }])
        );
    }
}
