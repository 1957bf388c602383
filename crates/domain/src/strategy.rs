//! # 削除戦略の選択
//!
//! コレクションごとに 3 種類の削除戦略のいずれかを割り当てる。
//!
//! | コレクション | 戦略 |
//! |-------------|------|
//! | `people` | [`DeletionStrategy::PersonCascade`] |
//! | `medicals` | [`DeletionStrategy::MedicalCascade`] |
//! | その他 | [`DeletionStrategy::Standard`]（対象テーブル付き） |
//!
//! 戦略は継承階層ではなく列挙型で表現し、実行はインフラ層の
//! `deletion::execute` がパターンマッチで振り分ける。

use crate::collection::{Collection, Table};

/// 削除戦略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStrategy {
    /// 人物と、その受講登録・健診（健診ごとのカスケード含む）を削除する
    PersonCascade,
    /// 健診と、その健康カテゴリレポート・所見を削除する
    MedicalCascade,
    /// 依存行を持たないテーブルから 1 文で削除する
    Standard(Table),
}

impl DeletionStrategy {
    /// コレクションに対応する削除戦略を選ぶ
    pub fn select(collection: Collection) -> Self {
        match collection {
            Collection::People => Self::PersonCascade,
            Collection::Medicals => Self::MedicalCascade,
            other => Self::Standard(other.table()),
        }
    }

    /// 最終的に削除される主テーブル
    pub fn target_table(&self) -> Table {
        match self {
            Self::PersonCascade => Table::DimPerson,
            Self::MedicalCascade => Table::FactMedical,
            Self::Standard(table) => *table,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_peopleは人物カスケード() {
        assert_eq!(
            DeletionStrategy::select(Collection::People),
            DeletionStrategy::PersonCascade
        );
    }

    #[test]
    fn test_medicalsは健診カスケード() {
        assert_eq!(
            DeletionStrategy::select(Collection::Medicals),
            DeletionStrategy::MedicalCascade
        );
    }

    #[rstest]
    #[case(Collection::Appointments, Table::FactAppointment)]
    #[case(Collection::Companies, Table::DimOrganization)]
    #[case(Collection::Contracts, Table::DimContract)]
    #[case(Collection::Groups, Table::DimGroup)]
    #[case(Collection::Locations, Table::DimLocation)]
    #[case(Collection::Organisations, Table::DimOrganization)]
    #[case(Collection::Products, Table::DimProduct)]
    #[case(Collection::Programmes, Table::DimProgramme)]
    fn test_その他のコレクションは対象テーブル付きの単純削除(
        #[case] collection: Collection,
        #[case] table: Table,
    ) {
        assert_eq!(
            DeletionStrategy::select(collection),
            DeletionStrategy::Standard(table)
        );
    }

    #[test]
    fn test_target_tableはレジストリのテーブルと一致する() {
        for collection in Collection::iter() {
            assert_eq!(
                DeletionStrategy::select(collection).target_table(),
                collection.table(),
                "{collection}"
            );
        }
    }
}
