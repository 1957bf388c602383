//! # 依存関係（外部キー）
//!
//! レポーティング DB のスキーマには `ON DELETE CASCADE` がないため、
//! 親行を消す前に子行を明示的に削除する必要がある。
//! このモジュールは削除戦略が使う外部キー依存を静的に定義する。
//! 実行時にスキーマから依存関係を探索することはしない。
//!
//! ```text
//! dim_person ─┬─ fact_people_enrollment.dim_person_fk
//!             └─ fact_medical.dim_person_fk ─┬─ fact_health_category_report.fact_medical_fk
//!                                            └─ fact_observation.fact_medical_fk
//! ```

use strum::IntoStaticStr;

use crate::collection::Table;

/// 主キーカラム名
pub const ID_COLUMN: &str = "id";

/// 外部 ID カラム名
pub const EXTERNAL_ID_COLUMN: &str = "mongo_id";

/// 外部キーカラム
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ForeignKeyColumn {
    /// `dim_person.id` への参照
    DimPersonFk,
    /// `fact_medical.id` への参照
    FactMedicalFk,
}

impl ForeignKeyColumn {
    /// カラム名を返す
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// 参照先（親）テーブルを返す
    pub fn references(&self) -> Table {
        match self {
            Self::DimPersonFk => Table::DimPerson,
            Self::FactMedicalFk => Table::FactMedical,
        }
    }
}

/// 子テーブル → 親テーブルの依存辺
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    pub child:       Table,
    pub foreign_key: ForeignKeyColumn,
}

impl DependencyEdge {
    /// 親テーブルを返す
    pub fn parent(&self) -> Table {
        self.foreign_key.references()
    }
}

/// 受講登録 → 人物
pub const PERSON_ENROLLMENTS: DependencyEdge = DependencyEdge {
    child:       Table::FactPeopleEnrollment,
    foreign_key: ForeignKeyColumn::DimPersonFk,
};

/// 健診 → 人物（健診ごとにさらにカスケードが必要）
pub const PERSON_MEDICALS: DependencyEdge = DependencyEdge {
    child:       Table::FactMedical,
    foreign_key: ForeignKeyColumn::DimPersonFk,
};

/// 健康カテゴリレポート → 健診
pub const MEDICAL_HEALTH_CATEGORY_REPORTS: DependencyEdge = DependencyEdge {
    child:       Table::FactHealthCategoryReport,
    foreign_key: ForeignKeyColumn::FactMedicalFk,
};

/// 所見 → 健診
pub const MEDICAL_OBSERVATIONS: DependencyEdge = DependencyEdge {
    child:       Table::FactObservation,
    foreign_key: ForeignKeyColumn::FactMedicalFk,
};

/// 既知の依存辺すべて
pub const ALL_EDGES: [DependencyEdge; 4] = [
    PERSON_ENROLLMENTS,
    PERSON_MEDICALS,
    MEDICAL_HEALTH_CATEGORY_REPORTS,
    MEDICAL_OBSERVATIONS,
];
