//! # コレクションレジストリ
//!
//! 上流システムの論理コレクション名と、レポーティング DB の物理テーブルの対応表。
//! 削除要求の妥当性はこの対応表だけで判断する。
//!
//! ## 対応表
//!
//! | コレクション | テーブル |
//! |-------------|----------|
//! | `appointments` | `fact_appointment` |
//! | `companies` | `dim_organization` |
//! | `contracts` | `dim_contract` |
//! | `groups` | `dim_group` |
//! | `medicals` | `fact_medical` |
//! | `locations` | `dim_location` |
//! | `people` | `dim_person` |
//! | `organisations` | `dim_organization` |
//! | `products` | `dim_product` |
//! | `programmes` | `dim_programme` |
//!
//! `companies` と `organisations` は同じテーブルの別名。

use std::str::FromStr;

use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// 論理コレクション
///
/// 削除要求の `collection` フィールドが取りうる値の閉じた集合。
/// 文字列との変換は大文字小文字を区別する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    IntoStaticStr,
    EnumIter,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
    Appointments,
    Companies,
    Contracts,
    Groups,
    Medicals,
    Locations,
    People,
    Organisations,
    Products,
    Programmes,
}

impl Collection {
    /// コレクション名を返す
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// 削除対象の物理テーブルを返す
    pub fn table(&self) -> Table {
        match self {
            Self::Appointments => Table::FactAppointment,
            Self::Companies | Self::Organisations => Table::DimOrganization,
            Self::Contracts => Table::DimContract,
            Self::Groups => Table::DimGroup,
            Self::Medicals => Table::FactMedical,
            Self::Locations => Table::DimLocation,
            Self::People => Table::DimPerson,
            Self::Products => Table::DimProduct,
            Self::Programmes => Table::DimProgramme,
        }
    }
}

/// レポーティング DB の物理テーブル
///
/// SQL に埋め込むテーブル名はこの列挙型からのみ生成する。
/// 外部入力の文字列がそのまま SQL に入ることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    FactAppointment,
    DimOrganization,
    DimContract,
    DimGroup,
    FactMedical,
    DimLocation,
    DimPerson,
    DimProduct,
    DimProgramme,
    /// 受講登録（`dim_person_fk` で人物を参照）
    FactPeopleEnrollment,
    /// 健康カテゴリレポート（`fact_medical_fk` で健診を参照）
    FactHealthCategoryReport,
    /// 所見（`fact_medical_fk` で健診を参照）
    FactObservation,
}

impl Table {
    /// テーブル名を返す
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// コレクション名からテーブルを引く
///
/// 未知のコレクション名には `None` を返す。
pub fn table_for(collection: &str) -> Option<Table> {
    Collection::from_str(collection)
        .ok()
        .map(|collection| collection.table())
}

/// 受け付け可能なコレクション名の一覧を返す
pub fn valid_collections() -> Vec<&'static str> {
    Collection::iter().map(|c| c.as_str()).collect()
}
