use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a pull sheet.
///
/// The transition table is declared once here; every state-dependent rule in
/// the scan workflow asks this enum instead of comparing strings at call
/// sites.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PullSheetStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "finalized")]
    Finalized,
    #[sea_orm(string_value = "returned")]
    Returned,
}

impl PullSheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Finalized => "finalized",
            Self::Returned => "returned",
        }
    }

    /// Declared transition table: Draft <-> Active, Active -> Finalized,
    /// Finalized -> Returned.
    pub fn can_transition_to(&self, next: PullSheetStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Active)
                | (Self::Active, Self::Draft)
                | (Self::Active, Self::Finalized)
                | (Self::Finalized, Self::Returned)
        )
    }

    /// Unit-level scan tracking (duplicate rejection + pulled counter) only
    /// applies while the sheet is being actively pulled.
    pub fn unit_tracking_enabled(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for PullSheetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PullSheetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "finalized" => Ok(Self::Finalized),
            "returned" => Ok(Self::Returned),
            other => Err(format!("unknown pull sheet status: {}", other)),
        }
    }
}

/// The `pull_sheets` table.
///
/// One outbound equipment manifest per job.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pull_sheets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: PullSheetStatus,
    pub scheduled_out_at: Option<DateTime>,
    pub expected_return_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::PullSheetStatus::*;

    #[test]
    fn transition_table_allows_declared_edges() {
        assert!(Draft.can_transition_to(Active));
        assert!(Active.can_transition_to(Draft));
        assert!(Active.can_transition_to(Finalized));
        assert!(Finalized.can_transition_to(Returned));
    }

    #[test]
    fn transition_table_rejects_everything_else() {
        assert!(!Draft.can_transition_to(Finalized));
        assert!(!Draft.can_transition_to(Returned));
        assert!(!Active.can_transition_to(Returned));
        assert!(!Finalized.can_transition_to(Active));
        assert!(!Returned.can_transition_to(Draft));
        assert!(!Returned.can_transition_to(Finalized));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn unit_tracking_applies_only_to_active() {
        assert!(Active.unit_tracking_enabled());
        assert!(!Draft.unit_tracking_enabled());
        assert!(!Finalized.unit_tracking_enabled());
        assert!(!Returned.unit_tracking_enabled());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [Draft, Active, Finalized, Returned] {
            assert_eq!(status.as_str().parse::<super::PullSheetStatus>(), Ok(status));
        }
        assert!("archived".parse::<super::PullSheetStatus>().is_err());
    }
}
