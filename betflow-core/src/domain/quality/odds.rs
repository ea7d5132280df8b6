// betflow-core/src/domain/quality/odds.rs
//
// What the odds feed guarantees about a staged table: the league it was
// requested for, head-to-head markets in American format, and snapshots
// taken every 30 minutes while the game is played.

use serde::Serialize;
use std::fmt;

use super::data_test::{DataTest, Severity, TestKind};
use crate::domain::project::Manifest;

/// Minutes between two captured snapshots of a game.
pub const SNAPSHOT_INTERVAL_MINUTES: u32 = 30;

/// Allowance added to non-football windows for overtime.
pub const OVERTIME_MINUTES: u32 = 30;

/// The only market the feed is requested with.
pub const H2H_MARKET: &str = "h2h";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Nfl,
    Cfb,
    Nba,
    Nhl,
}

impl Sport {
    pub const ALL: [Sport; 4] = [Sport::Nfl, Sport::Cfb, Sport::Nba, Sport::Nhl];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "nfl" => Some(Sport::Nfl),
            "cfb" | "ncaaf" => Some(Sport::Cfb),
            "nba" => Some(Sport::Nba),
            "nhl" => Some(Sport::Nhl),
            _ => None,
        }
    }

    /// `stg_nba_odds` -> `Nba`.
    pub fn from_model_name(model: &str) -> Option<Self> {
        model
            .strip_prefix("stg_")
            .and_then(|rest| rest.strip_suffix("_odds"))
            .and_then(Self::from_code)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Sport::Nfl => "nfl",
            Sport::Cfb => "cfb",
            Sport::Nba => "nba",
            Sport::Nhl => "nhl",
        }
    }

    /// Sport key used by the odds provider.
    pub fn sport_key(&self) -> &'static str {
        match self {
            Sport::Nfl => "americanfootball_nfl",
            Sport::Cfb => "americanfootball_ncaaf",
            Sport::Nba => "basketball_nba",
            Sport::Nhl => "icehockey_nhl",
        }
    }

    pub fn is_football(&self) -> bool {
        matches!(self, Sport::Nfl | Sport::Cfb)
    }

    /// Minutes after kickoff during which snapshots are captured.
    pub fn snapshot_window_minutes(&self) -> u32 {
        if self.is_football() {
            240
        } else {
            180 + OVERTIME_MINUTES
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A check derived from the feed contract rather than declared in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCheck {
    pub model: String,
    pub column: String,
    pub test: DataTest,
}

/// Contract checks for every `stg_<league>_odds` model of the manifest,
/// limited to the columns the model documents.
pub fn contract_checks(manifest: &Manifest) -> Vec<ContractCheck> {
    let mut checks = Vec::new();

    for model in &manifest.models {
        let Some(sport) = Sport::from_model_name(&model.name) else {
            continue;
        };
        let has = |column: &str| model.column(column).is_some();
        let mut push = |column: &str, kind: TestKind| {
            checks.push(ContractCheck {
                model: model.name.clone(),
                column: column.to_string(),
                test: DataTest::contract(kind),
            });
        };

        if has("sport_key") {
            push(
                "sport_key",
                TestKind::OddsSportKey {
                    sport: Some(sport),
                },
            );
        }
        if has("market_key") {
            push(
                "market_key",
                TestKind::AcceptedValues {
                    values: vec![H2H_MARKET.to_string()],
                    quote: true,
                },
            );
        }
        if has("outcome_price") {
            push("outcome_price", TestKind::OddsAmericanPrice);
        }
        if has("snapshot_timestamp") && has("commence_time") {
            push(
                "snapshot_timestamp",
                TestKind::OddsSnapshotGrid {
                    commence_column: "commence_time".to_string(),
                    interval_minutes: SNAPSHOT_INTERVAL_MINUTES,
                    window_minutes: None,
                },
            );
        }
    }

    checks
}

impl DataTest {
    fn contract(kind: TestKind) -> Self {
        Self {
            name: kind.default_name().to_string(),
            kind,
            severity: Severity::Error,
            enabled: true,
        }
    }
}
