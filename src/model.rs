//! Data model for scraped projections: player records, position eligibility, and the
//! per-group stat tables.
//!
//! The field order of [PlayerRecord] is the CSV column order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Roster position. Declaration order is the bit position in [PositionEligibility].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    Outfield,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
    Pitcher,
    StartingPitcher,
    ReliefPitcher,
}

impl Position {
    pub const ALL: [Position; 13] = [
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::ShortStop,
        Position::Outfield,
        Position::LeftField,
        Position::CenterField,
        Position::RightField,
        Position::DesignatedHitter,
        Position::Pitcher,
        Position::StartingPitcher,
        Position::ReliefPitcher,
    ];

    /// Abbreviation used by the source's eligibility text (e.g. "1B", "SP").
    pub fn abbreviation(self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::Outfield => "OF",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::Pitcher => "P",
            Position::StartingPitcher => "SP",
            Position::ReliefPitcher => "RP",
        }
    }

    /// Exact, case-sensitive match on the abbreviation.
    pub fn from_abbreviation(s: &str) -> Option<Position> {
        Position::ALL.into_iter().find(|p| p.abbreviation() == s)
    }

    pub fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of positions a player is eligible for, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PositionEligibility(u16);

impl PositionEligibility {
    const MASK: u16 = (1 << Position::ALL.len()) - 1;

    pub fn empty() -> Self {
        Self(0)
    }

    /// Rebuild from an integer bitmask. Returns None if any bit beyond the 13 positions is set.
    pub fn from_bits(bits: u16) -> Option<Self> {
        if bits & !Self::MASK == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, position: Position) -> bool {
        self.0 & position.bit() != 0
    }

    pub fn insert(&mut self, position: Position) {
        self.0 |= position.bit();
    }

    /// Positions in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Position> {
        Position::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl From<Position> for PositionEligibility {
    fn from(position: Position) -> Self {
        Self(position.bit())
    }
}

impl FromIterator<Position> for PositionEligibility {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = Self::empty();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl BitOr for PositionEligibility {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Position> for PositionEligibility {
    type Output = Self;

    fn bitor(self, rhs: Position) -> Self {
        Self(self.0 | rhs.bit())
    }
}

impl BitOrAssign<Position> for PositionEligibility {
    fn bitor_assign(&mut self, rhs: Position) {
        self.insert(rhs);
    }
}

impl fmt::Display for PositionEligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.iter().map(Position::abbreviation).collect();
        write!(f, "{}", codes.join(","))
    }
}

impl Serialize for PositionEligibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for PositionEligibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u16::deserialize(deserializer)?;
        PositionEligibility::from_bits(bits).ok_or_else(|| {
            serde::de::Error::custom(format!("position eligibility bitmask out of range: {}", bits))
        })
    }
}

/// Which leaderboard a table came from. The discriminant is the `slotCategoryGroup` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionGroup {
    Batter = 1,
    Pitcher = 2,
}

impl PositionGroup {
    /// Fetch order: batters first.
    pub const ALL: [PositionGroup; 2] = [PositionGroup::Batter, PositionGroup::Pitcher];

    pub fn slot_category(self) -> u8 {
        self as u8
    }

    /// Total leaderboard size paged through: roster slots x 10 teams x 2.
    pub fn total_items(self) -> u32 {
        match self {
            PositionGroup::Batter => 13 * 10 * 2,
            PositionGroup::Pitcher => 9 * 10 * 2,
        }
    }

    /// Stat cell i of a table maps to entry i.
    pub fn stat_fields(self) -> &'static [StatField; 11] {
        match self {
            PositionGroup::Batter => &StatField::BATTING,
            PositionGroup::Pitcher => &StatField::PITCHING,
        }
    }
}

/// One numeric stat column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    AtBats,
    Runs,
    HomeRuns,
    RunsBattedIn,
    BatterWalks,
    BatterStrikeouts,
    StolenBases,
    BattingAvg,
    OnBasePercent,
    SluggingAvg,
    OnBasePlusSlugging,
    Games,
    GamesStarted,
    InningsPitched,
    Walks,
    Strikeouts,
    Wins,
    Saves,
    Holds,
    EarnedRunAvg,
    WalksHitsPerInning,
    StrikeoutsPer9,
}

impl StatField {
    pub const BATTING: [StatField; 11] = [
        StatField::AtBats,
        StatField::Runs,
        StatField::HomeRuns,
        StatField::RunsBattedIn,
        StatField::BatterWalks,
        StatField::BatterStrikeouts,
        StatField::StolenBases,
        StatField::BattingAvg,
        StatField::OnBasePercent,
        StatField::SluggingAvg,
        StatField::OnBasePlusSlugging,
    ];

    pub const PITCHING: [StatField; 11] = [
        StatField::Games,
        StatField::GamesStarted,
        StatField::InningsPitched,
        StatField::Walks,
        StatField::Strikeouts,
        StatField::Wins,
        StatField::Saves,
        StatField::Holds,
        StatField::EarnedRunAvg,
        StatField::WalksHitsPerInning,
        StatField::StrikeoutsPer9,
    ];

    /// CSV column name.
    pub fn column(self) -> &'static str {
        match self {
            StatField::AtBats => "at_bats",
            StatField::Runs => "runs",
            StatField::HomeRuns => "home_runs",
            StatField::RunsBattedIn => "runs_batted_in",
            StatField::BatterWalks => "batter_walks",
            StatField::BatterStrikeouts => "batter_strikeouts",
            StatField::StolenBases => "stolen_bases",
            StatField::BattingAvg => "batting_avg",
            StatField::OnBasePercent => "on_base_percent",
            StatField::SluggingAvg => "slugging_avg",
            StatField::OnBasePlusSlugging => "on_base_plus_slugging",
            StatField::Games => "games",
            StatField::GamesStarted => "games_started",
            StatField::InningsPitched => "innings_pitched",
            StatField::Walks => "walks",
            StatField::Strikeouts => "strikeouts",
            StatField::Wins => "wins",
            StatField::Saves => "saves",
            StatField::Holds => "holds",
            StatField::EarnedRunAvg => "earned_run_avg",
            StatField::WalksHitsPerInning => "walks_hits_per_inning",
            StatField::StrikeoutsPer9 => "strikeouts_per_9",
        }
    }
}

/// One player's projected season line.
///
/// Stats that do not apply to the player's group stay at 0.0. Serializes to one CSV row;
/// eligibility is written as its integer bitmask.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    pub name: String,
    pub position_eligibility: PositionEligibility,

    pub at_bats: f64,
    pub runs: f64,
    pub home_runs: f64,
    pub runs_batted_in: f64,
    pub batter_walks: f64,
    pub batter_strikeouts: f64,
    pub stolen_bases: f64,
    pub batting_avg: f64,
    pub on_base_percent: f64,
    pub slugging_avg: f64,
    pub on_base_plus_slugging: f64,

    pub games: f64,
    pub games_started: f64,
    pub innings_pitched: f64,
    pub walks: f64,
    pub strikeouts: f64,
    pub wins: f64,
    pub saves: f64,
    pub holds: f64,
    pub earned_run_avg: f64,
    pub walks_hits_per_inning: f64,
    pub strikeouts_per_9: f64,
}

impl PlayerRecord {
    pub fn new(player_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Output column names in CSV order.
    pub fn columns() -> Vec<&'static str> {
        let mut cols = vec!["player_id", "name", "position_eligibility"];
        cols.extend(StatField::BATTING.iter().map(|f| f.column()));
        cols.extend(StatField::PITCHING.iter().map(|f| f.column()));
        cols
    }

    pub fn stat(&self, field: StatField) -> f64 {
        match field {
            StatField::AtBats => self.at_bats,
            StatField::Runs => self.runs,
            StatField::HomeRuns => self.home_runs,
            StatField::RunsBattedIn => self.runs_batted_in,
            StatField::BatterWalks => self.batter_walks,
            StatField::BatterStrikeouts => self.batter_strikeouts,
            StatField::StolenBases => self.stolen_bases,
            StatField::BattingAvg => self.batting_avg,
            StatField::OnBasePercent => self.on_base_percent,
            StatField::SluggingAvg => self.slugging_avg,
            StatField::OnBasePlusSlugging => self.on_base_plus_slugging,
            StatField::Games => self.games,
            StatField::GamesStarted => self.games_started,
            StatField::InningsPitched => self.innings_pitched,
            StatField::Walks => self.walks,
            StatField::Strikeouts => self.strikeouts,
            StatField::Wins => self.wins,
            StatField::Saves => self.saves,
            StatField::Holds => self.holds,
            StatField::EarnedRunAvg => self.earned_run_avg,
            StatField::WalksHitsPerInning => self.walks_hits_per_inning,
            StatField::StrikeoutsPer9 => self.strikeouts_per_9,
        }
    }

    pub fn set_stat(&mut self, field: StatField, value: f64) {
        let slot = match field {
            StatField::AtBats => &mut self.at_bats,
            StatField::Runs => &mut self.runs,
            StatField::HomeRuns => &mut self.home_runs,
            StatField::RunsBattedIn => &mut self.runs_batted_in,
            StatField::BatterWalks => &mut self.batter_walks,
            StatField::BatterStrikeouts => &mut self.batter_strikeouts,
            StatField::StolenBases => &mut self.stolen_bases,
            StatField::BattingAvg => &mut self.batting_avg,
            StatField::OnBasePercent => &mut self.on_base_percent,
            StatField::SluggingAvg => &mut self.slugging_avg,
            StatField::OnBasePlusSlugging => &mut self.on_base_plus_slugging,
            StatField::Games => &mut self.games,
            StatField::GamesStarted => &mut self.games_started,
            StatField::InningsPitched => &mut self.innings_pitched,
            StatField::Walks => &mut self.walks,
            StatField::Strikeouts => &mut self.strikeouts,
            StatField::Wins => &mut self.wins,
            StatField::Saves => &mut self.saves,
            StatField::Holds => &mut self.holds,
            StatField::EarnedRunAvg => &mut self.earned_run_avg,
            StatField::WalksHitsPerInning => &mut self.walks_hits_per_inning,
            StatField::StrikeoutsPer9 => &mut self.strikeouts_per_9,
        };
        *slot = value;
    }
}
