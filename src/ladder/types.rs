use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type EntityId = i64;
pub type Position = i64;

/// A single set as (challenger games, challenged games).
pub type SetScore = (u32, u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Singles,
    Doubles,
}

impl Discipline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Singles => "singles",
            Discipline::Doubles => "doubles",
        }
    }

    /// Table holding the ranked entities of this discipline.
    pub fn entity_table(&self) -> &'static str {
        match self {
            Discipline::Singles => "players",
            Discipline::Doubles => "teams",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Discipline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "singles" => Ok(Discipline::Singles),
            "doubles" => Ok(Discipline::Doubles),
            other => Err(format!("unknown discipline: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// The set of entities sharing one dense 1..N ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    Singles,
    Doubles { tournament_id: i64, gender: Gender },
}

impl Pool {
    pub fn discipline(&self) -> Discipline {
        match self {
            Pool::Singles => Discipline::Singles,
            Pool::Doubles { .. } => Discipline::Doubles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Red,
    Yellow,
    Green,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Red => "red",
            ActivityStatus::Yellow => "yellow",
            ActivityStatus::Green => "green",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(ActivityStatus::Red),
            "yellow" => Ok(ActivityStatus::Yellow),
            "green" => Ok(ActivityStatus::Green),
            other => Err(format!("unknown activity status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Pending,
    Played,
    Rejected,
    Ignored,
    Cancelled,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Pending => "pending",
            ChallengeStatus::Played => "played",
            ChallengeStatus::Rejected => "rejected",
            ChallengeStatus::Ignored => "ignored",
            ChallengeStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChallengeStatus::Pending)
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ChallengeStatus::Pending),
            "played" => Ok(ChallengeStatus::Played),
            "rejected" => Ok(ChallengeStatus::Rejected),
            "ignored" => Ok(ChallengeStatus::Ignored),
            "cancelled" => Ok(ChallengeStatus::Cancelled),
            other => Err(format!("unknown challenge status: {other}")),
        }
    }
}
