use crate::domain::money::Money;
use crate::utils::error::JailError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: i32,
    pub department_id: i32,
    pub cell_number: i32,
    pub has_window: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prisoner {
    pub id: i32,
    pub full_name: String,
    pub nickname: Option<String>,
    pub age: i32,
    pub bail: Option<Money>,
    pub cell_id: Option<i32>,
    pub incarceration_date: NaiveDate,
    pub release_date: Option<NaiveDate>,
    pub mails: Vec<Mail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mail {
    pub id: i32,
    pub prisoner_id: i32,
    pub description: String,
    pub sender: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub id: i32,
    pub full_name: String,
    pub salary: Money,
    pub department_id: i32,
    pub position: Position,
    pub weapon: Weapon,
    pub prisoners: Vec<OfficerPrisoner>,
}

/// Many-to-many link between an officer and a supervised prisoner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfficerPrisoner {
    pub officer_id: i32,
    pub prisoner_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Overseer,
    Guard,
    Watcher,
    Labour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    Knife,
    FlashPulse,
    ChainRifle,
    Pistol,
    Sniper,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Overseer,
        Position::Guard,
        Position::Watcher,
        Position::Labour,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Overseer => "Overseer",
            Position::Guard => "Guard",
            Position::Watcher => "Watcher",
            Position::Labour => "Labour",
        }
    }
}

impl Weapon {
    pub const ALL: [Weapon; 5] = [
        Weapon::Knife,
        Weapon::FlashPulse,
        Weapon::ChainRifle,
        Weapon::Pistol,
        Weapon::Sniper,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weapon::Knife => "Knife",
            Weapon::FlashPulse => "FlashPulse",
            Weapon::ChainRifle => "ChainRifle",
            Weapon::Pistol => "Pistol",
            Weapon::Sniper => "Sniper",
        }
    }
}

// Tokens are matched exactly; there is no fallback variant.
impl FromStr for Position {
    type Err = JailError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == token)
            .ok_or_else(|| JailError::UnknownToken {
                kind: "position".to_string(),
                token: token.to_string(),
            })
    }
}

impl FromStr for Weapon {
    type Err = JailError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Weapon::ALL
            .into_iter()
            .find(|w| w.as_str() == token)
            .ok_or_else(|| JailError::UnknownToken {
                kind: "weapon".to_string(),
                token: token.to_string(),
            })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
