//! Wire types returned by the race server.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type TrackId = u32;
pub type RacerId = u32;
pub type RaceId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    #[serde(default)]
    pub segments: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Racer {
    pub id: RacerId,
    pub driver_name: String,
    #[serde(default)]
    pub top_speed: f64,
    #[serde(default)]
    pub acceleration: f64,
    #[serde(default)]
    pub handling: f64,
}

/// Body of `POST /api/races`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreateRace {
    pub player_id: RacerId,
    pub track_id: TrackId,
}

/// Response of `POST /api/races`. The server capitalises these fields,
/// the lower-case spellings are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedRace {
    #[serde(rename = "ID", alias = "id")]
    pub id: RaceId,
    #[serde(rename = "Track", alias = "track")]
    pub track: Track,
    #[serde(default, rename = "PlayerID", alias = "player_id")]
    pub player_id: Option<RacerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceStatus {
    Pending,
    InProgress,
    Finished,
    /// Anything else the server sends, kept verbatim for error reporting
    Unknown(String),
}

impl From<String> for RaceStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "unstarted" | "pending" => RaceStatus::Pending,
            "in-progress" => RaceStatus::InProgress,
            "finished" => RaceStatus::Finished,
            _ => RaceStatus::Unknown(raw),
        }
    }
}

impl fmt::Display for RaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceStatus::Pending => write!(f, "pending"),
            RaceStatus::InProgress => write!(f, "in-progress"),
            RaceStatus::Finished => write!(f, "finished"),
            RaceStatus::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

impl<'de> Deserialize<'de> for RaceStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RaceStatus::from)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RacerPosition {
    pub id: RacerId,
    pub driver_name: String,
    #[serde(default)]
    pub segment: usize,
    #[serde(default)]
    pub final_position: Option<u32>,
}

/// Latest state of a race as seen by `GET /api/races/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RaceSnapshot {
    pub status: RaceStatus,
    #[serde(default)]
    pub positions: Vec<RacerPosition>,
}
