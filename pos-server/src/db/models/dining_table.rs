//! Dining table
//!
//! Tables open and close independently of any single order; orders hold a
//! reference, not ownership.

use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "reserved" => Ok(Self::Reserved),
            other => Err(AppError::validation(format!(
                "unknown table status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    /// Unique human-readable number ("T1", "12", ...)
    pub number: String,
    pub name: Option<String>,
    pub capacity: i64,
    pub status: TableStatus,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDiningTable {
    pub number: String,
    pub name: Option<String>,
    /// Seats; defaults to 4
    pub capacity: Option<i64>,
}
