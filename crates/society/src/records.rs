use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::structures::Keyed;

/// A resident, identified by the flat they occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentRecord {
    #[serde(alias = "flat")]
    pub flat_number: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub pending_bills: i64,
}

impl Keyed for ResidentRecord {
    fn key(&self) -> &str {
        &self.flat_number
    }
}

/// A charge raised against a flat. Undoing it reverses the same amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    pub flat: String,
    pub amount: i64,
    #[serde(alias = "desc")]
    pub description: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorRecord {
    pub name: String,
    pub flat: String,
    pub purpose: String,
    pub time: NaiveTime,
}

/// Lower `priority` values are more urgent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub title: String,
    pub flat: String,
    pub priority: i64,
    #[serde(alias = "desc")]
    pub description: String,
    pub time: NaiveTime,
}
