//! Domain DTOs for the users API.
//!
//! # Design
//! These mirror the mock-server schema but are defined independently so the
//! screen core does not depend on axum. Integration tests catch drift.
//!
//! `birthday` stays a string on the wire: the backend stores whatever the
//! form sent. `parse_birthday` is the one place that interprets it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Gender as the backend spells it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Grid checkboxes only know "male or not".
    pub fn from_is_male(is_male: bool) -> Self {
        if is_male {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn is_male(self) -> bool {
        self == Gender::Male
    }
}

/// A single user record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub birthday: String,
    #[serde(default)]
    pub gender: Gender,
}

impl User {
    pub fn birthday_date(&self) -> Option<NaiveDate> {
        parse_birthday(&self.birthday)
    }
}

/// Request payload for creating a user. The server assigns the id and
/// defaults the gender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub birthday: String,
    pub address: String,
}

/// Parse a birthday in any of the shapes the backend is known to hold:
/// `2000-01-01`, a full ISO timestamp, or `1/1/2000` (month first).
pub fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

/// Canonical `YYYY-MM-DD` form of a birthday, or the input untouched when it
/// cannot be parsed.
pub fn normalize_birthday(raw: &str) -> String {
    match parse_birthday(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    }
}
