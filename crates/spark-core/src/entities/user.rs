//! User entity - a profile that can react and be reacted to

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::{GeoPoint, Snowflake};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(format!("unknown sex: {other}")),
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Snowflake,
    pub email: String,
    pub name: String,
    pub birthday: NaiveDate,
    pub sex: Sex,
    pub location: GeoPoint,
    pub description: String,
    /// File name of the avatar inside the upload directory
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub location: Option<GeoPoint>,
    pub description: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.birthday.is_none()
            && self.sex.is_none()
            && self.location.is_none()
            && self.description.is_none()
    }
}

impl User {
    pub fn new(
        id: Snowflake,
        email: String,
        name: String,
        birthday: NaiveDate,
        sex: Sex,
        location: GeoPoint,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            name,
            birthday,
            sex,
            location,
            description: String::new(),
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full years lived as of `today`
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let mut years = today.year() - self.birthday.year();
        if (today.month(), today.day()) < (self.birthday.month(), self.birthday.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }

    pub fn age(&self) -> u32 {
        self.age_on(Utc::now().date_naive())
    }

    pub fn distance_km(&self, other: &User) -> f64 {
        self.location.distance_km(&other.location)
    }

    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(birthday) = patch.birthday {
            self.birthday = birthday;
        }
        if let Some(sex) = patch.sex {
            self.sex = sex;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }

    /// Replace the avatar, returning the previous one
    pub fn replace_avatar(&mut self, avatar: String) -> Option<String> {
        self.updated_at = Utc::now();
        self.avatar.replace(avatar)
    }
}
