//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account category; fixed at signup and gating every role-specific page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "farmer" => Some(Role::Farmer),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Landing page after login, per role
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Farmer => "/farmer/dashboard",
            Role::User => "/user/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub village: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Produce record; written once after a successful analysis, never updated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub farmer_id: i64,
    pub image_path: String,
    pub category: String,
    pub name: String,
    pub pick_time: String,
    pub temperature: String,
    pub expiry_prediction: String,
    pub description: String,
    pub tips: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub farmer_id: i64,
    pub video_path: String,
    pub thumbnail_path: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub expiry_date: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only; `user_name` is captured at write time so later profile
/// changes do not rewrite old comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub video_id: i64,
    pub text: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}
