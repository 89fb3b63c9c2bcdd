//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Family,
    Elderly,
    Volunteer,
}

impl UserRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Family => "FAMILY",
            UserRole::Elderly => "ELDERLY",
            UserRole::Volunteer => "VOLUNTEER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FAMILY" => Ok(UserRole::Family),
            "ELDERLY" => Ok(UserRole::Elderly),
            "VOLUNTEER" => Ok(UserRole::Volunteer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// User profile (password hash is never part of the API model)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub language: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: i64,
}

/// Register payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub language: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login result: bearer token plus the authenticated profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}
