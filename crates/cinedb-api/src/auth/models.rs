//! Database models for authentication and profiles
//!
//! - `User`: credential and profile record, keyed by email
//! - Profile views: what the API returns, depending on who is asking

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// User account row
///
/// Created on registration; mutated only via profile update; never
/// deleted. The password hash is an Argon2id PHC string and is never
/// serialized in API responses.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile as seen by anyone
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicProfile {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

/// Profile as seen by its owner, including the private fields
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OwnerProfile {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    /// Date of birth formatted as YYYY-MM-DD
    pub dob: Option<String>,
    pub address: Option<String>,
}

/// Profile response, shaped by whether the caller owns it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ProfileView {
    Owner(OwnerProfile),
    Public(PublicProfile),
}

impl ProfileView {
    /// Build the view of `user` appropriate for `viewer`.
    ///
    /// The private fields (dob, address) are present - possibly null -
    /// only when the verified identity matches the profile's email.
    pub fn for_viewer(user: &User, viewer: Option<&str>) -> Self {
        if viewer == Some(user.email.as_str()) {
            ProfileView::Owner(OwnerProfile {
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                dob: user.dob.map(|d| d.format("%Y-%m-%d").to_string()),
                address: user.address.clone(),
            })
        } else {
            ProfileView::Public(PublicProfile {
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            email: "a@b.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            dob: NaiveDate::from_ymd_opt(1815, 12, 10),
            address: Some("London".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_sees_private_fields() {
        let view = ProfileView::for_viewer(&user(), Some("a@b.com"));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["dob"], "1815-12-10");
        assert_eq!(json["address"], "London");
    }

    #[test]
    fn test_public_view_omits_private_fields() {
        for viewer in [None, Some("other@b.com")] {
            let view = ProfileView::for_viewer(&user(), viewer);
            let json = serde_json::to_value(&view).unwrap();

            assert_eq!(json["email"], "a@b.com");
            assert_eq!(json["lastName"], "Lovelace");
            assert!(json.get("dob").is_none());
            assert!(json.get("address").is_none());
        }
    }
}
