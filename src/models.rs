//! Domain documents and their wire shapes.
//!
//! Everything here serializes to the JSON the frontend already speaks:
//! camelCase fields, ids under `_id`.

use serde::{Deserialize, Serialize};

/// Lifecycle of a friend request. Pending is the initial state, accepted is
/// terminal; there is no reject or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
}

/// A user profile document, stored as JSON under `user:{id}`.
///
/// The friend set is deliberately not embedded here; it lives in a Redis set
/// (`user:{id}:friends`) so acceptance can update both sides with atomic,
/// idempotent SADDs instead of rewriting two documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub profile_pic: String,
    pub native_language: String,
    pub learning_language: String,
    pub is_onboarded: bool,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
}

/// The subset of a profile shown in friend lists and request listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub profile_pic: String,
    pub native_language: String,
    pub learning_language: String,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            profile_pic: user.profile_pic.clone(),
            native_language: user.native_language.clone(),
            learning_language: user.learning_language.clone(),
        }
    }
}

/// A directed friend request document, stored as JSON under `request:{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub status: RequestStatus,
}

/// An incoming pending request with the sender's profile expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender: PublicProfile,
    pub recipient: String,
    pub status: RequestStatus,
}

/// An outgoing pending request with the recipient's profile expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender: String,
    pub recipient: PublicProfile,
    pub status: RequestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u1".into(),
            full_name: "Mia Tanaka".into(),
            profile_pic: "https://example.com/mia.png".into(),
            native_language: "japanese".into(),
            learning_language: "english".into(),
            is_onboarded: true,
            bio: "Hi!".into(),
            location: "Tokyo, Japan".into(),
        }
    }

    #[test]
    fn user_wire_format_matches_frontend() {
        let value = serde_json::to_value(sample_user()).unwrap();

        assert_eq!(value["_id"], "u1");
        assert_eq!(value["fullName"], "Mia Tanaka");
        assert_eq!(value["profilePic"], "https://example.com/mia.png");
        assert_eq!(value["nativeLanguage"], "japanese");
        assert_eq!(value["learningLanguage"], "english");
        assert_eq!(value["isOnboarded"], true);
        assert_eq!(value["location"], "Tokyo, Japan");
    }

    #[test]
    fn request_status_serializes_lowercase() {
        let request = FriendRequest {
            id: "r1".into(),
            sender: "u1".into(),
            recipient: "u2".into(),
            status: RequestStatus::Pending,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["status"], "pending");
        assert_eq!(value["_id"], "r1");

        let back: FriendRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back.status, RequestStatus::Pending);
    }

    #[test]
    fn user_deserializes_without_optional_fields() {
        let raw = r#"{
            "_id": "u2",
            "fullName": "Leo Costa",
            "profilePic": "",
            "nativeLanguage": "portuguese",
            "learningLanguage": "german",
            "isOnboarded": false
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();

        assert_eq!(user.bio, "");
        assert_eq!(user.location, "");
        assert!(!user.is_onboarded);
    }

    #[test]
    fn public_profile_projects_the_listing_fields() {
        let user = sample_user();
        let profile = PublicProfile::from(&user);
        let value = serde_json::to_value(profile).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert!(object.contains_key("_id"));
        assert!(object.contains_key("fullName"));
        assert!(object.contains_key("profilePic"));
        assert!(object.contains_key("nativeLanguage"));
        assert!(object.contains_key("learningLanguage"));
    }
}
