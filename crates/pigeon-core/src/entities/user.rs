//! User entity - represents a registered user

use serde::{Deserialize, Serialize};

use crate::entities::Participant;
use crate::value_objects::UserId;

/// User entity
///
/// Users are created at login time and are never deleted. The display name
/// is unique across the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl User {
    /// Minimum display-name length, in characters
    pub const NAME_MIN: usize = 3;
    /// Maximum display-name length, in characters
    pub const NAME_MAX: usize = 16;

    /// Create a new User
    pub fn new(id: UserId, name: String) -> Self {
        Self {
            id,
            name,
            photo: None,
        }
    }

    /// Check whether a display name satisfies the length rule
    pub fn name_is_valid(name: &str) -> bool {
        let len = name.chars().count();
        (Self::NAME_MIN..=Self::NAME_MAX).contains(&len)
    }

    /// Update the display name
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Update the photo reference
    pub fn set_photo(&mut self, photo: Option<String>) {
        self.photo = photo;
    }

    /// Denormalized display snapshot of this user for conversation membership
    pub fn snapshot(&self) -> Participant {
        Participant {
            user_id: self.id,
            name: self.name.clone(),
            photo: self.photo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_rule() {
        assert!(!User::name_is_valid("al"));
        assert!(User::name_is_valid("ali"));
        assert!(User::name_is_valid("a".repeat(16).as_str()));
        assert!(!User::name_is_valid("a".repeat(17).as_str()));
    }

    #[test]
    fn test_name_length_counts_chars_not_bytes() {
        // three characters, nine bytes
        assert!(User::name_is_valid("你好吗"));
    }

    #[test]
    fn test_snapshot_copies_display_fields() {
        let mut user = User::new(UserId::generate(), "alice".to_string());
        user.set_photo(Some("blobs/a.png".to_string()));

        let snapshot = user.snapshot();
        assert_eq!(snapshot.user_id, user.id);
        assert_eq!(snapshot.name, "alice");
        assert_eq!(snapshot.photo.as_deref(), Some("blobs/a.png"));
    }
}
