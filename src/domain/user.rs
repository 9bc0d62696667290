use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) display_name: String,
    pub(crate) password_hash: String,
    pub(crate) image: Option<String>,
    #[allow(dead_code)]
    pub(crate) created_at: Option<OffsetDateTime>,
}

/// Profile mutation as submitted by the client. The display name is
/// mandatory; the image, when present, is a base64-encoded file.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub image: Option<String>,
}

const NAME_SIZE_MESSAGE: &str = "It must have minimum 4 and maximum 255 characters";
const PASSWORD_SIZE_MESSAGE: &str = "It must have minimum 8 and maximum 255 characters";
const PASSWORD_PATTERN_MESSAGE: &str =
    "Password must have at least one uppercase, one lowercase letter and one number";

/// Checks a registration payload field by field and returns a map of
/// field name to message, empty when the payload is acceptable.
#[must_use]
pub fn validate_registration(
    username: Option<&str>,
    display_name: Option<&str>,
    password: Option<&str>,
) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    check_name("username", "Username cannot be null", username, &mut errors);
    check_name("displayName", "Display name cannot be null", display_name, &mut errors);

    match password {
        None => {
            errors.insert("password".to_string(), "Password cannot be null".to_string());
        }
        Some(p) => {
            let len = p.chars().count();
            if !(8..=255).contains(&len) {
                errors.insert("password".to_string(), PASSWORD_SIZE_MESSAGE.to_string());
            } else if !has_required_character_classes(p) {
                errors.insert("password".to_string(), PASSWORD_PATTERN_MESSAGE.to_string());
            }
        }
    }

    errors
}

/// Validation for the update flow, where only the display name is
/// constrained.
#[must_use]
pub fn validate_display_name(display_name: Option<&str>) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    check_name("displayName", "Display name cannot be null", display_name, &mut errors);
    errors
}

fn check_name(
    field: &str,
    null_message: &str,
    value: Option<&str>,
    errors: &mut BTreeMap<String, String>,
) {
    match value {
        None => {
            errors.insert(field.to_string(), null_message.to_string());
        }
        Some(v) => {
            let len = v.chars().count();
            if !(4..=255).contains(&len) {
                errors.insert(field.to_string(), NAME_SIZE_MESSAGE.to_string());
            }
        }
    }
}

fn has_required_character_classes(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}
