use serde::{Deserialize, Serialize};
use std::fmt;

/// Login input. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// National ID ("cédula")
    pub cedula: String,
    pub password: String,
}

impl Credentials {
    pub fn new(cedula: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            cedula: cedula.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cedula", &self.cedula)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form fields
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub cedula: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("cedula", &self.cedula)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// The token triple held by the token store
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry in milliseconds since the Unix epoch
    pub expires_at: i64,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// User profile as returned by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "cedula")]
    pub national_id: String,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    #[serde(default, alias = "is_active")]
    pub is_active: bool,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<String>,
}

/// Accept ids sent either as JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_profile_accepts_camel_and_snake_case() {
        let camel: UserProfile = serde_json::from_value(json!({
            "id": "1",
            "cedula": "1234567890",
            "firstName": "Ana",
            "lastName": "Pérez",
            "isActive": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }))
        .unwrap();
        let snake: UserProfile = serde_json::from_value(json!({
            "id": "1",
            "cedula": "1234567890",
            "first_name": "Ana",
            "last_name": "Pérez",
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(camel, snake);
        assert_eq!(camel.national_id, "1234567890");
        assert_eq!(camel.full_name(), "Ana Pérez");
    }

    #[test]
    fn test_user_profile_numeric_id() {
        let user: UserProfile = serde_json::from_value(json!({
            "id": 42,
            "cedula": "1",
            "firstName": "A",
            "lastName": "B"
        }))
        .unwrap();
        assert_eq!(user.id, "42");
        assert!(!user.is_active);
        assert_eq!(user.created_at, None);
    }

    #[test]
    fn test_secrets_are_not_debug_printed() {
        let creds = Credentials::new("123", "Secret123");
        assert!(!format!("{creds:?}").contains("Secret123"));

        let tokens = SessionTokens {
            access_token: "access-abc".into(),
            refresh_token: "refresh-xyz".into(),
            expires_at: 0,
        };
        let printed = format!("{tokens:?}");
        assert!(!printed.contains("access-abc"));
        assert!(!printed.contains("refresh-xyz"));
    }
}
