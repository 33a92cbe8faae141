//! User and role models.
//!
//! The backend sends roles either as plain strings (`"ROLE_ADMIN"`) or as
//! objects (`{"id": 1, "name": "ROLE_ADMIN"}`). `Role` absorbs both shapes at
//! deserialization time so no caller has to sniff the representation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const ROLE_PREFIX: &str = "ROLE_";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Raw name as sent by the backend, e.g. `ROLE_ADMIN`.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Short lower-case form without the `ROLE_` prefix, e.g. `admin`.
    pub fn short_name(&self) -> String {
        self.0.replacen(ROLE_PREFIX, "", 1).to_lowercase()
    }

    pub fn matches(&self, wanted: &str) -> bool {
        self.0 == wanted
            || self.0 == format!("{ROLE_PREFIX}{}", wanted.to_uppercase())
            || self.0.to_lowercase() == wanted.to_lowercase()
    }

    pub fn is_admin(&self) -> bool {
        self.0 == "ROLE_ADMIN" || self.0 == "ADMIN" || self.0.to_lowercase() == "admin"
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRole {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
    Unknown(serde_json::Value),
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = match RawRole::deserialize(deserializer)? {
            RawRole::Name(name) => name,
            RawRole::Object { name } => name.unwrap_or_default(),
            RawRole::Unknown(_) => String::new(),
        };
        Ok(Role(name))
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "roles_or_empty")]
    pub roles: Vec<Role>,
}

fn roles_or_empty<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Role>>::deserialize(deserializer)?.unwrap_or_default())
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(&self.email)
    }
}

pub fn is_admin(user: &User) -> bool {
    user.roles.iter().any(Role::is_admin)
}

pub fn has_role(user: &User, role_name: &str) -> bool {
    user.roles.iter().any(|role| role.matches(role_name))
}

pub fn user_roles(user: &User) -> Vec<String> {
    user.roles.iter().map(Role::short_name).collect()
}

pub fn can_manage_professional_exercises(user: &User) -> bool {
    is_admin(user)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_accept_strings_and_objects() {
        let raw = r#"{
            "email": "a@b.fr",
            "roles": ["ROLE_USER", {"id": 2, "name": "ROLE_ADMIN"}, {"id": 3}, 42]
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();

        assert_eq!(user.roles.len(), 4);
        assert_eq!(user.roles[1].name(), "ROLE_ADMIN");
        assert_eq!(user.roles[2].name(), "");
        assert!(is_admin(&user));
        assert!(can_manage_professional_exercises(&user));
    }

    #[test]
    fn null_roles_are_empty() {
        let user: User = serde_json::from_str(r#"{"email":"x@y.z","roles":null}"#).unwrap();
        assert!(user.roles.is_empty());
        assert!(!is_admin(&user));
    }

    #[test]
    fn has_role_matches_prefixed_and_case_insensitive_forms() {
        let user = User {
            roles: vec![Role::new("ROLE_MODERATOR")],
            ..User::default()
        };
        assert!(has_role(&user, "moderator"));
        assert!(has_role(&user, "ROLE_MODERATOR"));
        assert!(!has_role(&user, "admin"));
    }

    #[test]
    fn user_roles_are_short_lowercase() {
        let user = User {
            roles: vec![Role::new("ROLE_ADMIN"), Role::new("User")],
            ..User::default()
        };
        assert_eq!(user_roles(&user), vec!["admin", "user"]);
    }

    #[test]
    fn roles_serialize_as_plain_strings() {
        let user = User {
            email: "a@b.fr".into(),
            roles: vec![Role::new("ROLE_ADMIN")],
            ..User::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["roles"][0], "ROLE_ADMIN");
    }
}
