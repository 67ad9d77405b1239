use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use advisorhub_core::{AdvisorId, Entity, ValidationErrors, Validator, ValueObject};

pub const PASSWORD_MIN_CHARS: usize = 6;

/// Normalized (trimmed, lower-cased) email address.
///
/// Uniqueness is decided on this form, so `Test@Example.com` and
/// `test@example.com` are the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Build from an address that already passed the email rule.
    fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Rehydrate from storage, where the value was normalized on insert.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Email {}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext password as received from the client.
///
/// Never serialized and redacted in `Debug`, so it cannot reach logs or
/// responses. Hashing happens in the auth layer before anything is stored.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(String);

impl PlainPassword {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PlainPassword(***)")
    }
}

/// Stored advisor record.
///
/// Deliberately not `Serialize`: the password hash must never be written to a
/// response. Use [`Advisor::profile`] for the public view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisor {
    pub id: AdvisorId,
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Advisor {
    pub fn profile(&self) -> AdvisorProfile {
        AdvisorProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

impl Entity for Advisor {
    type Id = AdvisorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Public, serializable view of an advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorProfile {
    pub id: AdvisorId,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Advisor ready to insert: the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdvisor {
    pub email: Email,
    pub name: String,
    pub password_hash: String,
}

/// Command: register a new advisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAdvisor {
    pub email: Email,
    pub password: PlainPassword,
    pub name: String,
}

impl RegisterAdvisor {
    pub fn parse(
        email: Option<Value>,
        password: Option<Value>,
        name: Option<Value>,
    ) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let email = check_email(&mut v, email);
        let password = check_password(&mut v, password);
        let name = v.string("name", name).and_then(|n| v.not_blank("name", n));

        let cmd = match (email, password, name) {
            (Some(email), Some(password), Some(name)) => Some(Self {
                email,
                password,
                name: name.trim().to_string(),
            }),
            _ => None,
        };
        v.finish(cmd)
    }

    pub fn with_hash(self, password_hash: String) -> NewAdvisor {
        NewAdvisor {
            email: self.email,
            name: self.name,
            password_hash,
        }
    }
}

/// Command: exchange credentials for a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAdvisor {
    pub email: Email,
    pub password: PlainPassword,
}

impl LoginAdvisor {
    pub fn parse(email: Option<Value>, password: Option<Value>) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let email = check_email(&mut v, email);
        let password = check_password(&mut v, password);
        v.finish(email.zip(password).map(|(email, password)| Self { email, password }))
    }
}

fn check_email(v: &mut Validator, raw: Option<Value>) -> Option<Email> {
    v.string("email", raw)
        .and_then(|e| v.email("email", e))
        .map(|e| Email::normalized(&e))
}

fn check_password(v: &mut Validator, raw: Option<Value>) -> Option<PlainPassword> {
    v.string("password", raw)
        .and_then(|p| v.min_chars("password", p, PASSWORD_MIN_CHARS))
        .map(PlainPassword)
}
