use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use advisorhub_advisors::{LoginAdvisor, RegisterAdvisor};
use advisorhub_core::ValidationErrors;
use advisorhub_products::ProductDraft;

use crate::app::extract::Validate;

// -------------------------
// Request DTOs
// -------------------------

// Fields stay untyped JSON so a missing key or a wrong type is reported as a
// field issue, alongside the other fields' issues.

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing key is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
}

impl Validate for RegisterRequest {
    type Output = RegisterAdvisor;

    fn validate(self) -> Result<RegisterAdvisor, ValidationErrors> {
        RegisterAdvisor::parse(self.email, self.password, self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Value>,
}

impl Validate for LoginRequest {
    type Output = LoginAdvisor;

    fn validate(self) -> Result<LoginAdvisor, ValidationErrors> {
        LoginAdvisor::parse(self.email, self.password)
    }
}

/// Body of product create and update.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
}

impl Validate for ProductRequest {
    type Output = ProductDraft;

    fn validate(self) -> Result<ProductDraft, ValidationErrors> {
        ProductDraft::parse(self.name, self.description, self.price)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub name: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}
