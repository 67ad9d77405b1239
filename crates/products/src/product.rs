use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use advisorhub_auth::Owned;
use advisorhub_core::{
    AdvisorId, DomainError, DomainResult, Entity, ProductId, ValidationErrors, Validator, ValueObject,
};

/// Strictly positive, finite price.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> DomainResult<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(DomainError::invariant(format!("price must be positive, got {value}")))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl ValueObject for Price {}

/// Product owned by exactly one advisor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub advisor_id: AdvisorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Materialize a new product (used by stores that assign ids themselves).
    pub fn create(new: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::new(),
            name: new.draft.name,
            description: new.draft.description,
            price: new.draft.price,
            advisor_id: new.advisor_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields; identity, owner and `created_at` are kept.
    pub fn revise(&mut self, draft: ProductDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.updated_at = now;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Owned for Product {
    fn owner(&self) -> AdvisorId {
        self.advisor_id
    }
}

/// Validated editable fields of a product (create and full update).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
}

impl ProductDraft {
    pub fn parse(
        name: Option<Value>,
        description: Option<Value>,
        price: Option<Value>,
    ) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let name = v.string("name", name).and_then(|n| v.not_blank("name", n));
        let description = v.optional_string("description", description);
        let price = v
            .number("price", price)
            .and_then(|p| v.positive("price", p))
            .and_then(|p| Price::new(p).ok());

        let draft = match (name, description, price) {
            (Some(name), Some(description), Some(price)) => Some(Self {
                name: name.trim().to_string(),
                description,
                price,
            }),
            _ => None,
        };
        v.finish(draft)
    }

    pub fn owned_by(self, advisor_id: AdvisorId) -> NewProduct {
        NewProduct {
            advisor_id,
            draft: self,
        }
    }
}

/// Product ready to insert for its owning advisor.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub advisor_id: AdvisorId,
    pub draft: ProductDraft,
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn draft(name: &str, price: f64) -> ProductDraft {
        ProductDraft::parse(Some(json!(name)), None, Some(json!(price))).unwrap()
    }

    #[test]
    fn zero_price_is_rejected_with_field_message() {
        let err = ProductDraft::parse(
            Some(json!("Test Product")),
            Some(json!("Invalid product")),
            Some(json!(0)),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Number must be greater than 0 at \"price\"");
    }

    #[test]
    fn description_is_optional() {
        let d = draft("Test Product", 100.0);
        assert_eq!(d.description, None);
        assert_eq!(d.price.value(), 100.0);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = ProductDraft::parse(None, None, None).unwrap_err();
        assert_eq!(err.to_string(), "Required at \"name\"; Required at \"price\"");
    }

    #[test]
    fn null_description_and_string_price_are_type_errors() {
        let err = ProductDraft::parse(
            Some(json!("Widget")),
            Some(Value::Null),
            Some(json!("9.99")),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected string, received null at \"description\"; \
             Expected number, received string at \"price\""
        );
    }

    #[test]
    fn integer_prices_are_numbers() {
        let d = ProductDraft::parse(Some(json!("Widget")), None, Some(json!(3))).unwrap();
        assert_eq!(d.price.value(), 3.0);
    }

    #[test]
    fn create_assigns_owner_and_timestamps() {
        let owner = AdvisorId::new();
        let now = Utc::now();
        let product = Product::create(draft("Widget", 9.5).owned_by(owner), now);

        assert_eq!(product.owner(), owner);
        assert_eq!(product.created_at, now);
        assert_eq!(product.updated_at, now);
    }

    #[test]
    fn revise_keeps_identity_and_owner() {
        let owner = AdvisorId::new();
        let created = Utc::now();
        let mut product = Product::create(draft("Widget", 9.5).owned_by(owner), created);
        let id = product.id;

        let later = created + chrono::Duration::seconds(5);
        product.revise(draft("Gadget", 12.0), later);

        assert_eq!(product.id, id);
        assert_eq!(product.advisor_id, owner);
        assert_eq!(product.name, "Gadget");
        assert_eq!(product.created_at, created);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let owner = AdvisorId::new();
        let product = Product::create(draft("Widget", 9.5).owned_by(owner), Utc::now());
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["advisorId"], owner.to_string());
        assert_eq!(json["price"], 9.5);
        assert!(json["description"].is_null());
        assert!(json.get("createdAt").is_some());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every positive finite value is a valid price.
            #[test]
            fn positive_values_are_prices(value in 1e-9f64..1e12f64) {
                prop_assert_eq!(Price::new(value).unwrap().value(), value);
            }

            /// Property: zero and negatives never are.
            #[test]
            fn non_positive_values_are_rejected(value in -1e12f64..=0.0f64) {
                prop_assert!(Price::new(value).is_err());
            }
        }
    }
}
