//! Request extractors.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::de::DeserializeOwned;

use advisorhub_core::ValidationErrors;

use crate::app::errors::ApiError;

/// A request body that converts itself into a validated command.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationErrors>;
}

/// JSON body of type `D`, already validated into `D::Output`.
///
/// A body that is empty or not declared as JSON reads as `{}`, so its fields
/// are reported as missing. Syntactically broken JSON is rejected with the
/// framework's status; field rule failures become 422 with every issue listed.
pub struct ValidatedJson<D: Validate>(pub D::Output);

#[axum::async_trait]
impl<S, D> FromRequest<S> for ValidatedJson<D>
where
    S: Send + Sync,
    D: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let declared_json = is_json(req.headers());
        let bytes = Bytes::from_request(req, state).await?;

        let body: &[u8] = if declared_json && !bytes.is_empty() {
            &bytes
        } else {
            b"{}"
        };
        let Json(body) = Json::<D>::from_bytes(body)?;
        Ok(Self(body.validate()?))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        return false;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn recognizes_json_media_types() {
        assert!(is_json(&with_content_type("application/json")));
        assert!(is_json(&with_content_type("application/json; charset=utf-8")));
        assert!(is_json(&with_content_type("application/merge-patch+json")));
    }

    #[test]
    fn other_media_types_are_not_json() {
        assert!(!is_json(&HeaderMap::new()));
        assert!(!is_json(&with_content_type("text/plain")));
        assert!(!is_json(&with_content_type("application/x-www-form-urlencoded")));
    }
}
