use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};

use advisorhub_advisors::AdvisorProfile;

use crate::app::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::app::errors::ApiError;
use crate::app::extract::ValidatedJson;
use crate::app::services::AppServices;
use crate::context::Authentication;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    ValidatedJson(cmd): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let registered = services.register(cmd).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ValidatedJson(cmd): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(services.login(cmd).await?))
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    auth: Authentication,
) -> Result<Json<AdvisorProfile>, ApiError> {
    let principal = auth.require()?;
    Ok(Json(services.profile(principal.principal()).await?))
}
