//! Pay order template handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::extractors::DtoJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CreatePayOrderTemplateDto, PayOrderTemplate, UpdatePayOrderTemplateDto};
use crate::errors::AppResult;
use crate::types::Created;

/// Create template request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayOrderTemplateRequest {
    #[schema(example = "Office rent")]
    pub name_entry: String,
    pub name_for: Option<String>,
    pub nit_for: Option<String>,
    /// Stored encrypted
    pub dni: Option<String>,
    pub role: Option<String>,
    /// Stored encrypted
    pub bank: Option<String>,
    /// Stored encrypted
    pub account_number: Option<String>,
}

/// Full template update; absent optional fields are cleared
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayOrderTemplateRequest {
    pub id: String,
    pub name_entry: String,
    pub name_for: Option<String>,
    pub nit_for: Option<String>,
    pub dni: Option<String>,
    pub role: Option<String>,
    pub bank: Option<String>,
    pub account_number: Option<String>,
}

/// Create pay order template routes (all protected)
pub fn pay_order_template_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_templates).post(create_template).put(update_template),
        )
        .route("/:id", get(get_template).delete(delete_template))
}

/// List active templates
#[utoipa::path(
    get,
    path = "/api/pay-order-templates",
    tag = "Pay order templates",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active templates, decrypted", body = Vec<PayOrderTemplate>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_templates(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PayOrderTemplate>>> {
    let templates = state.pay_order_template_service.get_all().await?;
    Ok(Json(templates))
}

/// Get a template by id
#[utoipa::path(
    get,
    path = "/api/pay-order-templates/{id}",
    tag = "Pay order templates",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Template, decrypted", body = PayOrderTemplate),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PayOrderTemplate>> {
    let template = state.pay_order_template_service.get_by_id(&id).await?;
    Ok(Json(template))
}

/// Create a template
#[utoipa::path(
    post,
    path = "/api/pay-order-templates",
    tag = "Pay order templates",
    security(("bearer_auth" = [])),
    request_body = CreatePayOrderTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = PayOrderTemplate),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_template(
    State(state): State<AppState>,
    DtoJson(dto): DtoJson<CreatePayOrderTemplateDto>,
) -> AppResult<Created<PayOrderTemplate>> {
    let template = state.pay_order_template_service.create(dto).await?;
    Ok(Created(template))
}

/// Replace a template's fields; the id travels in the body
#[utoipa::path(
    put,
    path = "/api/pay-order-templates",
    tag = "Pay order templates",
    security(("bearer_auth" = [])),
    request_body = UpdatePayOrderTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = PayOrderTemplate),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn update_template(
    State(state): State<AppState>,
    DtoJson(dto): DtoJson<UpdatePayOrderTemplateDto>,
) -> AppResult<Json<PayOrderTemplate>> {
    let template = state.pay_order_template_service.update(dto).await?;
    Ok(Json(template))
}

/// Soft-delete a template
#[utoipa::path(
    delete,
    path = "/api/pay-order-templates/{id}",
    tag = "Pay order templates",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Template deleted", body = PayOrderTemplate),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn delete_template(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PayOrderTemplate>> {
    let template = state.pay_order_template_service.delete_by_id(&id).await?;
    tracing::info!(deleted_by = %current_user.auth_id, template_id = %id, "Pay order template deleted");
    Ok(Json(template))
}
