//! Quotation API routes.
//!
//! JSON endpoints:
//! - `GET  /api/v1/catalog`                      — list catalog items
//! - `POST /api/v1/quotations/preview`           — price a cart without saving
//! - `POST /api/v1/quotations`                   — build and persist a draft
//! - `GET  /api/v1/quotations`                   — list saved quotations
//! - `GET  /api/v1/quotations/{id}`              — fetch one quotation
//! - `POST /api/v1/quotations/{id}/send`         — email the customer, record Draft→Sent
//!
//! HTML endpoint:
//! - `GET  /quotations/{id}/document`            — printable quotation

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tera::Tera;
use tracing::{error, info};
use uuid::Uuid;

use aluquote_core::domain::catalog::{Catalog, CatalogItem};
use aluquote_core::domain::customer::CustomerDetails;
use aluquote_core::domain::quotation::{LineItem, QuotationDocument, QuotationId};
use aluquote_core::domain::series::{AreaRateTable, SeriesTier};
use aluquote_core::errors::{ApplicationError, DomainError};
use aluquote_core::pricing::cart::{AddItemRequest, QuotationCart};
use aluquote_core::pricing::summary::{summarize, CostSummary};
use aluquote_db::{CatalogRepository, QuotationRepository, RepositoryError};

use crate::email::{MailerError, QuotationMailer};
use crate::render::{render_document, RenderError};

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub quotations: Arc<dyn QuotationRepository>,
    pub rates: Arc<AreaRateTable>,
    pub mailer: Arc<dyn QuotationMailer>,
    pub templates: Arc<Tera>,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// A cart as submitted by the builder UI. Items are applied in order, under
/// the requested series tier and percentage knobs.
#[derive(Debug, Deserialize)]
pub struct CartPayload {
    pub series_tier: Option<SeriesTier>,
    pub wastage_percent: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub tax_percent: Option<Decimal>,
    pub items: Vec<AddItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuotationRequest {
    pub customer: CustomerDetails,
    pub notes: Option<String>,
    pub cart: CartPayload,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub items: Vec<LineItem>,
    pub summary: CostSummary,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("quotation `{0}` not found")]
    QuotationNotFound(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Mailer(#[from] MailerError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Domain(DomainError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Domain(DomainError::CatalogItemNotFound(_)) | Self::QuotationNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Domain(DomainError::InvalidStatusTransition { .. }) => StatusCode::CONFLICT,
            Self::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Mailer(_) => StatusCode::BAD_GATEWAY,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(event_name = "api.request.failed", error = %self, "request failed");
        }

        // Domain failures are safe to echo; collaborator failures go out as
        // the opaque user-facing message only.
        let error = match self {
            Self::Domain(error) => error.to_string(),
            Self::QuotationNotFound(id) => format!("quotation `{id}` not found"),
            Self::Repository(error) => {
                ApplicationError::Persistence(error.to_string()).user_message().to_string()
            }
            Self::Mailer(error) => {
                ApplicationError::Integration(error.to_string()).user_message().to_string()
            }
            Self::Render(error) => {
                ApplicationError::Configuration(error.to_string()).user_message().to_string()
            }
        };
        (status, Json(ApiErrorBody { error })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/catalog", get(list_catalog))
        .route("/api/v1/quotations/preview", post(preview_quotation))
        .route("/api/v1/quotations", post(create_quotation).get(list_quotations))
        .route("/api/v1/quotations/{id}", get(get_quotation))
        .route("/api/v1/quotations/{id}/send", post(send_quotation))
        .route("/quotations/{id}/document", get(document_html))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_catalog(State(state): State<ApiState>) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    Ok(Json(state.catalog.list().await?))
}

async fn preview_quotation(
    State(state): State<ApiState>,
    Json(payload): Json<CartPayload>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let cart = build_cart(&state, payload).await?;
    Ok(Json(PreviewResponse { items: cart.items().to_vec(), summary: summarize(&cart) }))
}

async fn create_quotation(
    State(state): State<ApiState>,
    Json(request): Json<CreateQuotationRequest>,
) -> Result<(StatusCode, Json<QuotationDocument>), ApiError> {
    let cart = build_cart(&state, request.cart).await?;
    let document = QuotationDocument::from_cart(&cart, request.customer, request.notes)?;

    state.quotations.save(document.clone()).await?;
    info!(
        event_name = "api.quotation.created",
        quotation_id = %document.id.0,
        total = %document.total,
        "quotation saved as draft"
    );
    Ok((StatusCode::CREATED, Json(document)))
}

async fn list_quotations(
    State(state): State<ApiState>,
) -> Result<Json<Vec<QuotationDocument>>, ApiError> {
    Ok(Json(state.quotations.list().await?))
}

async fn get_quotation(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuotationDocument>, ApiError> {
    let document = load_document(&state, id).await?;
    Ok(Json(document))
}

async fn send_quotation(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuotationDocument>, ApiError> {
    let mut document = load_document(&state, id).await?;
    document.mark_sent()?;

    // Single attempt; a dispatch failure leaves the stored document in
    // Draft so the action can be retried by the user.
    state.mailer.send_quotation(&document, &document.customer.email).await?;
    state.quotations.save(document.clone()).await?;

    info!(
        event_name = "api.quotation.sent",
        quotation_id = %document.id.0,
        recipient = %document.customer.email,
        "quotation emailed to customer"
    );
    Ok(Json(document))
}

async fn document_html(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let document = load_document(&state, id).await?;
    Ok(Html(render_document(&state.templates, &document)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_document(state: &ApiState, id: Uuid) -> Result<QuotationDocument, ApiError> {
    state
        .quotations
        .find_by_id(&QuotationId(id))
        .await?
        .ok_or_else(|| ApiError::QuotationNotFound(id.to_string()))
}

/// Replays the submitted cart through the pricing engine: tier and knobs
/// first, then each add in order, against a catalog snapshot.
async fn build_cart(state: &ApiState, payload: CartPayload) -> Result<QuotationCart, ApiError> {
    let catalog = Catalog::new(state.catalog.list().await?);

    let mut cart = QuotationCart::new();
    if let Some(tier) = payload.series_tier {
        cart.set_series_tier(&state.rates, tier)?;
    }
    if let Some(percent) = payload.wastage_percent {
        cart.set_wastage_percent(percent)?;
    }
    if let Some(percent) = payload.discount_percent {
        cart.set_discount_percent(percent)?;
    }
    if let Some(percent) = payload.tax_percent {
        cart.set_tax_percent(percent)?;
    }
    for request in payload.items {
        cart.add_item(&catalog, &state.rates, request)?;
    }
    Ok(cart)
}
