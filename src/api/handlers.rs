use crate::api::AppState;
use crate::error::RateioError;
use crate::export::allocation_to_csv;
use crate::models::{Allocation, HeaderParameters, InvoiceRecord, TripTotals};
use crate::service::{self, TripInput};
use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 统一响应体
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

/// 处理失败
#[derive(Debug)]
pub enum ApiError {
    Rateio(RateioError),
    Internal(String),
}

impl From<RateioError> for ApiError {
    fn from(e: RateioError) -> Self {
        Self::Rateio(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Rateio(e) => {
                let status = match &e {
                    RateioError::InvalidParameter(_)
                    | RateioError::EmptyInvoiceSet
                    | RateioError::InvalidWeight { .. }
                    | RateioError::DuplicateInvoice(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    RateioError::TripNotFound(_) | RateioError::InvoiceNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    RateioError::SequenceExhausted(_) | RateioError::Export(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, format!("Error: {}", e))
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", msg)),
        };

        // 服务端故障统一记录
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, message);
        }

        let body = ApiResponse::<()> {
            success: false,
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// 请求体: 行程重量 + 抬头参数
#[derive(Debug, Deserialize)]
pub struct TotalsRequest {
    pub total_weight: BigDecimal,
    #[serde(default)]
    pub header: HeaderParameters,
}

/// 请求体: 抬头参数 + 发票列表
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub header: HeaderParameters,
    #[serde(default)]
    pub invoices: Vec<InvoiceRecord>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub trips: Vec<TripInput>,
}

/// 批量结果中的单个行程
#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<Allocation>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    #[serde(default)]
    pub header: HeaderParameters,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub invoices: Vec<InvoiceRecord>,
}

/// 行程快照
#[derive(Debug, Serialize)]
pub struct TripView {
    pub trip_number: String,
    pub header: HeaderParameters,
    pub allocation: Allocation,
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub imported: usize,
    pub allocation: Allocation,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 行程汇总计算
pub async fn trip_totals(
    State(state): State<AppState>,
    Json(req): Json<TotalsRequest>,
) -> ApiResult<TripTotals> {
    let totals = service::compute_trip_totals(&req.total_weight, &req.header)?;
    Ok(ApiResponse::ok("Trip totals computed", totals.rounded(state.scale)))
}

/// 按重量分摊 (空发票集合返回全零结果)
pub async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> ApiResult<Allocation> {
    let allocation = service::allocate_or_empty(&req.invoices, &req.header)?;
    Ok(ApiResponse::ok(
        format!("Allocated {} invoices", allocation.invoices.len()),
        allocation.rounded(state.scale),
    ))
}

/// 批量分摊多个独立行程
pub async fn batch_calculate(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> ApiResult<Vec<BatchItem>> {
    let trips = req.trips;
    let total = trips.len();
    let results = tokio::task::spawn_blocking(move || service::allocate_all(&trips))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let items: Vec<BatchItem> = results
        .into_iter()
        .map(|r| match r {
            Ok(allocation) => BatchItem {
                success: true,
                message: format!("Allocated {} invoices", allocation.invoices.len()),
                allocation: Some(allocation.rounded(state.scale)),
            },
            Err(e) => BatchItem {
                success: false,
                message: format!("Error: {}", e),
                allocation: None,
            },
        })
        .collect();

    let failed = items.iter().filter(|i| !i.success).count();
    Ok(ApiResponse::ok(
        format!("Processed {} trips, {} failed", total, failed),
        items,
    ))
}

pub async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TripView>>), ApiError> {
    let date = req
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let session = state.registry.create(date, req.header)?;
    let view = TripView {
        trip_number: session.trip_number().to_string(),
        header: session.header().clone(),
        allocation: session.allocation().rounded(state.scale),
    };
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(format!("Trip {} created", view.trip_number), view),
    ))
}

pub async fn get_trip(
    State(state): State<AppState>,
    Path(trip): Path<String>,
) -> ApiResult<TripView> {
    let session = state.registry.get(&trip)?;
    let view = TripView {
        trip_number: trip,
        header: session.header().clone(),
        allocation: session.allocation().rounded(state.scale),
    };
    Ok(ApiResponse::ok(
        format!("{} invoices", session.invoice_count()),
        view,
    ))
}

pub async fn delete_trip(
    State(state): State<AppState>,
    Path(trip): Path<String>,
) -> ApiResult<()> {
    state.registry.remove(&trip)?;
    Ok(ApiResponse::ok(format!("Trip {} removed", trip), ()))
}

pub async fn update_header(
    State(state): State<AppState>,
    Path(trip): Path<String>,
    Json(header): Json<HeaderParameters>,
) -> ApiResult<Allocation> {
    let allocation = state.registry.update_header(&trip, header)?;
    Ok(ApiResponse::ok("Header updated", allocation.rounded(state.scale)))
}

pub async fn add_invoice(
    State(state): State<AppState>,
    Path(trip): Path<String>,
    Json(invoice): Json<InvoiceRecord>,
) -> ApiResult<Allocation> {
    let id = invoice.id.clone();
    let allocation = state.registry.add_invoice(&trip, invoice)?;
    Ok(ApiResponse::ok(
        format!("Invoice {} added", id),
        allocation.rounded(state.scale),
    ))
}

pub async fn import_invoices(
    State(state): State<AppState>,
    Path(trip): Path<String>,
    Json(req): Json<ImportRequest>,
) -> ApiResult<ImportResult> {
    let requested = req.invoices.len();
    let (imported, allocation) = state.registry.import_batch(&trip, req.invoices)?;
    Ok(ApiResponse::ok(
        format!("Imported {}/{} invoices", imported, requested),
        ImportResult {
            imported,
            allocation: allocation.rounded(state.scale),
        },
    ))
}

pub async fn remove_invoice(
    State(state): State<AppState>,
    Path((trip, invoice)): Path<(String, String)>,
) -> ApiResult<Allocation> {
    let allocation = state.registry.remove_invoice(&trip, &invoice)?;
    Ok(ApiResponse::ok(
        format!("Invoice {} removed", invoice),
        allocation.rounded(state.scale),
    ))
}

/// 导出分摊结果 CSV
pub async fn export_csv(
    State(state): State<AppState>,
    Path(trip): Path<String>,
) -> Result<Response, ApiError> {
    let session = state.registry.get(&trip)?;
    let body = allocation_to_csv(session.allocation(), state.scale)?;
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response())
}
