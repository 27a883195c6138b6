use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bigdecimal::BigDecimal;
use freight_rateio::{api, DailySequence, TripRegistry};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    api::router(api::AppState {
        registry: Arc::new(TripRegistry::new(Arc::new(DailySequence::new()))),
        scale: 6,
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn num(v: &Value) -> BigDecimal {
    match v {
        Value::String(s) => BigDecimal::from_str(s).unwrap(),
        other => BigDecimal::from_str(&other.to_string()).unwrap(),
    }
}

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn scenario_header() -> Value {
    json!({
        "freight_rate_per_ton": "150",
        "minimum_billable_weight": "1000",
        "tax_rate_percent": "12",
        "express_surcharge_percent": "10",
        "toll_flat": "20"
    })
}

#[tokio::test]
async fn health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn calculate_scenario() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/rateio/calculate",
        Some(json!({
            "header": scenario_header(),
            "invoices": [
                { "id": "A", "weight": "1000", "client": "Acme", "issue_date": "2024-03-05" },
                { "id": "B", "weight": "2000" }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(num(&data["totals"]["freight_by_weight"]), dec("450"));
    assert_eq!(num(&data["totals"]["express_total"]), dec("45"));
    assert_eq!(num(&data["totals"]["tax_total"]).round(2), dec("70.23"));

    let invoices = data["invoices"].as_array().unwrap();
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0]["id"], "A");
    assert_eq!(invoices[0]["client"], "Acme");
    assert_eq!(num(&invoices[0]["allocated_freight_by_weight"]), dec("150"));
    assert_eq!(num(&invoices[1]["allocated_freight_by_weight"]), dec("300"));
}

#[tokio::test]
async fn calculate_empty_set_returns_zeros() {
    let (status, body) = send_json(
        &app(),
        Method::POST,
        "/api/rateio/calculate",
        Some(json!({ "header": scenario_header(), "invoices": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(num(&body["data"]["totals"]["grand_total"]), dec("0"));
}

#[tokio::test]
async fn tax_rate_of_one_hundred_is_unprocessable() {
    let (status, body) = send_json(
        &app(),
        Method::POST,
        "/api/rateio/totals",
        Some(json!({
            "total_weight": "1000",
            "header": { "freight_rate_per_ton": "100", "tax_rate_percent": "100" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("tax_rate_percent"));
}

#[tokio::test]
async fn totals_gross_up() {
    let (status, body) = send_json(
        &app(),
        Method::POST,
        "/api/rateio/totals",
        Some(json!({
            "total_weight": "1000",
            "header": { "freight_rate_per_ton": "100", "tax_rate_percent": "20" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(num(&body["data"]["tax_total"]), dec("25"));
    assert_eq!(num(&body["data"]["grand_total"]), dec("125"));
}

#[tokio::test]
async fn batch_reports_each_trip() {
    let (status, body) = send_json(
        &app(),
        Method::POST,
        "/api/rateio/batch",
        Some(json!({
            "trips": [
                { "header": { "freight_rate_per_ton": "100" }, "invoices": [{ "id": "A", "weight": "1000" }] },
                { "header": { "freight_rate_per_ton": "100" }, "invoices": [{ "id": "B", "weight": "0" }] }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items[0]["success"], true);
    assert_eq!(num(&items[0]["allocation"]["totals"]["freight_by_weight"]), dec("100"));
    assert_eq!(items[1]["success"], false);
    assert!(items[1].get("allocation").is_none());
}

#[tokio::test]
async fn trip_session_lifecycle() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/trips",
        Some(json!({ "header": scenario_header(), "date": "2024-03-05" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let trip = body["data"]["trip_number"].as_str().unwrap().to_string();
    assert_eq!(trip, "20240305-0001");

    let (status, _) = send_json(
        &app,
        Method::POST,
        &format!("/api/trips/{}/invoices", trip),
        Some(json!({ "id": "A", "weight": "1000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/trips/{}/import", trip),
        Some(json!({ "invoices": [
            { "id": "A", "weight": "1000" },
            { "id": "B", "weight": "2000" }
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["imported"], 1);
    assert_eq!(
        num(&body["data"]["allocation"]["totals"]["freight_by_weight"]),
        dec("450")
    );

    // 重复发票
    let (status, _) = send_json(
        &app,
        Method::POST,
        &format!("/api/trips/{}/invoices", trip),
        Some(json!({ "id": "B", "weight": "5" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // 修改抬头 => 全量重算
    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/trips/{}/header", trip),
        Some(json!({ "freight_rate_per_ton": "300" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(num(&body["data"]["totals"]["freight_by_weight"]), dec("900"));

    let (status, bytes) = send(&app, Method::GET, &format!("/api/trips/{}/report.csv", trip), None).await;
    assert_eq!(status, StatusCode::OK);
    let csv_text = String::from_utf8(bytes).unwrap();
    assert!(csv_text.starts_with("invoice_id,"));
    assert_eq!(csv_text.lines().count(), 4);

    let (status, body) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/trips/{}/invoices/A", trip),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["invoices"].as_array().unwrap().len(), 1);

    let (status, body) = send_json(&app, Method::GET, &format!("/api/trips/{}", trip), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(num(&body["data"]["allocation"]["total_weight"]), dec("2000"));

    let (status, _) = send_json(&app, Method::DELETE, &format!("/api/trips/{}", trip), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&app, Method::GET, &format!("/api/trips/{}", trip), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invoice_named_import_can_be_removed() {
    let app = app();
    let (_, body) = send_json(
        &app,
        Method::POST,
        "/api/trips",
        Some(json!({ "header": scenario_header(), "date": "2024-03-05" })),
    )
    .await;
    let trip = body["data"]["trip_number"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &app,
        Method::POST,
        &format!("/api/trips/{}/invoices", trip),
        Some(json!({ "id": "import", "weight": "10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/trips/{}/invoices/import", trip),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["invoices"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn weight_beyond_supported_precision_is_unprocessable() {
    let (status, body) = send_json(
        &app(),
        Method::POST,
        "/api/rateio/calculate",
        Some(json!({
            "header": scenario_header(),
            "invoices": [
                { "id": "A", "weight": "1000" },
                { "id": "B", "weight": "1e-200000" }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("precision"));
}
