use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use colis_api::{app, AppState};
use colis_carrier::BaridTunables;
use colis_core::ProviderRegistry;
use colis_store::CarrierSettings;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

fn test_app() -> Router {
    let mut registry = ProviderRegistry::new();
    colis_carrier::register(&mut registry, BaridTunables::default());
    app(AppState::new(registry, CarrierSettings::default()))
}

async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn request_text(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

#[tokio::test]
async fn test_order_to_export_flow() {
    let app = test_app();
    let partner_id = Uuid::new_v4();

    // Carrier configuration
    let (status, carrier) = request_json(
        &app,
        "POST",
        "/carriers",
        Some(json!({"name": "Barid Al-Maghrib", "provider": "barid"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let carrier_id = carrier["id"].as_str().unwrap().to_string();

    // Sale order carrying the shipping details
    let (status, order) = request_json(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "name": "SO0001",
            "partner_id": partner_id,
            "shipping": {
                "carrier_id": carrier_id,
                "payment_method": "cash",
                "transport_nature": "standard",
                "package_count": 3
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = order["id"].as_str().unwrap().to_string();

    // Outgoing delivery inherits the order's shipping details
    let (status, delivery) = request_json(
        &app,
        "POST",
        "/deliveries",
        Some(json!({
            "name": "WH/OUT/0001",
            "kind": "outgoing",
            "sale_order_id": order_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let delivery_id = delivery["id"].as_str().unwrap().to_string();

    let (status, invoice) = request_json(
        &app,
        "POST",
        "/invoices",
        Some(json!({"name": "INV/0001", "order_id": order_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let invoice_id = invoice["id"].as_str().unwrap().to_string();

    // Writing shipping fields on the delivery propagates along the chain
    let (status, outcome) = request_json(
        &app,
        "PATCH",
        &format!("/deliveries/{delivery_id}/shipping"),
        Some(json!({"transport_nature": "express", "payment_method": "cheque"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["order_updated"].as_str().unwrap(), order_id);
    assert_eq!(outcome["invoice_ids"][0].as_str().unwrap(), invoice_id);

    let (status, order) = request_json(&app, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["shipping"]["transport_nature"], "express");

    let (status, invoice) =
        request_json(&app, "GET", &format!("/invoices/{invoice_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice["payment_method"], "cheque");

    // Shipment created from the delivery, three packages declared
    let (status, shipment) = request_json(
        &app,
        "POST",
        "/shipments",
        Some(json!({
            "delivery_id": delivery_id,
            "partner": {
                "id": partner_id,
                "name": "Amine El Fassi",
                "street": "12 Rue des Orangers",
                "zip": "20000",
                "city": "Casablanca",
                "mobile": "0661000000"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let shipment_id = shipment["id"].as_str().unwrap().to_string();

    let (status, packages) = request_json(
        &app,
        "POST",
        &format!("/shipments/{shipment_id}/generate-barcodes"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let packages = packages.as_array().unwrap();
    assert_eq!(packages.len(), 3);
    assert_eq!(packages[0]["gab"], "LI000000001MA");
    assert_eq!(packages[2]["gab"], "LI000000003MA");

    // Regeneration without clearing is refused
    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/shipments/{shipment_id}/generate-barcodes"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/shipments/{shipment_id}/confirm"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // One CSV row per package
    let (status, csv) = request_text(
        &app,
        "POST",
        "/shipments/export",
        json!({"shipment_ids": [shipment_id]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(csv.starts_with("GAB,ETOILE,CAB1"));
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains("LI000000002MA"));
    assert!(csv.contains("=CONCATENATE(B3,A3,B3)"));
}

#[tokio::test]
async fn test_unregistered_provider_is_fatal_to_the_action() {
    let app = test_app();

    let (status, carrier) = request_json(
        &app,
        "POST",
        "/carriers",
        Some(json!({"name": "Autre Transporteur", "provider": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let carrier_id = carrier["id"].as_str().unwrap().to_string();

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/carriers/{carrier_id}/test-connection"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("other"));
}

#[tokio::test]
async fn test_shipment_requires_a_carrier_on_the_delivery() {
    let app = test_app();

    let (_, delivery) = request_json(
        &app,
        "POST",
        "/deliveries",
        Some(json!({"name": "WH/OUT/0009", "kind": "outgoing"})),
    )
    .await;
    let delivery_id = delivery["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(
        &app,
        "POST",
        "/shipments",
        Some(json!({
            "delivery_id": delivery_id,
            "partner": {"id": Uuid::new_v4(), "name": "Client Sans Transporteur"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_presale_and_schedule_flow() {
    let app = test_app();
    let partner_id = Uuid::new_v4();

    let (_, property) = request_json(
        &app,
        "POST",
        "/properties",
        Some(json!({"name": "Appartement A-12"})),
    )
    .await;
    let property_id = property["id"].as_str().unwrap().to_string();

    let (status, presale) = request_json(
        &app,
        "POST",
        "/presales",
        Some(json!({
            "property_id": property_id,
            "partner_id": partner_id,
            "validity_days": 2,
            "amount": 5000.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let presale_id = presale["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/presales/{presale_id}/activate"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/presales/{presale_id}/convert"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Payment schedule for the converted sale
    let (status, lines) = request_json(
        &app,
        "POST",
        "/schedules/generate",
        Some(json!({
            "partner_id": partner_id,
            "property_id": property_id,
            "final_price": 1000.0,
            "down_payment": 0.0,
            "installments": 2,
            "mode": {"kind": "by_number"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let lines = lines.as_array().unwrap().clone();
    assert_eq!(lines.len(), 2);
    let first_id = lines[0]["id"].as_str().unwrap().to_string();

    let (status, updated) = request_json(
        &app,
        "POST",
        &format!("/installments/{first_id}/payments"),
        Some(json!({"amount": 500.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["payments"].as_array().unwrap().len(), 1);

    // A paid line refuses to split
    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/installments/{first_id}/split"),
        Some(json!({"amount1": 250.0, "amount2": 250.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
