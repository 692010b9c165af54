//! Integration tests for favorite selection and onboarding data.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

const SELECTION: &str = "/api/agentes-seleccion-personalizada";

#[tokio::test]
async fn test_selection_round_trip() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("fav@example.com", "plan2").await;

    let response = app
        .request("POST", SELECTION, Some(json!({ "seleccion": ["BOE", "CNMC"] })), Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);

    let response = app.request("GET", SELECTION, None, Some(&user)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["seleccion"], json!(["BOE", "CNMC"]));
}

#[tokio::test]
async fn test_folder_keys_are_dropped() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("keys@example.com", "plan2").await;

    app.request(
        "POST",
        SELECTION,
        Some(json!({ "seleccion": ["folder:f1", "BOE", "BOE", " "] })),
        Some(&user),
    )
    .await;

    let response = app.request("GET", SELECTION, None, Some(&user)).await;
    assert_eq!(response.body["seleccion"], json!(["BOE"]));
}

#[tokio::test]
async fn test_plan_limit_enforced() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("limit@example.com", "plan2").await;
    let six: Vec<String> = (1..=6).map(|i| format!("Agente {i}")).collect();

    let response = app
        .request("POST", SELECTION, Some(json!({ "seleccion": six })), Some(&user))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Has superado el límite de agentes (5) para tu plan"
    );
    let response = app.request("GET", SELECTION, None, Some(&user)).await;
    assert_eq!(response.body["seleccion"], json!([]));
}

#[tokio::test]
async fn test_folder_keys_do_not_count_toward_limit() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("under@example.com", "plan2").await;
    let mut seleccion: Vec<String> = (1..=5).map(|i| format!("Agente {i}")).collect();
    seleccion.push("folder:f1".to_string());

    let response = app
        .request("POST", SELECTION, Some(json!({ "seleccion": seleccion })), Some(&user))
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_free_plan_allows_no_favorites() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("free@example.com", "plan1").await;

    let response = app
        .request("POST", SELECTION, Some(json!({ "seleccion": ["BOE"] })), Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", SELECTION, Some(json!({ "seleccion": [] })), Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unlimited_plan() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("big@example.com", "plan4").await;
    let many: Vec<String> = (1..=50).map(|i| format!("Agente {i}")).collect();

    let response = app
        .request("POST", SELECTION, Some(json!({ "seleccion": many })), Some(&user))
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_plan_uses_fallback() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("trial@example.com", "trial").await;

    let response = app
        .request("POST", SELECTION, Some(json!({ "seleccion": ["BOE"] })), Some(&user))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_onboarding_round_trip() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("onboard@example.com", "plan2").await;

    let response = app.request("GET", "/api/onboarding-data", None, Some(&user)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], serde_json::Value::Null);

    let response = app
        .request(
            "POST",
            "/api/save-onboarding-data",
            Some(json!({
                "tipo_empresa": "Despacho",
                "interes": ["Cumplimiento normativo"],
                "tamaño_empresa": "20-100",
                "web": "acme.es",
                "detalle_empresa": { "sector": "Fiscal" },
            })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/onboarding-data", None, Some(&user)).await;
    let data = &response.body["data"];
    assert_eq!(data["tipo_empresa"], "Despacho");
    assert_eq!(data["tamaño_empresa"], "20-100");
    assert_eq!(data["web"], "https://acme.es");
    assert_eq!(data["detalle_empresa"]["sector"], "Fiscal");
    assert!(data["detalle_empresa"].get("actividad").is_none());
}
