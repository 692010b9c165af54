//! Integration tests for folder structure operations.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use papyrus_entity::user::{AccountType, NewUser};

#[tokio::test]
async fn test_empty_context() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("empty@example.com", "plan2").await;

    let body = app.context(&user).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "user");
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["data"]["folders"], json!({}));
    assert_eq!(body["counts"]["root_total"], 0);
}

#[tokio::test]
async fn test_folder_lifecycle() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("life@example.com", "plan2").await;

    let energia = app.create_folder(&user, "Energía", None).await;
    let banca = app.create_folder(&user, "Banca", None).await;
    assert_eq!(app.version(&user).await, 3);

    let response = app
        .request(
            "PUT",
            &format!("/api/carpetas/{energia}/rename"),
            Some(json!({ "newName": "Energía y Renovables", "expectedVersion": 3 })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["newVersion"], 4);

    let response = app
        .request(
            "PUT",
            &format!("/api/carpetas/{banca}/move"),
            Some(json!({ "newParentId": energia, "expectedVersion": 4 })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = app.context(&user).await;
    assert_eq!(body["data"]["folders"][&energia]["nombre"], "Energía y Renovables");
    assert_eq!(body["data"]["folders"][&banca]["parentId"], energia.as_str());

    let response = app
        .request(
            "DELETE",
            &format!("/api/carpetas/{banca}"),
            Some(json!({ "expectedVersion": 5 })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["newVersion"], 6);

    let body = app.context(&user).await;
    assert!(body["data"]["folders"].get(&banca).is_none());
}

#[tokio::test]
async fn test_delete_without_body_skips_version_check() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("nobody@example.com", "plan2").await;
    let id = app.create_folder(&user, "Temporal", None).await;

    let response = app
        .request("DELETE", &format!("/api/carpetas/{id}"), None, Some(&user))
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_stale_version_is_conflict() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("stale@example.com", "plan2").await;
    app.create_folder(&user, "Primera", None).await;

    let response = app
        .request(
            "POST",
            "/api/carpetas",
            Some(json!({ "nombre": "Segunda", "parentId": null, "expectedVersion": 1 })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["conflict"], true);
    assert_eq!(response.body["currentVersion"], 2);
    assert_eq!(app.version(&user).await, 2);
}

#[tokio::test]
async fn test_duplicate_sibling_name_rejected() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("dup@example.com", "plan2").await;
    app.create_folder(&user, "Banca", None).await;
    let version = app.version(&user).await;

    let response = app
        .request(
            "POST",
            "/api/carpetas",
            Some(json!({ "nombre": "  banca ", "expectedVersion": version })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.version(&user).await, version);
}

#[tokio::test]
async fn test_blank_name_rejected() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("blank@example.com", "plan2").await;

    let response = app
        .request(
            "POST",
            "/api/carpetas",
            Some(json!({ "nombre": "   ", "expectedVersion": 1 })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_move_into_descendant_rejected() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("cycle@example.com", "plan2").await;
    let parent = app.create_folder(&user, "Padre", None).await;
    let child = app.create_folder(&user, "Hija", Some(&parent)).await;
    let version = app.version(&user).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/carpetas/{parent}/move"),
            Some(json!({ "newParentId": child, "expectedVersion": version })),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.version(&user).await, version);
}

#[tokio::test]
async fn test_delete_non_empty_folder_rejected() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("full@example.com", "plan2").await;
    app.add_agent(&user, "CNMC").await;
    let parent = app.create_folder(&user, "Padre", None).await;
    let child = app.create_folder(&user, "Hija", Some(&parent)).await;

    let response = app
        .request("DELETE", &format!("/api/carpetas/{parent}"), None, Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let version = app.version(&user).await;
    let response = app
        .request(
            "POST",
            "/api/carpetas/assign",
            Some(json!({ "agenteName": "CNMC", "folderId": child, "expectedVersion": version })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("DELETE", &format!("/api/carpetas/{child}"), None, Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assign_updates_recursive_counts() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("counts@example.com", "plan2").await;
    for agent in ["CNMC", "IDAE", "BOE"] {
        app.add_agent(&user, agent).await;
    }
    let energia = app.create_folder(&user, "Energía", None).await;
    let solar = app.create_folder(&user, "Solar", Some(&energia)).await;

    for (agent, folder) in [("CNMC", Some(&energia)), ("IDAE", Some(&solar)), ("BOE", None)] {
        let version = app.version(&user).await;
        let response = app
            .request(
                "POST",
                "/api/carpetas/assign",
                Some(json!({ "agenteName": agent, "folderId": folder, "expectedVersion": version })),
                Some(&user),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    }

    let body = app.context(&user).await;
    assert_eq!(body["data"]["asignaciones"]["IDAE"], solar.as_str());
    assert_eq!(body["data"]["asignaciones"]["BOE"], serde_json::Value::Null);
    assert_eq!(body["counts"][&energia], 2);
    assert_eq!(body["counts"][&solar], 1);
    assert_eq!(body["counts"]["root"], 1);
    assert_eq!(body["counts"]["root_total"], 3);
}

#[tokio::test]
async fn test_assign_validates_agent_and_target() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("assign@example.com", "plan2").await;
    app.add_agent(&user, "CNMC").await;

    let response = app
        .request(
            "POST",
            "/api/carpetas/assign",
            Some(json!({ "agenteName": "Fantasma", "folderId": null, "expectedVersion": 1 })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Agente no existe en el catálogo de agentes");

    let response = app
        .request(
            "POST",
            "/api/carpetas/assign",
            Some(json!({ "agenteName": "CNMC", "folderId": "no-such-folder", "expectedVersion": 1 })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Carpeta destino no existe");
    assert_eq!(app.version(&user).await, 1);
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/carpetas-context", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_identity_is_unauthorized() {
    let app = helpers::TestApp::new().await;
    let stranger = NewUser {
        id: None,
        email: "stranger@example.com".to_string(),
        tipo_cuenta: AccountType::Individual,
        permiso: None,
        empresa: None,
        estructura_empresa_id: None,
        subscription_plan: "plan1".to_string(),
    }
    .into_account();

    let response = app
        .request("GET", "/api/carpetas-context", None, Some(&stranger))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_history_lists_latest_first() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("history@example.com", "plan2").await;
    let id = app.create_folder(&user, "Auditoría", None).await;
    app.request(
        "PUT",
        &format!("/api/carpetas/{id}/rename"),
        Some(json!({ "newName": "Auditoría 2026", "expectedVersion": 2 })),
        Some(&user),
    )
    .await;

    let response = app
        .request("GET", "/api/carpetas/historial?limit=10", None, Some(&user))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let entries = response.body["data"].as_array().expect("history array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "rename");
    assert_eq!(entries[0]["version"], 3);
    assert_eq!(entries[0]["detail"]["to"], "Auditoría 2026");
    assert_eq!(entries[1]["action"], "create");
}

#[tokio::test]
async fn test_delete_agent_drops_assignment() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("agents@example.com", "plan2").await;
    app.add_agent(&user, "CNMC").await;
    let folder = app.create_folder(&user, "Energía", None).await;
    app.request(
        "POST",
        "/api/carpetas/assign",
        Some(json!({ "agenteName": "CNMC", "folderId": folder, "expectedVersion": 2 })),
        Some(&user),
    )
    .await;

    let response = app
        .request(
            "DELETE",
            "/api/etiquetas/CNMC",
            Some(json!({ "expectedVersion": 3 })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["newVersion"], 4);

    let body = app.context(&user).await;
    assert!(body["data"]["asignaciones"].get("CNMC").is_none());
    assert_eq!(body["counts"][&folder], 0);

    let response = app.request("GET", "/api/etiquetas-context", None, Some(&user)).await;
    assert_eq!(response.body["data"], json!({}));

    let response = app
        .request("DELETE", "/api/etiquetas/CNMC", None, Some(&user))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upsert_agent_lists_in_catalog() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("catalog@example.com", "plan2").await;

    let response = app
        .request(
            "POST",
            "/api/etiquetas",
            Some(json!({ "nombre": "BOE", "descripcion": { "ambito": "estatal" } })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/etiquetas-context", None, Some(&user)).await;
    assert_eq!(response.body["data"]["BOE"]["ambito"], "estatal");
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
