//! Integration tests for company workspace permissions.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use papyrus_core::types::WorkspaceId;
use papyrus_entity::user::{Permission, UserAccount};

struct Company {
    app: helpers::TestApp,
    admin: UserAccount,
    editor: UserAccount,
    reader: UserAccount,
}

async fn company() -> Company {
    let app = helpers::TestApp::new().await;
    let ws = WorkspaceId::new();
    let admin = app.member("admin@acme.es", ws, Permission::Admin).await;
    let editor = app.member("editor@acme.es", ws, Permission::Edicion).await;
    let reader = app.member("reader@acme.es", ws, Permission::Lectura).await;
    app.add_agent(&admin, "CNMC").await;
    Company {
        app,
        admin,
        editor,
        reader,
    }
}

#[tokio::test]
async fn test_user_context_flags() {
    let c = company().await;

    let admin = c.app.request("GET", "/api/user-context", None, Some(&c.admin)).await;
    assert_eq!(admin.status, StatusCode::OK);
    assert_eq!(admin.body["context"]["tipo_cuenta"], "empresa");
    assert_eq!(admin.body["context"]["is_admin"], true);
    assert_eq!(admin.body["context"]["can_edit_empresa"], true);

    let editor = c.app.request("GET", "/api/user-context", None, Some(&c.editor)).await;
    assert_eq!(editor.body["context"]["permiso"], "edicion");
    assert_eq!(editor.body["context"]["is_admin"], false);
    assert_eq!(editor.body["context"]["can_edit_empresa"], true);

    let reader = c.app.request("GET", "/api/user-context", None, Some(&c.reader)).await;
    assert_eq!(reader.body["context"]["is_admin"], false);
    assert_eq!(reader.body["context"]["can_edit_empresa"], false);
}

#[tokio::test]
async fn test_individual_context_flags() {
    let app = helpers::TestApp::new().await;
    let user = app.individual("solo@example.com", "plan1").await;

    let response = app.request("GET", "/api/user-context", None, Some(&user)).await;

    assert_eq!(response.body["context"]["tipo_cuenta"], "individual");
    assert_eq!(response.body["context"]["is_admin"], false);
    assert_eq!(response.body["context"]["can_edit_empresa"], false);
}

#[tokio::test]
async fn test_members_share_one_structure() {
    let c = company().await;
    let folder = c.app.create_folder(&c.admin, "Regulación", None).await;

    for member in [&c.admin, &c.editor, &c.reader] {
        let body = c.app.context(member).await;
        assert_eq!(body["source"], "empresa");
        assert_eq!(body["data"]["folders"][&folder]["nombre"], "Regulación");
        assert_eq!(body["data"]["version"], 2);
    }
}

#[tokio::test]
async fn test_only_admin_manages_folders() {
    let c = company().await;
    let folder = c.app.create_folder(&c.admin, "Regulación", None).await;

    for member in [&c.editor, &c.reader] {
        let response = c
            .app
            .request(
                "POST",
                "/api/carpetas",
                Some(json!({ "nombre": "Otra", "expectedVersion": 2 })),
                Some(member),
            )
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);

        let response = c
            .app
            .request(
                "PUT",
                &format!("/api/carpetas/{folder}/rename"),
                Some(json!({ "newName": "Cambiada", "expectedVersion": 2 })),
                Some(member),
            )
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);

        let response = c
            .app
            .request("DELETE", &format!("/api/carpetas/{folder}"), None, Some(member))
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }

    assert_eq!(c.app.version(&c.admin).await, 2);
}

#[tokio::test]
async fn test_editor_assigns_reader_cannot() {
    let c = company().await;
    let folder = c.app.create_folder(&c.admin, "Energía", None).await;

    let response = c
        .app
        .request(
            "POST",
            "/api/carpetas/assign",
            Some(json!({ "agenteName": "CNMC", "folderId": folder, "expectedVersion": 2 })),
            Some(&c.reader),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["success"], false);

    let response = c
        .app
        .request(
            "POST",
            "/api/carpetas/assign",
            Some(json!({ "agenteName": "CNMC", "folderId": folder, "expectedVersion": 2 })),
            Some(&c.editor),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = c.app.context(&c.reader).await;
    assert_eq!(body["data"]["asignaciones"]["CNMC"], folder.as_str());
    assert_eq!(body["counts"][&folder], 1);
}

#[tokio::test]
async fn test_reader_cannot_edit_catalog() {
    let c = company().await;

    let response = c
        .app
        .request(
            "POST",
            "/api/etiquetas",
            Some(json!({ "nombre": "BOE" })),
            Some(&c.reader),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = c
        .app
        .request("DELETE", "/api/etiquetas/CNMC", None, Some(&c.reader))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = c.app.request("GET", "/api/etiquetas-context", None, Some(&c.reader)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].get("CNMC").is_some());
}

#[tokio::test]
async fn test_history_is_admin_only() {
    let c = company().await;
    c.app.create_folder(&c.admin, "Regulación", None).await;

    let response = c
        .app
        .request("GET", "/api/carpetas/historial", None, Some(&c.editor))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = c
        .app
        .request("GET", "/api/carpetas/historial", None, Some(&c.admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let entries = response.body["data"].as_array().expect("history array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["userId"], c.admin.id.to_string());
}

#[tokio::test]
async fn test_selections_are_per_member() {
    let c = company().await;

    let response = c
        .app
        .request(
            "POST",
            "/api/agentes-seleccion-personalizada",
            Some(json!({ "seleccion": ["CNMC"] })),
            Some(&c.reader),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let reader = c
        .app
        .request("GET", "/api/agentes-seleccion-personalizada", None, Some(&c.reader))
        .await;
    assert_eq!(reader.body["seleccion"], json!(["CNMC"]));

    let admin = c
        .app
        .request("GET", "/api/agentes-seleccion-personalizada", None, Some(&c.admin))
        .await;
    assert_eq!(admin.body["seleccion"], json!([]));
}
