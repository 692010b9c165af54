//! Folder CRUD, agent assignment and history with permission checks and
//! optimistic concurrency.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use papyrus_core::error::AppError;
use papyrus_core::result::AppResult;
use papyrus_database::store::WorkspaceStore;
use papyrus_entity::folder::{Folder, FolderCounts, FolderId, FolderStructure};
use papyrus_entity::history::{HistoryAction, HistoryEntry};

use crate::commit::{Change, apply_change};
use crate::context::RequestContext;

/// Longest accepted folder name, in characters.
pub const MAX_FOLDER_NAME_LEN: usize = 120;

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub nombre: String,
    /// Parent folder (None for top level).
    pub parent_id: Option<FolderId>,
    /// Version the caller last saw.
    pub expected_version: Option<u64>,
}

/// Folder structure plus derived counts, as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct FolderContext {
    /// The current structure.
    pub structure: FolderStructure,
    /// Recursive agent counts.
    pub counts: FolderCounts,
    /// `"empresa"` for shared company structures, `"user"` otherwise.
    pub source: &'static str,
}

/// Manages the folder structure of the caller's workspace.
#[derive(Debug, Clone)]
pub struct FolderService {
    store: Arc<dyn WorkspaceStore>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<dyn WorkspaceStore>) -> Self {
        Self { store }
    }

    /// Current structure and counts.
    pub async fn context(&self, ctx: &RequestContext) -> AppResult<FolderContext> {
        let doc = self.store.load_workspace(ctx.workspace_id()).await?;
        let counts = FolderCounts::compute(&doc.structure);
        Ok(FolderContext {
            structure: doc.structure,
            counts,
            source: if ctx.user.is_empresa() { "empresa" } else { "user" },
        })
    }

    /// Creates a folder. Returns the new folder id and structure version.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<(FolderId, u64)> {
        require_folder_admin(ctx, "crear")?;
        let nombre = validate_name(&req.nombre)?;
        let folder_id = FolderId::generate();
        let id = folder_id.clone();
        let actor = ctx.actor();

        let version = apply_change(
            self.store.as_ref(),
            ctx,
            req.expected_version,
            HistoryAction::Create,
            move |doc| {
                let structure = &mut doc.structure;
                if let Some(parent) = &req.parent_id {
                    if !structure.contains(parent) {
                        return Err(AppError::validation("Carpeta padre no existe"));
                    }
                }
                if !structure.is_name_unique_among_siblings(&nombre, req.parent_id.as_ref(), None) {
                    return Err(AppError::validation(
                        "Ya existe una carpeta con ese nombre en la misma ubicación",
                    ));
                }
                let now = Utc::now();
                let orden = i32::try_from(structure.children(req.parent_id.as_ref()).len()).unwrap_or(i32::MAX);
                let folder = Folder {
                    id: id.clone(),
                    nombre: nombre.clone(),
                    parent_id: req.parent_id.clone(),
                    orden,
                    created_at: Some(now),
                    created_by: Some(actor.clone()),
                    updated_at: Some(now),
                    updated_by: Some(actor),
                };
                structure.folders.insert(id.clone(), folder);
                Ok(Change::new(json!({
                    "folderId": id,
                    "nombre": nombre,
                    "parentId": req.parent_id,
                })))
            },
        )
        .await?;

        Ok((folder_id, version))
    }

    /// Renames a folder. Returns the new structure version.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        new_name: &str,
        expected_version: Option<u64>,
    ) -> AppResult<u64> {
        require_folder_admin(ctx, "renombrar")?;
        let nombre = validate_name(new_name)?;
        let actor = ctx.actor();

        apply_change(
            self.store.as_ref(),
            ctx,
            expected_version,
            HistoryAction::Rename,
            |doc| {
                let structure = &mut doc.structure;
                let parent = existing(structure, folder_id)?.parent_id.clone();
                if !structure.is_name_unique_among_siblings(&nombre, parent.as_ref(), Some(folder_id)) {
                    return Err(AppError::validation(
                        "Ya existe una carpeta con ese nombre en la misma ubicación",
                    ));
                }
                let folder = existing_mut(structure, folder_id)?;
                let previous = std::mem::replace(&mut folder.nombre, nombre.clone());
                folder.updated_at = Some(Utc::now());
                folder.updated_by = Some(actor);
                Ok(Change::new(json!({
                    "folderId": folder_id,
                    "from": previous,
                    "to": nombre,
                })))
            },
        )
        .await
    }

    /// Moves a folder under a new parent (None for top level).
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        new_parent_id: Option<&FolderId>,
        expected_version: Option<u64>,
    ) -> AppResult<u64> {
        require_folder_admin(ctx, "mover")?;
        let actor = ctx.actor();

        apply_change(
            self.store.as_ref(),
            ctx,
            expected_version,
            HistoryAction::Move,
            |doc| {
                let structure = &mut doc.structure;
                let nombre = existing(structure, folder_id)?.nombre.clone();
                if let Some(parent) = new_parent_id {
                    if !structure.contains(parent) {
                        return Err(AppError::validation("Nueva carpeta padre no existe"));
                    }
                }
                if structure.would_create_cycle(folder_id, new_parent_id) {
                    return Err(AppError::validation("Movimiento inválido: crearía un ciclo"));
                }
                if !structure.is_name_unique_among_siblings(&nombre, new_parent_id, Some(folder_id)) {
                    return Err(AppError::validation(
                        "Ya existe una carpeta con ese nombre en la carpeta destino",
                    ));
                }
                let folder = existing_mut(structure, folder_id)?;
                let previous = std::mem::replace(&mut folder.parent_id, new_parent_id.cloned());
                folder.updated_at = Some(Utc::now());
                folder.updated_by = Some(actor);
                Ok(Change::new(json!({
                    "folderId": folder_id,
                    "from": previous,
                    "to": new_parent_id,
                })))
            },
        )
        .await
    }

    /// Deletes an empty folder.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        expected_version: Option<u64>,
    ) -> AppResult<u64> {
        require_folder_admin(ctx, "eliminar")?;

        apply_change(
            self.store.as_ref(),
            ctx,
            expected_version,
            HistoryAction::Delete,
            |doc| {
                let structure = &mut doc.structure;
                let nombre = existing(structure, folder_id)?.nombre.clone();
                if structure.has_children(folder_id) {
                    return Err(AppError::validation(
                        "La carpeta tiene subcarpetas. Muévelas o elimínalas primero.",
                    ));
                }
                if structure.has_agents(folder_id) {
                    return Err(AppError::validation(
                        "La carpeta tiene agentes asignados. Reasígnalos primero.",
                    ));
                }
                structure.folders.remove(folder_id);
                Ok(Change::new(json!({ "folderId": folder_id, "nombre": nombre })))
            },
        )
        .await
    }

    /// Assigns an agent to a folder, or to root for `None`.
    pub async fn assign_agent(
        &self,
        ctx: &RequestContext,
        agent: &str,
        folder_id: Option<&FolderId>,
        expected_version: Option<u64>,
    ) -> AppResult<u64> {
        if !ctx.user.can_assign_agents() {
            return Err(AppError::authorization("Sin permisos para asignar agentes"));
        }
        let agent = agent.trim();
        if agent.is_empty() {
            return Err(AppError::validation("El nombre del agente es obligatorio"));
        }

        apply_change(
            self.store.as_ref(),
            ctx,
            expected_version,
            HistoryAction::Assign,
            |doc| {
                if let Some(target) = folder_id {
                    if !doc.structure.contains(target) {
                        return Err(AppError::validation("Carpeta destino no existe"));
                    }
                }
                if !doc.agents.contains_key(agent) {
                    return Err(AppError::validation(
                        "Agente no existe en el catálogo de agentes",
                    ));
                }
                let previous = doc.structure.assign(agent, folder_id.cloned()).flatten();
                Ok(Change::new(json!({
                    "agente": agent,
                    "from": previous,
                    "to": folder_id,
                })))
            },
        )
        .await
    }

    /// Most recent structural changes. Restricted to folder administrators.
    pub async fn history(&self, ctx: &RequestContext, limit: usize) -> AppResult<Vec<HistoryEntry>> {
        if !ctx.user.can_manage_folders() {
            return Err(AppError::authorization(
                "Solo admins de empresa pueden ver el historial de carpetas",
            ));
        }
        self.store.history(ctx.workspace_id(), limit).await
    }
}

fn require_folder_admin(ctx: &RequestContext, verb: &str) -> AppResult<()> {
    if ctx.user.can_manage_folders() {
        Ok(())
    } else {
        Err(AppError::authorization(format!(
            "Solo admins de empresa pueden {verb} carpetas"
        )))
    }
}

fn validate_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("El nombre de la carpeta es obligatorio"));
    }
    if name.chars().count() > MAX_FOLDER_NAME_LEN {
        return Err(AppError::validation(format!(
            "El nombre de la carpeta no puede superar {MAX_FOLDER_NAME_LEN} caracteres"
        )));
    }
    Ok(name.to_string())
}

fn existing<'a>(structure: &'a FolderStructure, id: &FolderId) -> AppResult<&'a Folder> {
    structure
        .folder(id)
        .ok_or_else(|| AppError::not_found("Carpeta no existe"))
}

fn existing_mut<'a>(structure: &'a mut FolderStructure, id: &FolderId) -> AppResult<&'a mut Folder> {
    structure
        .folders
        .get_mut(id)
        .ok_or_else(|| AppError::not_found("Carpeta no existe"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, admin_of, editor_of, individual, reader_of};
    use papyrus_core::error::ErrorKind;

    async fn create(svc: &FolderService, ctx: &RequestContext, name: &str, parent: Option<&FolderId>) -> FolderId {
        svc.create_folder(
            ctx,
            CreateFolderRequest {
                nombre: name.into(),
                parent_id: parent.cloned(),
                expected_version: None,
            },
        )
        .await
        .unwrap()
        .0
    }

    #[tokio::test]
    async fn test_create_bumps_version_and_records_history() {
        let fx = Fixture::new().await;
        let ctx = individual(&fx).await;
        let (id, version) = fx
            .folders
            .create_folder(
                &ctx,
                CreateFolderRequest {
                    nombre: "  Energía ".into(),
                    parent_id: None,
                    expected_version: Some(1),
                },
            )
            .await
            .unwrap();
        assert_eq!(version, 2);

        let context = fx.folders.context(&ctx).await.unwrap();
        assert_eq!(context.structure.folders[&id].nombre, "Energía");
        assert_eq!(context.source, "user");
        assert_eq!(fx.folders.history(&ctx, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_version_is_a_conflict() {
        let fx = Fixture::new().await;
        let ctx = individual(&fx).await;
        create(&fx.folders, &ctx, "A", None).await;

        let err = fx
            .folders
            .create_folder(
                &ctx,
                CreateFolderRequest {
                    nombre: "B".into(),
                    parent_id: None,
                    expected_version: Some(1),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_version_conflict());
        assert_eq!(err.current_version, Some(2));
    }

    #[tokio::test]
    async fn test_validation_runs_before_version_check() {
        let fx = Fixture::new().await;
        let ctx = individual(&fx).await;
        create(&fx.folders, &ctx, "A", None).await;

        let err = fx
            .folders
            .create_folder(
                &ctx,
                CreateFolderRequest {
                    nombre: "a".into(),
                    parent_id: None,
                    expected_version: Some(99),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_move_rejects_cycles() {
        let fx = Fixture::new().await;
        let ctx = individual(&fx).await;
        let a = create(&fx.folders, &ctx, "A", None).await;
        let b = create(&fx.folders, &ctx, "B", Some(&a)).await;

        let err = fx.folders.move_folder(&ctx, &a, Some(&b), None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let version = fx.folders.move_folder(&ctx, &b, None, None).await.unwrap();
        assert_eq!(version, 4);
    }

    #[tokio::test]
    async fn test_delete_requires_empty_folder() {
        let fx = Fixture::new().await;
        let ctx = individual(&fx).await;
        fx.add_agent(&ctx, "CNMC").await;
        let a = create(&fx.folders, &ctx, "A", None).await;
        let b = create(&fx.folders, &ctx, "B", Some(&a)).await;

        let err = fx.folders.delete_folder(&ctx, &a, None).await.unwrap_err();
        assert!(err.message.contains("subcarpetas"));

        fx.folders.assign_agent(&ctx, "CNMC", Some(&b), None).await.unwrap();
        let err = fx.folders.delete_folder(&ctx, &b, None).await.unwrap_err();
        assert!(err.message.contains("agentes asignados"));

        let before = fx.folders.context(&ctx).await.unwrap().structure;
        fx.folders.assign_agent(&ctx, "CNMC", None, None).await.unwrap();
        fx.folders.delete_folder(&ctx, &b, None).await.unwrap();
        let after = fx.folders.context(&ctx).await.unwrap().structure;
        assert_eq!(after.version, before.version + 2);
        assert!(!after.contains(&b));
    }

    #[tokio::test]
    async fn test_rename_unknown_folder_is_not_found() {
        let fx = Fixture::new().await;
        let ctx = individual(&fx).await;
        let err = fx
            .folders
            .rename_folder(&ctx, &"nope".into(), "X", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_company_permissions() {
        let fx = Fixture::new().await;
        let admin = admin_of(&fx).await;
        let editor = editor_of(&fx, &admin).await;
        let reader = reader_of(&fx, &admin).await;
        fx.add_agent(&admin, "BOE").await;

        let folder = create(&fx.folders, &admin, "Compartida", None).await;

        let err = fx
            .folders
            .rename_folder(&editor, &folder, "Otra", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        fx.folders
            .assign_agent(&editor, "BOE", Some(&folder), None)
            .await
            .unwrap();

        let err = fx
            .folders
            .assign_agent(&reader, "BOE", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let shared = fx.folders.context(&reader).await.unwrap();
        assert_eq!(shared.source, "empresa");
        assert_eq!(shared.counts.get(&folder), 1);
    }

    #[tokio::test]
    async fn test_assign_unknown_agent_is_rejected() {
        let fx = Fixture::new().await;
        let ctx = individual(&fx).await;
        let err = fx.folders.assign_agent(&ctx, "Ghost", None, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Banca ").unwrap(), "Banca");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_FOLDER_NAME_LEN + 1)).is_err());
    }
}
