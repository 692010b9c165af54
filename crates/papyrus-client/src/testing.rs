//! In-process fakes for controller tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use papyrus_entity::folder::{AgentCatalog, Folder, FolderId, FolderStructure};
use papyrus_entity::onboarding::OnboardingProfile;
use papyrus_entity::user::UserContext;

use crate::error::{RemoteError, RemoteResult};
use crate::host::{ClientHost, Toast};
use crate::remote::{MutationAck, RemoteFolderStore};
use crate::render::{GridView, TreeView};

/// A folder store that behaves like the server and can be told to fail.
#[derive(Debug, Default)]
pub struct FakeRemote {
    pub structure: Mutex<FolderStructure>,
    pub catalog: Mutex<AgentCatalog>,
    pub selection: Mutex<Vec<String>>,
    pub user: Mutex<Option<UserContext>>,
    pub onboarding: Mutex<Vec<OnboardingProfile>>,
    pub regulatory: Mutex<Vec<serde_json::Value>>,
    /// Error returned by the next mutating call.
    pub fail_next: Mutex<Option<RemoteError>>,
    /// Error returned by every selection save.
    pub fail_selection: Mutex<Option<RemoteError>>,
    /// Error returned by every structure fetch.
    pub fail_context: Mutex<Option<RemoteError>>,
    /// Delay applied to mutating calls.
    pub delay: Mutex<Option<Duration>>,
    pub mutations: AtomicUsize,
}

impl FakeRemote {
    /// Folder `1` "Clientes" holding `AgenteX`.
    pub fn scenario() -> Self {
        let remote = Self::default();
        remote.add_folder("1", "Clientes", None);
        remote.add_agent("AgenteX", Some("1"));
        remote
    }

    pub fn add_folder(&self, id: &str, nombre: &str, parent: Option<&str>) {
        let folder = Folder::new(id, nombre, parent.map(FolderId::from));
        self.lock_structure().folders.insert(folder.id.clone(), folder);
    }

    pub fn add_agent(&self, name: &str, folder: Option<&str>) {
        self.lock_structure()
            .asignaciones
            .insert(name.to_string(), folder.map(FolderId::from));
        lock(&self.catalog).insert(name.to_string(), serde_json::json!(format!("{name} desc")));
    }

    pub fn structure(&self) -> FolderStructure {
        self.lock_structure().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn lock_structure(&self) -> std::sync::MutexGuard<'_, FolderStructure> {
        lock(&self.structure)
    }

    async fn mutate(
        &self,
        expected_version: u64,
        apply: impl FnOnce(&mut FolderStructure) -> RemoteResult<Option<FolderId>>,
    ) -> RemoteResult<MutationAck> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = lock(&self.fail_next).take() {
            return Err(err);
        }
        let mut structure = self.lock_structure();
        if structure.version != expected_version {
            return Err(RemoteError::Conflict {
                current_version: Some(structure.version),
                message: "Conflicto de versión".into(),
            });
        }
        let mut next = structure.clone();
        let folder_id = apply(&mut next)?;
        next.version += 1;
        *structure = next;
        Ok(MutationAck {
            folder_id,
            new_version: Some(structure.version),
        })
    }
}

pub fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rejected(message: &str) -> RemoteError {
    RemoteError::Http {
        status: 400,
        message: message.to_string(),
    }
}

#[async_trait]
impl RemoteFolderStore for FakeRemote {
    async fn user_context(&self) -> RemoteResult<UserContext> {
        lock(&self.user)
            .clone()
            .ok_or_else(|| RemoteError::Request("connection refused".into()))
    }

    async fn folder_context(&self) -> RemoteResult<FolderStructure> {
        if let Some(err) = lock(&self.fail_context).clone() {
            return Err(err);
        }
        Ok(self.structure())
    }

    async fn agent_catalog(&self) -> RemoteResult<AgentCatalog> {
        Ok(lock(&self.catalog).clone())
    }

    async fn selection(&self) -> RemoteResult<Vec<String>> {
        Ok(lock(&self.selection).clone())
    }

    async fn save_selection(&self, agents: &[String]) -> RemoteResult<()> {
        if let Some(err) = lock(&self.fail_selection).clone() {
            return Err(err);
        }
        *lock(&self.selection) = agents.to_vec();
        Ok(())
    }

    async fn assign_agent(
        &self,
        agent: &str,
        folder: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        self.mutate(expected_version, |s| {
            if folder.is_some_and(|f| !s.contains(f)) {
                return Err(rejected("Carpeta destino no existe"));
            }
            s.assign(agent, folder.cloned());
            Ok(None)
        })
        .await
    }

    async fn create_folder(
        &self,
        nombre: &str,
        parent: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        self.mutate(expected_version, |s| {
            let id = FolderId::generate();
            let folder = Folder::new(id.clone(), nombre, parent.cloned());
            s.folders.insert(id.clone(), folder);
            Ok(Some(id))
        })
        .await
    }

    async fn rename_folder(
        &self,
        id: &FolderId,
        new_name: &str,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        self.mutate(expected_version, |s| {
            let folder = s
                .folders
                .get_mut(id)
                .ok_or_else(|| rejected("Carpeta no existe"))?;
            folder.nombre = new_name.to_string();
            Ok(None)
        })
        .await
    }

    async fn move_folder(
        &self,
        id: &FolderId,
        new_parent: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        self.mutate(expected_version, |s| {
            if s.would_create_cycle(id, new_parent) {
                return Err(rejected("Movimiento inválido: crearía un ciclo"));
            }
            let folder = s
                .folders
                .get_mut(id)
                .ok_or_else(|| rejected("Carpeta no existe"))?;
            folder.parent_id = new_parent.cloned();
            Ok(None)
        })
        .await
    }

    async fn delete_folder(
        &self,
        id: &FolderId,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        self.mutate(expected_version, |s| {
            if s.has_children(id) || s.has_agents(id) {
                return Err(rejected("La carpeta no está vacía"));
            }
            s.folders.remove(id);
            Ok(None)
        })
        .await
    }

    async fn delete_agent(&self, name: &str, expected_version: u64) -> RemoteResult<MutationAck> {
        let ack = self
            .mutate(expected_version, |s| {
                s.asignaciones.remove(name);
                Ok(None)
            })
            .await?;
        lock(&self.catalog).remove(name);
        lock(&self.selection).retain(|a| a != name);
        Ok(ack)
    }

    async fn save_onboarding(&self, profile: &OnboardingProfile) -> RemoteResult<()> {
        lock(&self.onboarding).push(profile.clone());
        Ok(())
    }

    async fn regulatory_profile(&self, answers: &serde_json::Value) -> RemoteResult<()> {
        lock(&self.regulatory).push(answers.clone());
        Ok(())
    }
}

/// Records everything the controller asks the host to do.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub toasts: Mutex<Vec<Toast>>,
    pub trees: Mutex<Vec<TreeView>>,
    pub grids: Mutex<Vec<GridView>>,
    pub removed_cards: Mutex<Vec<String>>,
    pub reloads: Mutex<Vec<Duration>>,
}

impl RecordingHost {
    pub fn toast_messages(&self) -> Vec<String> {
        lock(&self.toasts).iter().map(|t| t.message.clone()).collect()
    }

    pub fn last_tree(&self) -> Option<TreeView> {
        lock(&self.trees).last().cloned()
    }
}

impl ClientHost for RecordingHost {
    fn toast(&self, toast: Toast) {
        lock(&self.toasts).push(toast);
    }

    fn render_tree(&self, view: &TreeView) {
        lock(&self.trees).push(view.clone());
    }

    fn render_agents_grid(&self, view: &GridView) {
        lock(&self.grids).push(view.clone());
    }

    fn remove_agent_card(&self, agent: &str) {
        lock(&self.removed_cards).push(agent.to_string());
    }

    fn schedule_reload(&self, delay: Duration) {
        lock(&self.reloads).push(delay);
    }
}
