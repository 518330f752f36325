//! Project storage trait and implementations

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::state::ProjectState;
use crate::Result;

/// Durable store keyed by project id. The engine is agnostic to the
/// concrete technology; implementations only need whole-state load/save.
#[async_trait]
pub trait ProjectStorage: Send + Sync {
    /// Load a project's state.
    async fn load_project(&self, project_id: Uuid) -> Result<ProjectState>;

    /// Save a project's state.
    async fn save_project(&self, project_id: Uuid, state: &ProjectState) -> Result<()>;

    /// Check if a project exists.
    async fn project_exists(&self, project_id: Uuid) -> bool;

    /// Delete a project.
    async fn delete_project(&self, project_id: Uuid) -> Result<()>;
}

/// File-based project storage, one JSON document per project.
#[derive(Clone)]
pub struct FileProjectStorage {
    base_path: PathBuf,
}

impl FileProjectStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn project_path(&self, project_id: Uuid) -> PathBuf {
        self.base_path.join(format!("{}.json", project_id))
    }
}

#[async_trait]
impl ProjectStorage for FileProjectStorage {
    async fn load_project(&self, project_id: Uuid) -> Result<ProjectState> {
        let path = self.project_path(project_id);

        if !path.exists() {
            return Err(ServiceError::ProjectNotFound(project_id));
        }

        let contents = fs::read_to_string(&path).await?;
        let state: ProjectState = serde_json::from_str(&contents)?;

        // A stored chain with gaps or a bad pointer is unrecoverable;
        // abort the load rather than attempt repair.
        state.chain.validate()?;

        Ok(state)
    }

    async fn save_project(&self, project_id: Uuid, state: &ProjectState) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.project_path(project_id);
        let contents = serde_json::to_string_pretty(state)?;

        fs::write(&path, contents).await?;

        Ok(())
    }

    async fn project_exists(&self, project_id: Uuid) -> bool {
        self.project_path(project_id).exists()
    }

    async fn delete_project(&self, project_id: Uuid) -> Result<()> {
        let path = self.project_path(project_id);

        if path.exists() {
            fs::remove_file(&path).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revision_engine::{Author, VersionMeta};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_storage_save_and_load() {
        let dir = tempdir().unwrap();
        let storage = FileProjectStorage::new(dir.path());
        let id = Uuid::new_v4();

        let mut state = ProjectState::new();
        state.chain.append_version(
            "Hello world".to_string(),
            Author::Human,
            VersionMeta::default(),
        );
        storage.save_project(id, &state).await.unwrap();

        let loaded = storage.load_project(id).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileProjectStorage::new(dir.path());

        let result = storage.load_project(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServiceError::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileProjectStorage::new(dir.path());
        let id = Uuid::new_v4();

        storage.save_project(id, &ProjectState::new()).await.unwrap();
        assert!(storage.project_exists(id).await);

        storage.delete_project(id).await.unwrap();
        assert!(!storage.project_exists(id).await);
    }

    #[tokio::test]
    async fn test_corrupt_chain_aborts_load() {
        let dir = tempdir().unwrap();
        let storage = FileProjectStorage::new(dir.path());
        let id = Uuid::new_v4();

        let mut state = ProjectState::new();
        state.chain.append_version(
            "v1".to_string(),
            Author::Human,
            VersionMeta::default(),
        );
        storage.save_project(id, &state).await.unwrap();

        // Renumber the stored version to fake a gap.
        let path = dir.path().join(format!("{}.json", id));
        let text = std::fs::read_to_string(&path)
            .unwrap()
            .replace("\"number\": 1", "\"number\": 3");
        std::fs::write(&path, text).unwrap();

        let result = storage.load_project(id).await;
        assert!(matches!(
            result,
            Err(ServiceError::Revision(
                revision_engine::RevisionError::ChainIntegrity(_)
            ))
        ));
    }
}
