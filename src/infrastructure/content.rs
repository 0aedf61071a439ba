//! Content store implementations - authored quest/scene catalogs
//!
//! Authored content arrives as plain JSON (`quests.json` + `scenes.json`),
//! deserialized and validated once at load time. After that every lookup is
//! a pure in-memory read.

use crate::domain::entities::{QuestDefinition, SceneDefinition};
use crate::domain::repositories::ContentStore;
use crate::domain::value_objects::{QuestId, SceneId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors raised while loading authored content
#[derive(Debug, thiserror::Error)]
pub enum ContentLoadError {
    #[error("Content file not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid content: {message}")]
    Invalid { message: String },
}

/// Fully loaded, index-backed content store
///
/// Construction rejects duplicate ids; deeper graph validation (dangling
/// transition targets) is the progression service's job and runs when an
/// engine is built on top of this store.
pub struct InMemoryContentStore {
    quests: Vec<QuestDefinition>,
    scenes: Vec<SceneDefinition>,
    quest_index: HashMap<QuestId, usize>,
    scene_index: HashMap<SceneId, usize>,
    digest: String,
}

impl InMemoryContentStore {
    pub fn new(
        quests: Vec<QuestDefinition>,
        scenes: Vec<SceneDefinition>,
    ) -> Result<Self, ContentLoadError> {
        let mut quest_index = HashMap::new();
        for (position, quest) in quests.iter().enumerate() {
            if quest_index.insert(quest.id, position).is_some() {
                return Err(ContentLoadError::Invalid {
                    message: format!("duplicate quest id {}", quest.id),
                });
            }
        }

        let mut scene_index = HashMap::new();
        for (position, scene) in scenes.iter().enumerate() {
            if scene.id.is_terminal() {
                return Err(ContentLoadError::Invalid {
                    message: format!("scene id '{}' is reserved as a terminal sentinel", scene.id),
                });
            }
            if scene_index.insert(scene.id.clone(), position).is_some() {
                return Err(ContentLoadError::Invalid {
                    message: format!("duplicate scene id '{}'", scene.id),
                });
            }
        }

        let digest = Self::fingerprint(&quests, &scenes)?;
        Ok(Self {
            quests,
            scenes,
            quest_index,
            scene_index,
            digest,
        })
    }

    /// Load `quests.json` and `scenes.json` from a content directory
    pub async fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, ContentLoadError> {
        let dir = dir.as_ref();
        let quests: Vec<QuestDefinition> = Self::read_json(dir.join("quests.json")).await?;
        let scenes: Vec<SceneDefinition> = Self::read_json(dir.join("scenes.json")).await?;
        log::debug!(
            "loaded {} quests and {} scenes from {}",
            quests.len(),
            scenes.len(),
            dir.display()
        );
        Self::new(quests, scenes)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        path: PathBuf,
    ) -> Result<T, ContentLoadError> {
        if !path.exists() {
            return Err(ContentLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ContentLoadError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&raw).map_err(|e| ContentLoadError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// md5 over the canonical JSON of the whole catalog. Stored inside save
    /// envelopes so a snapshot cannot be restored against content whose
    /// scene ids it no longer matches.
    fn fingerprint(
        quests: &[QuestDefinition],
        scenes: &[SceneDefinition],
    ) -> Result<String, ContentLoadError> {
        let canonical =
            serde_json::to_string(&(quests, scenes)).map_err(|e| ContentLoadError::Invalid {
                message: format!("content not serializable: {e}"),
            })?;
        Ok(format!("{:x}", md5::compute(canonical.as_bytes())))
    }
}

impl ContentStore for InMemoryContentStore {
    fn quest(&self, id: QuestId) -> Option<&QuestDefinition> {
        self.quest_index.get(&id).map(|&position| &self.quests[position])
    }

    fn scene(&self, id: &SceneId) -> Option<&SceneDefinition> {
        self.scene_index.get(id).map(|&position| &self.scenes[position])
    }

    fn list_quests(&self) -> &[QuestDefinition] {
        &self.quests
    }

    fn list_scenes(&self) -> &[SceneDefinition] {
        &self.scenes
    }

    fn digest(&self) -> &str {
        &self.digest
    }
}
