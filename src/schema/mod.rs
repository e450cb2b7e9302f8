//! Annotation schema: the layers a corpus defines and the roles they play.
//!
//! A [`Schema`] is immutable once built. Each layer's storage category is
//! resolved at build time and kept alongside the layer, so compiling a query
//! only ever looks categories up.
//!
//! Schemas can be assembled in code with [`Schema::builder`] or loaded from
//! TOML/JSON:
//!
//! ```toml
//! root_layer_id = "graph"
//! participant_layer_id = "who"
//! corpus_layer_id = "corpus"
//! episode_layer_id = "episode"
//!
//! [[layers]]
//! id = "corpus"
//! layer_id = -100
//!
//! [[layers]]
//! id = "participant_gender"
//! class_id = "speaker"
//! attribute = "gender"
//! parent_id = "who"
//! ```

mod layer;

pub use layer::{Alignment, Layer};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ql;
use crate::storage::{self, LayerCategory};

/// Layer id of the graph root when none is configured.
pub const DEFAULT_ROOT_LAYER_ID: &str = "graph";

/// Error type for schema loading.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read schema file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML schema: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to parse JSON schema: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Duplicate layer id: {0}")]
    DuplicateLayer(String),

    #[error("Layer '{layer}' has an attribute name ending in a lone backslash: {attribute}")]
    InvalidAttribute { layer: String, attribute: String },
}

/// The layer ids that play structural roles in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRoles {
    pub root: String,
    pub participant: Option<String>,
    pub turn: Option<String>,
    pub utterance: Option<String>,
    pub word: Option<String>,
    pub corpus: Option<String>,
    pub episode: Option<String>,
}

impl SchemaRoles {
    /// The optional roles that are set, paired with their role names.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("participant", &self.participant),
            ("turn", &self.turn),
            ("utterance", &self.utterance),
            ("word", &self.word),
            ("corpus", &self.corpus),
            ("episode", &self.episode),
        ]
        .into_iter()
        .filter_map(|(role, id)| id.as_deref().map(|id| (role, id)))
    }
}

// ============================================================================
// Schema
// ============================================================================

/// An immutable set of layers with resolved storage categories.
#[derive(Debug, Clone)]
pub struct Schema {
    layers: Vec<Layer>,
    index: HashMap<String, usize>,
    categories: HashMap<String, LayerCategory>,
    roles: SchemaRoles,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Look up a layer by id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.index.get(id).map(|&i| &self.layers[i])
    }

    /// The storage category of a layer, or `None` if the layer is unknown
    /// or has no storage mapping.
    pub fn category(&self, id: &str) -> Option<&LayerCategory> {
        self.categories.get(id)
    }

    /// All layers in declaration order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn roles(&self) -> &SchemaRoles {
        &self.roles
    }

    pub fn root_layer_id(&self) -> &str {
        &self.roles.root
    }

    pub fn participant_layer_id(&self) -> Option<&str> {
        self.roles.participant.as_deref()
    }

    pub fn turn_layer_id(&self) -> Option<&str> {
        self.roles.turn.as_deref()
    }

    pub fn utterance_layer_id(&self) -> Option<&str> {
        self.roles.utterance.as_deref()
    }

    pub fn word_layer_id(&self) -> Option<&str> {
        self.roles.word.as_deref()
    }

    pub fn corpus_layer_id(&self) -> Option<&str> {
        self.roles.corpus.as_deref()
    }

    pub fn episode_layer_id(&self) -> Option<&str> {
        self.roles.episode.as_deref()
    }

    /// Parse a schema from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = toml::from_str(source)?;
        file.into_schema()
    }

    /// Parse a schema from JSON.
    pub fn from_json_str(source: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = serde_json::from_str(source)?;
        file.into_schema()
    }

    /// Load a schema file. Files ending in `.json` are read as JSON,
    /// anything else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SchemaError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Schema`].
#[derive(Debug, Default)]
#[must_use = "builders have no effect until used"]
pub struct SchemaBuilder {
    layers: Vec<Layer>,
    root: Option<String>,
    participant: Option<String>,
    turn: Option<String>,
    utterance: Option<String>,
    word: Option<String>,
    corpus: Option<String>,
    episode: Option<String>,
}

impl SchemaBuilder {
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layers(mut self, layers: impl IntoIterator<Item = Layer>) -> Self {
        self.layers.extend(layers);
        self
    }

    pub fn root_layer(mut self, id: &str) -> Self {
        self.root = Some(id.into());
        self
    }

    pub fn participant_layer(mut self, id: &str) -> Self {
        self.participant = Some(id.into());
        self
    }

    pub fn turn_layer(mut self, id: &str) -> Self {
        self.turn = Some(id.into());
        self
    }

    pub fn utterance_layer(mut self, id: &str) -> Self {
        self.utterance = Some(id.into());
        self
    }

    pub fn word_layer(mut self, id: &str) -> Self {
        self.word = Some(id.into());
        self
    }

    pub fn corpus_layer(mut self, id: &str) -> Self {
        self.corpus = Some(id.into());
        self
    }

    pub fn episode_layer(mut self, id: &str) -> Self {
        self.episode = Some(id.into());
        self
    }

    /// Build the schema, classifying every layer.
    ///
    /// The root layer is added if no layer with its id was declared.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let roles = SchemaRoles {
            root: self
                .root
                .unwrap_or_else(|| DEFAULT_ROOT_LAYER_ID.to_string()),
            participant: self.participant,
            turn: self.turn,
            utterance: self.utterance,
            word: self.word,
            corpus: self.corpus,
            episode: self.episode,
        };

        let mut layers = Vec::with_capacity(self.layers.len() + 1);
        let mut index = HashMap::new();

        if !self.layers.iter().any(|l| l.id == roles.root) {
            index.insert(roles.root.clone(), 0);
            layers.push(Layer::new(&roles.root, "The graph itself"));
        }

        for layer in self.layers {
            if index.contains_key(&layer.id) {
                return Err(SchemaError::DuplicateLayer(layer.id));
            }
            index.insert(layer.id.clone(), layers.len());
            layers.push(layer);
        }

        for layer in &layers {
            if let Some(parent) = &layer.parent_id {
                if !index.contains_key(parent) {
                    log::warn!("layer '{}' names unknown parent '{}'", layer.id, parent);
                }
            }
        }
        for (role, id) in roles.named() {
            if !index.contains_key(id) {
                log::warn!("{} layer '{}' is not defined in the schema", role, id);
            }
        }

        let mut categories = HashMap::new();
        for layer in &layers {
            match storage::classify(layer, &roles) {
                Some(category) => {
                    if let Some(attribute) = category.attribute() {
                        if !ql::is_quotable(attribute) {
                            return Err(SchemaError::InvalidAttribute {
                                layer: layer.id.clone(),
                                attribute: attribute.to_string(),
                            });
                        }
                    }
                    log::trace!("layer '{}' stored as {}", layer.id, category.name());
                    categories.insert(layer.id.clone(), category);
                }
                None => log::warn!("layer '{}' has no storage mapping", layer.id),
            }
        }

        Ok(Schema {
            layers,
            index,
            categories,
            roles,
        })
    }
}

// ============================================================================
// File format
// ============================================================================

/// On-disk schema representation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
struct SchemaFile {
    root_layer_id: Option<String>,
    participant_layer_id: Option<String>,
    turn_layer_id: Option<String>,
    utterance_layer_id: Option<String>,
    word_layer_id: Option<String>,
    corpus_layer_id: Option<String>,
    episode_layer_id: Option<String>,
    layers: Vec<Layer>,
}

impl SchemaFile {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        let mut builder = Schema::builder().layers(self.layers);
        if let Some(id) = &self.root_layer_id {
            builder = builder.root_layer(id);
        }
        if let Some(id) = &self.participant_layer_id {
            builder = builder.participant_layer(id);
        }
        if let Some(id) = &self.turn_layer_id {
            builder = builder.turn_layer(id);
        }
        if let Some(id) = &self.utterance_layer_id {
            builder = builder.utterance_layer(id);
        }
        if let Some(id) = &self.word_layer_id {
            builder = builder.word_layer(id);
        }
        if let Some(id) = &self.corpus_layer_id {
            builder = builder.corpus_layer(id);
        }
        if let Some(id) = &self.episode_layer_id {
            builder = builder.episode_layer(id);
        }
        builder.build()
    }
}
