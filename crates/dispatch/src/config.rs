//! Reducer configuration
//!
//! [`ReducerConfig`] carries everything a [`Reducer`](crate::Reducer) is
//! built from: the action-type namespace, the creator and merger, per-type
//! overrides, reducers for custom type strings, the extras every initial state starts with, and the entity
//! key `UPDATE_NORMALIZED` reads.
//!
//! The plain-data part of that is [`ReducerSettings`], which can be loaded
//! from TOML:
//!
//! ```toml
//! prefix = "USERS_"
//! suffix = ""
//! entity_key = "users"
//!
//! [default_extras]
//! loading = false
//! ```

use crate::action::ActionType;
use crate::factories::ActionReducer;
use normal_core::{Error, Extras, Record, Result, ShallowMerge};
use normal_reducers::{Creator, Merger};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Namespace
// ============================================================================

/// Prefix and suffix wrapped around every action type string
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Prepended to the type string
    #[serde(default)]
    pub prefix: String,
    /// Appended to the type string
    #[serde(default)]
    pub suffix: String,
}

impl Namespace {
    /// Create a namespace
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Namespace {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Namespace with only a prefix
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self::new(prefix, "")
    }

    /// The namespaced type string for `action_type`
    pub fn apply(&self, action_type: ActionType) -> String {
        format!("{}{}{}", self.prefix, action_type.as_str(), self.suffix)
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Serializable reducer settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReducerSettings {
    /// Action type prefix
    #[serde(default)]
    pub prefix: String,
    /// Action type suffix
    #[serde(default)]
    pub suffix: String,
    /// Entity type read by `UPDATE_NORMALIZED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_key: Option<String>,
    /// Keys every initial state starts with
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub default_extras: Extras,
}

impl ReducerSettings {
    /// Parse settings from a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document does not parse.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse reducer settings: {}", e)))
    }

    /// Serialize to a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if an extra has no TOML representation (null).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize reducer settings: {}", e)))
    }

    /// The namespace these settings describe
    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.prefix.clone(), self.suffix.clone())
    }
}

// ============================================================================
// Config
// ============================================================================

/// Everything a [`Reducer`](crate::Reducer) is built from
pub struct ReducerConfig<R> {
    namespace: Namespace,
    creator: Creator<R>,
    merger: Merger<R>,
    overrides: FxHashMap<ActionType, ActionReducer<R>>,
    customs: FxHashMap<String, ActionReducer<R>>,
    default_extras: Extras,
    entity_key: Option<String>,
}

impl<R: Record + ShallowMerge + 'static> Default for ReducerConfig<R> {
    fn default() -> Self {
        Self::with_functions(Creator::identity(), Merger::shallow())
    }
}

impl<R: Record> ReducerConfig<R> {
    /// Config with an explicit creator and merger, for records without
    /// [`ShallowMerge`]
    pub fn with_functions(creator: Creator<R>, merger: Merger<R>) -> Self {
        ReducerConfig {
            namespace: Namespace::default(),
            creator,
            merger,
            overrides: FxHashMap::default(),
            customs: FxHashMap::default(),
            default_extras: Extras::new(),
            entity_key: None,
        }
    }
}

impl<R: Record + ShallowMerge + 'static> ReducerConfig<R> {
    /// Identity creator, shallow merger, no namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Config from loaded settings, with the default creator and merger
    pub fn from_settings(settings: ReducerSettings) -> Self {
        ReducerConfig {
            namespace: Namespace::new(settings.prefix, settings.suffix),
            default_extras: settings.default_extras,
            entity_key: settings.entity_key,
            ..Self::default()
        }
    }
}

impl<R> ReducerConfig<R> {
    /// Set the action type prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace.prefix = prefix.into();
        self
    }

    /// Set the action type suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.namespace.suffix = suffix.into();
        self
    }

    /// Set prefix and suffix at once
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Set the creator used by `CREATE*`
    pub fn with_creator(mut self, creator: Creator<R>) -> Self {
        self.creator = creator;
        self
    }

    /// Set the merger used by `MERGE*` and `ADD_OR_MERGE*`
    pub fn with_merger(mut self, merger: Merger<R>) -> Self {
        self.merger = merger;
        self
    }

    /// Handle `action_type` with `reducer` instead of the built-in behavior
    pub fn with_override(mut self, action_type: ActionType, reducer: ActionReducer<R>) -> Self {
        self.overrides.insert(action_type, reducer);
        self
    }

    /// Handle the full type string `kind` with `reducer`
    ///
    /// `kind` is matched as given, without the namespace. A custom type
    /// that equals a built-in type string takes precedence over it.
    pub fn with_custom(mut self, kind: impl Into<String>, reducer: ActionReducer<R>) -> Self {
        self.customs.insert(kind.into(), reducer);
        self
    }

    /// Add a key every initial state starts with
    pub fn with_default_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_extras.insert(key.into(), value.into());
        self
    }

    /// Set the entity type `UPDATE_NORMALIZED` reads
    pub fn with_entity_key(mut self, entity_key: impl Into<String>) -> Self {
        self.entity_key = Some(entity_key.into());
        self
    }

    /// The action type namespace
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The creator
    pub fn creator(&self) -> &Creator<R> {
        &self.creator
    }

    /// The merger
    pub fn merger(&self) -> &Merger<R> {
        &self.merger
    }

    /// The override registered for `action_type`, if any
    pub fn override_for(&self, action_type: ActionType) -> Option<&ActionReducer<R>> {
        self.overrides.get(&action_type)
    }

    /// The custom reducer registered for the type string `kind`, if any
    pub fn custom_for(&self, kind: &str) -> Option<&ActionReducer<R>> {
        self.customs.get(kind)
    }

    /// Extras every initial state starts with
    pub fn default_extras(&self) -> &Extras {
        &self.default_extras
    }

    /// Entity type for `UPDATE_NORMALIZED`
    pub fn entity_key(&self) -> Option<&str> {
        self.entity_key.as_deref()
    }

    /// The serializable part of this config
    pub fn settings(&self) -> ReducerSettings {
        ReducerSettings {
            prefix: self.namespace.prefix.clone(),
            suffix: self.namespace.suffix.clone(),
            entity_key: self.entity_key.clone(),
            default_extras: self.default_extras.clone(),
        }
    }
}

impl<R> Clone for ReducerConfig<R> {
    fn clone(&self) -> Self {
        ReducerConfig {
            namespace: self.namespace.clone(),
            creator: self.creator.clone(),
            merger: self.merger.clone(),
            overrides: self.overrides.clone(),
            customs: self.customs.clone(),
            default_extras: self.default_extras.clone(),
            entity_key: self.entity_key.clone(),
        }
    }
}

impl<R> std::fmt::Debug for ReducerConfig<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut overridden: Vec<&ActionType> = self.overrides.keys().collect();
        overridden.sort();
        let mut customs: Vec<&String> = self.customs.keys().collect();
        customs.sort();
        f.debug_struct("ReducerConfig")
            .field("namespace", &self.namespace)
            .field("creator", &self.creator)
            .field("merger", &self.merger)
            .field("overrides", &overridden)
            .field("customs", &customs)
            .field("default_extras", &self.default_extras)
            .field("entity_key", &self.entity_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use normal_core::Entity;
    use serde_json::json;

    #[test]
    fn test_namespace_apply() {
        assert_eq!(Namespace::default().apply(ActionType::Add), "ADD");
        assert_eq!(Namespace::prefixed("USERS_").apply(ActionType::AddAll), "USERS_ADD_ALL");
        assert_eq!(Namespace::new("", "_POSTS").apply(ActionType::Move), "MOVE_POSTS");
    }

    #[test]
    fn test_builders() {
        let config: ReducerConfig<Entity> = ReducerConfig::new()
            .with_prefix("P_")
            .with_suffix("_S")
            .with_default_extra("loading", false)
            .with_entity_key("users");
        assert_eq!(config.namespace(), &Namespace::new("P_", "_S"));
        assert_eq!(config.default_extras().get("loading"), Some(&json!(false)));
        assert_eq!(config.entity_key(), Some("users"));
        assert_eq!(config.creator().name(), "identity");
        assert_eq!(config.merger().name(), "shallow");
        assert!(config.override_for(ActionType::Add).is_none());
    }

    #[test]
    fn test_custom_types_are_matched_verbatim() {
        let noop = ActionReducer::<Entity>::new(|state, _action| Ok(state.clone()));
        let config = ReducerConfig::new().with_prefix("USERS_").with_custom("USERS_RESET", noop);
        assert!(config.custom_for("USERS_RESET").is_some());
        assert!(config.custom_for("RESET").is_none());
        assert!(format!("{:?}", config.clone()).contains("USERS_RESET"));
    }

    #[test]
    fn test_with_functions_starts_empty() {
        let config: ReducerConfig<Entity> = ReducerConfig::with_functions(
            Creator::new("stamp", |e: Entity| e.with("stamped", true)),
            Merger::new("keep", |old: &Entity, _patch: &Entity| old.clone()),
        );
        assert_eq!(config.creator().name(), "stamp");
        assert_eq!(config.merger().name(), "keep");
        assert_eq!(config.settings(), ReducerSettings::default());
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = ReducerSettings::from_toml(
            r#"
prefix = "USERS_"
entity_key = "users"

[default_extras]
loading = false
page = 1
"#,
        )
        .unwrap();
        assert_eq!(settings.prefix, "USERS_");
        assert_eq!(settings.suffix, "");
        assert_eq!(settings.entity_key.as_deref(), Some("users"));
        assert_eq!(settings.default_extras.get("page"), Some(&json!(1)));

        let config: ReducerConfig<Entity> = ReducerConfig::from_settings(settings.clone());
        assert_eq!(config.settings(), settings);
    }

    #[test]
    fn test_settings_empty_toml_is_default() {
        assert_eq!(ReducerSettings::from_toml("").unwrap(), ReducerSettings::default());
    }

    #[test]
    fn test_settings_bad_toml_is_config_error() {
        let err = ReducerSettings::from_toml("prefix = [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = ReducerSettings::from_toml("prefix = 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_settings_toml_roundtrip() {
        let settings = ReducerSettings {
            prefix: "A_".into(),
            suffix: "_B".into(),
            entity_key: None,
            default_extras: Extras::new(),
        };
        let text = settings.to_toml().unwrap();
        assert_eq!(ReducerSettings::from_toml(&text).unwrap(), settings);
        assert_eq!(settings.namespace().apply(ActionType::Remove), "A_REMOVE_B");
    }
}
