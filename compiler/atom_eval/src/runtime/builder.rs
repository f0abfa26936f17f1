//! Runtime configuration.

use std::path::PathBuf;
use std::sync::Arc;

use atom_lexer::{Syntax, DEFAULT_MAX_LOAD_DEPTH};

use super::Runtime;
use crate::host::{std_module, HostBridge, HostRegistry};
use crate::{DispatchMode, Observer, RuntimeError};

/// Default limit on nested list evaluation.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100_000;

/// Settings shared by a runtime and its interpreter.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Directory `code` and `load-file` resolve relative paths against.
    pub base_dir: PathBuf,
    pub syntax: Syntax,
    pub dispatch: DispatchMode,
    pub max_load_depth: usize,
    /// `None` disables the limit.
    pub max_call_depth: Option<usize>,
    pub bridge: Arc<dyn HostBridge>,
    /// Host vocabulary imported at construction: (module, namespaces).
    pub references: Vec<(String, Vec<String>)>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            base_dir: PathBuf::from("."),
            syntax: Syntax::default(),
            dispatch: DispatchMode::default(),
            max_load_depth: DEFAULT_MAX_LOAD_DEPTH,
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            bridge: Arc::new(HostRegistry::new().with_module(std_module())),
            references: vec![("core".to_string(), vec!["System".to_string()])],
        }
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("base_dir", &self.base_dir)
            .field("syntax", &self.syntax)
            .field("dispatch", &self.dispatch)
            .field("max_load_depth", &self.max_load_depth)
            .field("max_call_depth", &self.max_call_depth)
            .field("references", &self.references)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Runtime`].
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = dir.into();
        self
    }

    #[must_use]
    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.config.syntax = syntax;
        self
    }

    #[must_use]
    pub fn dispatch(mut self, mode: DispatchMode) -> Self {
        self.config.dispatch = mode;
        self
    }

    #[must_use]
    pub fn max_load_depth(mut self, depth: usize) -> Self {
        self.config.max_load_depth = depth;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    /// Replace the host backend.
    #[must_use]
    pub fn bridge(mut self, bridge: Arc<dyn HostBridge>) -> Self {
        self.config.bridge = bridge;
        self
    }

    /// Use a host registry as the backend.
    #[must_use]
    pub fn registry(self, registry: HostRegistry) -> Self {
        self.bridge(Arc::new(registry))
    }

    /// Also import `namespaces` of `module` at construction.
    #[must_use]
    pub fn reference(mut self, module: &str, namespaces: &[&str]) -> Self {
        self.config.references.push((
            module.to_string(),
            namespaces.iter().map(ToString::to_string).collect(),
        ));
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn build(self) -> Result<(Runtime, Observer), RuntimeError> {
        Runtime::with_config(self.config)
    }
}
