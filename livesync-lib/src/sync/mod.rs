//! Reflecting edited markup and stylesheet text into a target document.

pub mod content;
pub mod registry;
pub mod styles;

pub use content::synchronize_content;
pub use registry::{StyleContainer, StyleRegistry, MANAGED_ATTRIBUTE};
pub use styles::synchronize_styles;

use crate::config::PreviewConfig;
use crate::dom::Document;
use crate::error::SyncError;
use std::rc::Rc;

/// Both synchronizers behind one handle, sharing a style registry.
#[derive(Debug, Default)]
pub struct LivePreview {
    registry: StyleRegistry,
    config: PreviewConfig,
}

impl LivePreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PreviewConfig) -> Self {
        LivePreview {
            registry: StyleRegistry::new(),
            config,
        }
    }

    /// Replace the content of `document` with `markup`.
    pub fn synchronize_content(&self, document: &Document, markup: &str) -> Result<(), SyncError> {
        synchronize_content(document, markup)
    }

    /// Replace the managed rules of `document` with the rules of `css`.
    pub fn synchronize_styles(
        &mut self,
        document: &Rc<Document>,
        css: &str,
    ) -> Result<(), SyncError> {
        synchronize_styles(&mut self.registry, document, css, self.config.rule_failure)
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StyleRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }
}
