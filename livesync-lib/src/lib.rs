//! Live preview synchronization for markup and stylesheet text.
//!
//! A [`LivePreview`] reflects edited HTML into the `<body>` of a target
//! [`Document`] and edited CSS into a single managed `<style>` element in its
//! `<head>`, replacing the previous content and rules on every call.

pub mod config;
pub mod dom;
pub mod error;
pub mod parser;
pub mod preview;
pub mod style;
pub mod sync;

pub use config::{PreviewConfig, RuleFailurePolicy};
pub use dom::{Document, NodeRef};
pub use error::{DomError, RuleError, SyncError};
pub use preview::PreviewSession;
pub use style::{CssRule, RuleSet, StyleSheet};
pub use sync::{
    synchronize_content, synchronize_styles, LivePreview, StyleContainer, StyleRegistry,
};
