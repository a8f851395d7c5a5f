//! A sandboxed preview surface that is re-synchronized on demand.

use crate::config::PreviewConfig;
use crate::dom::Document;
use crate::error::SyncError;
use crate::parser::serialize_document;
use crate::sync::LivePreview;
use std::rc::Rc;

/// Markup of the built-in demo page.
pub const DEMO_HTML: &str = r#"<main class="orbit">
  <div class="planet"></div>
  <div class="moon"></div>
</main>"#;

/// Stylesheet of the built-in demo page.
pub const DEMO_CSS: &str = r#"body {
  margin: 0;
  background: #0b0d17;
}

.orbit {
  position: relative;
  width: 100vw;
  height: 100vh;
}

.planet {
  position: absolute;
  top: 50%;
  left: 50%;
  width: 120px;
  height: 120px;
  border-radius: 50%;
  background: radial-gradient(circle at 30% 30%, #7fd1ff, #1b4f8c);
  transform: translate(-50%, -50%);
}

.moon {
  position: absolute;
  top: 50%;
  left: 50%;
  width: 24px;
  height: 24px;
  border-radius: 50%;
  background: #d8d8d8;
  animation: circle 6s linear infinite;
}

@keyframes circle {
  from { transform: rotate(0deg) translateX(110px) rotate(0deg); }
  to { transform: rotate(360deg) translateX(110px) rotate(-360deg); }
}"#;

/// Owns a preview document and the synchronizer that feeds it.
///
/// [`apply`](PreviewSession::apply) only touches the side whose text changed
/// since the last successful apply.
#[derive(Debug)]
pub struct PreviewSession {
    document: Rc<Document>,
    preview: LivePreview,
    last_html: Option<String>,
    last_css: Option<String>,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::with_config(PreviewConfig::default())
    }

    pub fn with_config(config: PreviewConfig) -> Self {
        PreviewSession {
            document: Document::create_html_document(Some("Preview")),
            preview: LivePreview::with_config(config),
            last_html: None,
            last_css: None,
        }
    }

    /// Synchronize `html` and `css` into the preview document.
    pub fn apply(&mut self, html: &str, css: &str) -> Result<(), SyncError> {
        if self.last_html.as_deref() != Some(html) {
            self.preview.synchronize_content(&self.document, html)?;
            self.last_html = Some(html.to_owned());
        } else {
            log::trace!("markup unchanged, content left as is");
        }

        if self.last_css.as_deref() != Some(css) {
            self.preview.synchronize_styles(&self.document, css)?;
            self.last_css = Some(css.to_owned());
        } else {
            log::trace!("stylesheet unchanged, rules left as is");
        }
        Ok(())
    }

    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }

    pub fn preview(&self) -> &LivePreview {
        &self.preview
    }

    /// The preview document as HTML.
    pub fn render(&self) -> String {
        serialize_document(&self.document)
    }

    /// Serialized text of the rules currently in the managed container.
    pub fn active_rules(&self) -> Vec<String> {
        self.preview
            .registry()
            .get(&self.document)
            .and_then(|container| container.sheet())
            .map(|sheet| sheet.rule_texts())
            .unwrap_or_default()
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn demo_page_applies_cleanly() {
        let mut session = PreviewSession::new();
        session.apply(DEMO_HTML, DEMO_CSS).unwrap();

        let rules = session.active_rules();
        assert_eq!(rules.len(), 5);
        assert_eq!(rules[0], "body{margin:0;background:#0b0d17}");
        assert!(rules[4].starts_with("@keyframes circle"));
        assert!(session.render().contains(r#"<div class="moon"></div>"#));
    }

    #[test]
    fn failed_styles_are_retried() {
        let mut session = PreviewSession::new();

        assert!(session.apply("<p>x</p>", "]bad[ a{}").is_err());
        assert!(session.active_rules().is_empty());

        // The markup was recorded, the stylesheet was not.
        assert!(session.apply("<p>x</p>", "a{color:red}").is_ok());
        assert_eq!(session.active_rules(), ["a{color:red}"]);
    }
}
