//! Renderer registry.

use std::collections::HashMap;

use wireframe_core::{Appearance, AppearanceLookup};

use crate::control::Control;
use crate::plugin::ShapePlugin;

/// Maps renderer keys to registered plugins.
///
/// Fill it once at startup, then share it by reference.
#[derive(Debug, Clone, Default)]
pub struct RendererService {
    controls: HashMap<String, Control>,
}

impl RendererService {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under its identifier, replacing any previous one.
    pub fn add<P: ShapePlugin + 'static>(&mut self, plugin: P) -> &mut Self {
        let control = Control::new(plugin);
        let id = control.identifier().to_string();
        if self.controls.insert(id.clone(), control).is_some() {
            tracing::warn!(renderer = %id, "Renderer registered twice, replacing");
        } else {
            tracing::debug!(renderer = %id, "Renderer registered");
        }
        self
    }

    /// Look up a plugin.
    #[must_use]
    pub fn get(&self, renderer: &str) -> Option<&Control> {
        self.controls.get(renderer)
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

impl AppearanceLookup for RendererService {
    fn default_appearance(&self, renderer: &str) -> Option<Appearance> {
        self.get(renderer).map(Control::default_appearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::RenderContext;
    use serde_json::json;
    use wireframe_core::Vec2;

    struct Named(&'static str);

    impl ShapePlugin for Named {
        fn identifier(&self) -> &str {
            self.0
        }

        fn default_appearance(&self) -> Appearance {
            Appearance::from([("fill".to_string(), json!("#fff"))])
        }

        fn default_size(&self) -> Vec2 {
            Vec2::new(10.0, 10.0)
        }

        fn render(&self, _ctx: &mut RenderContext<'_>) {}
    }

    #[test]
    fn test_lookup_by_identifier() {
        let mut registry = RendererService::new();
        registry.add(Named("B")).add(Named("A"));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("A").is_some());
        assert!(registry.get("C").is_none());
        assert_eq!(registry.get("B").map(Control::identifier), Some("B"));
    }

    #[test]
    fn test_registry_is_appearance_lookup() {
        let mut registry = RendererService::new();
        registry.add(Named("A"));

        let defaults = registry.default_appearance("A").expect("defaults");
        assert!(defaults.contains_key("fill"));
        assert!(registry.default_appearance("B").is_none());
    }
}
