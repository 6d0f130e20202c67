//! Kind → renderer lookup.
//!
//! The built-in registry is assembled once per process by a total match on
//! [`CellKind`], so adding a kind without a renderer fails to compile.
//! Custom registries (tests, embedders swapping a renderer) start from
//! [`RendererRegistry::new`] and register kinds one at a time.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use koshi_types::CellKind;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::error::GridError;
use crate::renderer::{self, CellRenderer};

/// The renderer for every built-in kind.
pub fn builtin_renderer(kind: CellKind) -> CellRenderer {
    match kind {
        CellKind::Text => renderer::text::RENDERER,
        CellKind::Link => renderer::link::RENDERER,
        CellKind::Number => renderer::number::RENDERER,
        CellKind::Select => renderer::select::RENDERER,
        CellKind::Image => renderer::image::RENDERER,
        CellKind::Chart => renderer::chart::RENDERER,
        CellKind::Rating => renderer::rating::RENDERER,
        CellKind::Boolean => renderer::boolean::RENDERER,
        CellKind::Loading => renderer::loading::RENDERER,
    }
}

static BUILTIN: LazyLock<Arc<RendererRegistry>> =
    LazyLock::new(|| Arc::new(RendererRegistry::builtin()));

/// Shared read-only registry holding all built-in renderers.
pub fn builtin_registry() -> Arc<RendererRegistry> {
    Arc::clone(&BUILTIN)
}

/// Maps each cell kind to exactly one renderer.
#[derive(Debug, Default, Clone)]
pub struct RendererRegistry {
    renderers: HashMap<CellKind, CellRenderer>,
}

impl RendererRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh registry with every built-in renderer.
    pub fn builtin() -> Self {
        let renderers = CellKind::iter().map(|k| (k, builtin_renderer(k))).collect();
        Self { renderers }
    }

    /// Register the renderer for `kind`.
    ///
    /// A kind can be registered once, and only with a renderer for that kind.
    pub fn register(&mut self, kind: CellKind, renderer: CellRenderer) -> Result<(), GridError> {
        if renderer.kind != kind {
            return Err(GridError::RendererKindMismatch {
                key: kind,
                renderer: renderer.kind,
            });
        }
        if self.renderers.contains_key(&kind) {
            return Err(GridError::DuplicateRenderer(kind));
        }
        debug!(%kind, "renderer registered");
        self.renderers.insert(kind, renderer);
        Ok(())
    }

    /// Swap the renderer for an already registered kind.
    pub fn replace(&mut self, renderer: CellRenderer) -> Result<CellRenderer, GridError> {
        let slot = self
            .renderers
            .get_mut(&renderer.kind)
            .ok_or(GridError::UnknownCellKind(renderer.kind))?;
        debug!(kind = %renderer.kind, "renderer replaced");
        Ok(std::mem::replace(slot, renderer))
    }

    pub fn resolve(&self, kind: CellKind) -> Result<&CellRenderer, GridError> {
        self.renderers.get(&kind).ok_or(GridError::UnknownCellKind(kind))
    }

    pub fn contains(&self, kind: CellKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn test_builtin_covers_every_kind() {
        let registry = builtin_registry();
        assert_eq!(registry.len(), CellKind::COUNT);
        for kind in CellKind::iter() {
            assert_eq!(registry.resolve(kind).unwrap().kind, kind);
        }
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&builtin_registry(), &builtin_registry()));
    }

    #[test]
    fn test_empty_registry_fails_resolve() {
        let registry = RendererRegistry::new();
        assert_eq!(
            registry.resolve(CellKind::Chart).unwrap_err(),
            GridError::UnknownCellKind(CellKind::Chart)
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = RendererRegistry::new();
        registry.register(CellKind::Text, renderer::text::RENDERER).unwrap();
        assert_eq!(
            registry.register(CellKind::Text, renderer::text::RENDERER),
            Err(GridError::DuplicateRenderer(CellKind::Text))
        );
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut registry = RendererRegistry::new();
        assert_eq!(
            registry.register(CellKind::Number, renderer::text::RENDERER),
            Err(GridError::RendererKindMismatch {
                key: CellKind::Number,
                renderer: CellKind::Text,
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replace_existing_only() {
        let mut registry = RendererRegistry::builtin();
        let quiet = CellRenderer {
            needs_hover: false,
            needs_hover_position: false,
            ..renderer::link::RENDERER
        };
        let old = registry.replace(quiet).unwrap();
        assert!(old.needs_hover);
        assert!(!registry.resolve(CellKind::Link).unwrap().needs_hover);

        let mut empty = RendererRegistry::new();
        assert!(empty.replace(quiet).is_err());
    }
}
