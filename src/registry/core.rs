use std::collections::{HashMap, HashSet};

use blake3::Hash;

use crate::error::{MawError, Result};
use crate::geometry::Rect;

pub type ZoneId = String;

/// Rendered payload held for a zone, one line per terminal row.
pub type ZoneContent = String;

/// Last known rect and content for a single zone.
#[derive(Debug, Clone)]
pub struct ZoneState {
    pub rect: Rect,
    pub content: ZoneContent,
    digest: Option<Hash>,
    pub is_dirty: bool,
}

impl ZoneState {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            content: ZoneContent::new(),
            digest: None,
            is_dirty: true,
        }
    }

    /// Stores `content`, marking the zone dirty only when the payload
    /// actually changed.
    fn update_content(&mut self, content: ZoneContent) {
        let digest = blake3::hash(content.as_bytes());
        if self.digest != Some(digest) {
            self.content = content;
            self.digest = Some(digest);
            self.is_dirty = true;
        }
    }
}

/// Tracks zone rects and contents between layout passes so the renderer
/// only repaints what changed.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    zones: HashMap<ZoneId, ZoneState>,
    dirty: HashSet<ZoneId>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile against a freshly solved layout: moved or new zones become
    /// dirty, zones absent from the solution are dropped.
    pub fn sync_layout(&mut self, solved: &HashMap<ZoneId, Rect>) {
        self.zones.retain(|id, _| solved.contains_key(id));
        self.dirty.retain(|id| solved.contains_key(id));

        for (id, rect) in solved {
            match self.zones.get_mut(id) {
                Some(state) => {
                    if state.rect != *rect {
                        state.rect = *rect;
                        state.is_dirty = true;
                        self.dirty.insert(id.clone());
                    }
                }
                None => {
                    self.zones.insert(id.clone(), ZoneState::new(*rect));
                    self.dirty.insert(id.clone());
                }
            }
        }
    }

    pub fn apply_content(&mut self, zone_id: &str, content: ZoneContent) -> Result<()> {
        let state = self
            .zones
            .get_mut(zone_id)
            .ok_or_else(|| MawError::ZoneNotFound(zone_id.to_string()))?;
        state.update_content(content);
        if state.is_dirty {
            self.dirty.insert(zone_id.to_string());
        }
        Ok(())
    }

    /// Drain the dirty set, clearing per-zone flags as states are handed out.
    pub fn take_dirty(&mut self) -> Vec<(ZoneId, ZoneState)> {
        let ids: Vec<_> = self.dirty.drain().collect();
        ids.into_iter()
            .filter_map(|id| {
                self.zones.get_mut(&id).map(|state| {
                    state.is_dirty = false;
                    (id.clone(), state.clone())
                })
            })
            .collect()
    }

    pub fn rect_of(&self, zone_id: &str) -> Option<Rect> {
        self.zones.get(zone_id).map(|state| state.rect)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved(entries: &[(&str, Rect)]) -> HashMap<ZoneId, Rect> {
        entries
            .iter()
            .map(|(id, rect)| (id.to_string(), *rect))
            .collect()
    }

    #[test]
    fn new_zones_start_dirty() {
        let mut registry = ZoneRegistry::new();
        registry.sync_layout(&solved(&[("tabs", Rect::new(0, 0, 20, 2))]));

        let dirty = registry.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].0, "tabs");
        assert!(!registry.has_dirty());
    }

    #[test]
    fn unchanged_content_stays_clean() {
        let mut registry = ZoneRegistry::new();
        registry.sync_layout(&solved(&[("page", Rect::new(0, 2, 20, 8))]));
        registry.take_dirty();

        registry.apply_content("page", "hello".into()).unwrap();
        assert_eq!(registry.take_dirty().len(), 1);

        registry.apply_content("page", "hello".into()).unwrap();
        assert!(registry.take_dirty().is_empty());
    }

    #[test]
    fn moved_zone_becomes_dirty_again() {
        let mut registry = ZoneRegistry::new();
        registry.sync_layout(&solved(&[("page", Rect::new(0, 0, 20, 8))]));
        registry.take_dirty();

        registry.sync_layout(&solved(&[("page", Rect::new(0, 4, 20, 8))]));
        assert!(registry.has_dirty());
    }

    #[test]
    fn dropped_zones_are_forgotten() {
        let mut registry = ZoneRegistry::new();
        registry.sync_layout(&solved(&[
            ("tabs", Rect::new(0, 0, 20, 2)),
            ("page", Rect::new(0, 2, 20, 8)),
        ]));
        registry.take_dirty();

        registry.sync_layout(&solved(&[("tabs", Rect::new(0, 0, 20, 2))]));
        assert!(registry.rect_of("page").is_none());
        assert!(
            registry
                .apply_content("page", "gone".into())
                .is_err()
        );
    }
}
