use std::sync::Arc;

use crate::art::{ArtProvider, TabContent};
use crate::error::{MawError, Result};
use crate::geometry::{Rect, Size};
use crate::layout::Direction;
use crate::registry::ZoneContent;
use crate::style::NbStyle;
use crate::surface::Surface;

/// Kind of widget a child control is mounted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    NoteBook,
    Root,
}

impl ParentKind {
    fn name(&self) -> &'static str {
        match self {
            ParentKind::NoteBook => "notebook",
            ParentKind::Root => "root",
        }
    }
}

const DEFAULT_MAX_TAB: Size = Size {
    width: 18,
    height: 3,
};

/// Tab strip control. Owns no page data; it reads the notebook's page list
/// at paint time and delegates per-tab drawing to the art provider.
pub struct TabContainer {
    art: Arc<dyn ArtProvider>,
    max_tab_size: Size,
    hit_rects: Vec<Rect>,
}

impl std::fmt::Debug for TabContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabContainer")
            .field("max_tab_size", &self.max_tab_size)
            .field("hit_rects", &self.hit_rects)
            .finish_non_exhaustive()
    }
}

impl TabContainer {
    /// Only meaningful under a notebook; any other parent kind is rejected.
    pub fn new(parent: ParentKind, art: Arc<dyn ArtProvider>) -> Result<Self> {
        if parent != ParentKind::NoteBook {
            return Err(MawError::InvalidParent {
                found: parent.name().to_string(),
            });
        }

        Ok(Self {
            art,
            max_tab_size: DEFAULT_MAX_TAB,
            hit_rects: Vec::new(),
        })
    }

    /// Bound on the space offered to the art provider per tab.
    pub fn set_max_tab_size(&mut self, size: Size) {
        self.max_tab_size = size;
    }

    pub fn max_tab_size(&self) -> Size {
        self.max_tab_size
    }

    /// Minimum size of the container itself: one max-size tab must fit.
    pub fn min_size(&self) -> Size {
        self.max_tab_size
    }

    /// Paint the strip for `area`, packing tabs along `axis` from the
    /// origin. Every consumed rect reported by the art provider is clamped
    /// to its offer before the cursor advances, so a misreporting provider
    /// cannot desync the packing. Consumed rects are cached for
    /// [`Self::hit_test`].
    pub fn paint(
        &mut self,
        contents: &[&TabContent],
        area: Size,
        style: NbStyle,
    ) -> Result<ZoneContent> {
        let mut surface = Surface::new(area);
        let bounds = surface.bounds();
        let axis = style.strip_axis();
        self.hit_rects.clear();

        let mut cursor: u16 = 0;
        for content in contents {
            let offered = self.offer(bounds, axis, cursor);
            if offered.is_empty() {
                // Strip is full; remaining tabs get no space this pass.
                self.hit_rects.push(Rect::default());
                continue;
            }

            surface.set_clip(offered);
            let consumed = self.art.render_tab(&mut surface, offered, content, style)?;
            surface.clear_clip();

            let consumed = offered.intersect(consumed);
            cursor = cursor.saturating_add(match axis {
                Direction::Row => consumed.width,
                Direction::Column => consumed.height,
            });
            self.hit_rects.push(consumed);
        }

        Ok(surface.to_content())
    }

    fn offer(&self, bounds: Rect, axis: Direction, cursor: u16) -> Rect {
        match axis {
            Direction::Row => Rect::new(
                cursor,
                0,
                bounds.width.saturating_sub(cursor).min(self.max_tab_size.width),
                bounds.height.min(self.max_tab_size.height),
            ),
            Direction::Column => Rect::new(
                0,
                cursor,
                bounds.width.min(self.max_tab_size.width),
                bounds
                    .height
                    .saturating_sub(cursor)
                    .min(self.max_tab_size.height),
            ),
        }
    }

    /// Tab index at strip-local (x, y), testing the rects cached by the
    /// last paint pass, first match in display order.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        self.hit_rects
            .iter()
            .position(|rect| rect.contains(x, y))
    }

    /// Consumed rects from the last paint pass, in display order.
    pub fn tab_rects(&self) -> &[Rect] {
        &self.hit_rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::TextTabArt;
    use crate::style::{NbStyle, ORIENT_WEST};

    fn container() -> TabContainer {
        TabContainer::new(ParentKind::NoteBook, Arc::new(TextTabArt)).unwrap()
    }

    fn labels(names: &[&str]) -> Vec<TabContent> {
        names.iter().map(|name| TabContent::label(*name)).collect()
    }

    #[test]
    fn non_notebook_parent_is_rejected() {
        let err = TabContainer::new(ParentKind::Root, Arc::new(TextTabArt)).unwrap_err();
        assert!(matches!(err, MawError::InvalidParent { .. }));
    }

    #[test]
    fn tabs_pack_left_to_right_for_north_strip() {
        let mut tabs = container();
        let contents = labels(&["one", "two", "three"]);
        let refs: Vec<&TabContent> = contents.iter().collect();
        tabs.paint(&refs, Size::new(60, 3), NbStyle::default())
            .unwrap();

        // Each TextTabArt tab is label width + 4, so 7, 7, 9 wide.
        let rects = tabs.tab_rects();
        assert_eq!(rects[0], Rect::new(0, 0, 7, 3));
        assert_eq!(rects[1], Rect::new(7, 0, 7, 3));
        assert_eq!(rects[2], Rect::new(14, 0, 9, 3));
    }

    #[test]
    fn tabs_pack_top_to_bottom_for_west_strip() {
        let mut tabs = container();
        let contents = labels(&["a", "b"]);
        let refs: Vec<&TabContent> = contents.iter().collect();
        tabs.paint(&refs, Size::new(18, 12), NbStyle::new(ORIENT_WEST).unwrap())
            .unwrap();

        let rects = tabs.tab_rects();
        assert_eq!((rects[0].y, rects[0].height), (0, 3));
        assert_eq!(rects[1].y, 3);
    }

    #[test]
    fn oversized_consumed_rect_is_clamped() {
        struct GreedyArt;
        impl ArtProvider for GreedyArt {
            fn render_tab(
                &self,
                _surface: &mut Surface,
                offered: Rect,
                _content: &TabContent,
                _style: NbStyle,
            ) -> Result<Rect> {
                // Claims twice the offered width.
                Ok(Rect::new(
                    offered.x,
                    offered.y,
                    offered.width * 2,
                    offered.height,
                ))
            }
        }

        let mut tabs = TabContainer::new(ParentKind::NoteBook, Arc::new(GreedyArt)).unwrap();
        tabs.set_max_tab_size(Size::new(10, 3));
        let contents = labels(&["a", "b"]);
        let refs: Vec<&TabContent> = contents.iter().collect();
        tabs.paint(&refs, Size::new(40, 3), NbStyle::default())
            .unwrap();

        let rects = tabs.tab_rects();
        assert_eq!(rects[0].width, 10);
        assert_eq!(rects[1].x, 10);
    }

    #[test]
    fn full_strip_offers_nothing_to_overflow_tabs() {
        let mut tabs = container();
        tabs.set_max_tab_size(Size::new(12, 3));
        let contents = labels(&["wide tab", "wide tab", "wide tab"]);
        let refs: Vec<&TabContent> = contents.iter().collect();
        tabs.paint(&refs, Size::new(24, 3), NbStyle::default())
            .unwrap();

        let rects = tabs.tab_rects();
        assert_eq!(rects.len(), 3);
        assert!(rects[2].is_empty());
    }

    #[test]
    fn hit_test_matches_painted_rects() {
        let mut tabs = container();
        let contents = labels(&["one", "two"]);
        let refs: Vec<&TabContent> = contents.iter().collect();
        tabs.paint(&refs, Size::new(40, 3), NbStyle::default())
            .unwrap();

        assert_eq!(tabs.hit_test(1, 1), Some(0));
        assert_eq!(tabs.hit_test(8, 1), Some(1));
        assert_eq!(tabs.hit_test(30, 1), None);
    }

    #[test]
    fn max_tab_size_bounds_the_offer() {
        let mut tabs = container();
        tabs.set_max_tab_size(Size::new(5, 3));
        let contents = labels(&["a very long label"]);
        let refs: Vec<&TabContent> = contents.iter().collect();
        tabs.paint(&refs, Size::new(40, 3), NbStyle::default())
            .unwrap();

        assert_eq!(tabs.tab_rects()[0].width, 5);
        assert_eq!(tabs.min_size(), Size::new(5, 3));
    }
}
