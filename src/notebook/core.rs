use std::sync::Arc;

use crossterm::event::{MouseButton, MouseEventKind};

use crate::art::{ArtProvider, TabContent, TextTabArt};
use crate::error::{MawError, Result};
use crate::geometry::Rect;
use crate::layout::{Direction, SlotRule, Strip};
use crate::registry::{ZoneContent, ZoneId};
use crate::runtime::{EventFlow, RuntimeContext, RuntimeEvent, Widget};
use crate::style::NbStyle;

use super::tabs::{ParentKind, TabContainer};

/// Renders the body of one notebook page into its solved rect.
pub trait PageWidget: Send {
    fn render(&mut self, rect: Rect) -> ZoneContent;
}

/// Static text page, enough for demos and harness fixtures.
pub struct TextPage {
    text: String,
}

impl TextPage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PageWidget for TextPage {
    fn render(&mut self, _rect: Rect) -> ZoneContent {
        self.text.clone()
    }
}

/// Immutable pairing of a page widget with the content its tab displays.
/// Owned by the notebook; created on `add_page`, destroyed on removal.
pub struct PageInfo {
    zone_id: ZoneId,
    content: TabContent,
    widget: Box<dyn PageWidget>,
}

impl PageInfo {
    fn new(zone_id: ZoneId, content: TabContent, widget: Box<dyn PageWidget>) -> Self {
        Self {
            zone_id,
            content,
            widget,
        }
    }

    pub fn zone_id(&self) -> &ZoneId {
        &self.zone_id
    }

    pub fn content(&self) -> &TabContent {
        &self.content
    }
}

/// Tabbed notebook control: an ordered page list, a tab strip, a validated
/// style, and at most one active page.
///
/// All pages stay members of the layout; only the active page stretches,
/// the rest solve to zero extent. Switching pages is therefore a rule
/// toggle, never a strip rebuild around detached widgets.
pub struct NoteBook {
    id: String,
    style: NbStyle,
    tabs: TabContainer,
    pages: Vec<PageInfo>,
    active: Option<usize>,
    next_serial: u64,
    needs_layout: bool,
}

impl NoteBook {
    pub fn new(
        id: impl Into<String>,
        art: Option<Arc<dyn ArtProvider>>,
        raw_style: u8,
    ) -> Result<Self> {
        let art = art.unwrap_or_else(|| Arc::new(TextTabArt));
        let tabs = TabContainer::new(ParentKind::NoteBook, art)?;

        Ok(Self {
            id: id.into(),
            style: NbStyle::new(raw_style)?,
            tabs,
            pages: Vec::new(),
            active: None,
            next_serial: 0,
            needs_layout: true,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Zone holding the tab strip.
    pub fn tabs_zone(&self) -> ZoneId {
        format!("{}.tabs", self.id)
    }

    pub fn style(&self) -> NbStyle {
        self.style
    }

    /// Validate and apply a raw style, then mark the layout for recompute.
    pub fn set_style(&mut self, raw_style: u8) -> Result<()> {
        self.style = NbStyle::new(raw_style)?;
        self.needs_layout = true;
        Ok(())
    }

    /// Append a page. The first page always becomes active; later pages
    /// only when `focus` is set. Returns the page's zone id.
    pub fn add_page(
        &mut self,
        content: TabContent,
        widget: Box<dyn PageWidget>,
        focus: bool,
    ) -> ZoneId {
        let zone_id = format!("{}.page.{}", self.id, self.next_serial);
        self.next_serial += 1;
        self.pages
            .push(PageInfo::new(zone_id.clone(), content, widget));

        if focus || self.active.is_none() {
            self.active = Some(self.pages.len() - 1);
        }
        self.needs_layout = true;
        zone_id
    }

    /// Remove the page owning `zone_id`, destroying its `PageInfo`. When
    /// the active page goes away, the page now occupying its index (or the
    /// new last page) takes over; an emptied notebook has no active page.
    pub fn remove_page(&mut self, zone_id: &str) -> Result<()> {
        let index = self
            .pages
            .iter()
            .position(|page| page.zone_id == zone_id)
            .ok_or_else(|| MawError::ZoneNotFound(zone_id.to_string()))?;
        self.pages.remove(index);

        self.active = match self.active {
            _ if self.pages.is_empty() => None,
            Some(active) if active == index => Some(index.min(self.pages.len() - 1)),
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        self.needs_layout = true;
        Ok(())
    }

    /// Activate the page owning `zone_id`.
    pub fn set_active(&mut self, zone_id: &str) -> Result<()> {
        let index = self
            .pages
            .iter()
            .position(|page| page.zone_id == zone_id)
            .ok_or_else(|| MawError::ZoneNotFound(zone_id.to_string()))?;
        self.activate(index);
        Ok(())
    }

    fn activate(&mut self, index: usize) {
        if self.active != Some(index) {
            self.active = Some(index);
            self.needs_layout = true;
        }
    }

    pub fn active_zone(&self) -> Option<&ZoneId> {
        self.active.map(|index| self.pages[index].zone_id())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_zones(&self) -> Vec<ZoneId> {
        self.pages
            .iter()
            .map(|page| page.zone_id.clone())
            .collect()
    }

    pub fn tabs(&self) -> &TabContainer {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabContainer {
        &mut self.tabs
    }

    /// Current layout strip: orientation picks the axis, the strip slot is
    /// fixed-extent and leads for NORTH/WEST orientations, the active page
    /// fills, every other page stays a hidden member.
    pub fn layout(&self) -> Strip {
        let strip_extent = match self.style.axis() {
            Direction::Column => self.tabs.min_size().height,
            Direction::Row => self.tabs.min_size().width,
        };

        let mut strip = Strip::new(self.style.axis());
        if self.style.tabs_leading() {
            strip.push(self.tabs_zone(), SlotRule::Fixed(strip_extent));
        }
        for (index, page) in self.pages.iter().enumerate() {
            let rule = if self.active == Some(index) {
                SlotRule::Fill(1)
            } else {
                SlotRule::Hidden
            };
            strip.push(page.zone_id.clone(), rule);
        }
        if !self.style.tabs_leading() {
            strip.push(self.tabs_zone(), SlotRule::Fixed(strip_extent));
        }
        strip
    }

    fn push_layout(&mut self, ctx: &mut RuntimeContext<'_>) {
        if self.needs_layout {
            ctx.set_layout(self.layout());
            ctx.request_render();
            self.needs_layout = false;
        }
    }

    fn handle_click(&mut self, column: u16, row: u16, ctx: &mut RuntimeContext<'_>) -> EventFlow {
        let Some(strip_rect) = ctx.rect(&self.tabs_zone()).copied() else {
            return EventFlow::Continue;
        };
        if !strip_rect.contains(column, row) {
            return EventFlow::Continue;
        }

        let local_x = column - strip_rect.x;
        let local_y = row - strip_rect.y;
        if let Some(index) = self.tabs.hit_test(local_x, local_y) {
            if self.active != Some(index) {
                self.activate(index);
                ctx.note_page_switch();
            }
        }
        EventFlow::Consumed
    }
}

impl Widget for NoteBook {
    fn name(&self) -> &str {
        &self.id
    }

    fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.needs_layout = true;
        self.push_layout(ctx);
        Ok(())
    }

    fn on_event(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        let flow = match event {
            RuntimeEvent::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) =>
            {
                self.handle_click(mouse.column, mouse.row, ctx)
            }
            _ => EventFlow::Continue,
        };

        self.push_layout(ctx);
        Ok(flow)
    }

    fn before_render(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.push_layout(ctx);

        let tabs_zone = self.tabs_zone();
        if let Some(rect) = ctx.rect(&tabs_zone).copied() {
            if !rect.is_empty() {
                let contents: Vec<&TabContent> =
                    self.pages.iter().map(|page| page.content()).collect();
                let strip = self.tabs.paint(&contents, rect.size(), self.style)?;
                ctx.note_tabs_painted(self.pages.len());
                ctx.set_zone(tabs_zone, strip);
            }
        }

        if let Some(index) = self.active {
            let page = &mut self.pages[index];
            if let Some(rect) = ctx.rect(&page.zone_id).copied() {
                if !rect.is_empty() {
                    let body = page.widget.render(rect);
                    let zone_id = page.zone_id.clone();
                    ctx.set_zone(zone_id, body);
                }
            }
        }

        Ok(())
    }
}
