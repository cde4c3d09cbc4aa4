use serde_json::Value;

use crate::display_width;
use crate::error::{MawError, Result};
use crate::geometry::Rect;
use crate::style::NbStyle;
use crate::surface::Surface;

/// User supplied content shown on a tab. The notebook never interprets it;
/// only the art provider does.
#[derive(Debug, Clone, PartialEq)]
pub enum TabContent {
    /// Plain text label, what [`TextTabArt`] knows how to draw.
    Label(String),
    /// Opaque structured content for custom providers (icon descriptors,
    /// badges, whatever the provider understands).
    Data(Value),
}

impl TabContent {
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }
}

/// Rendering strategy for tab art.
///
/// Called once per tab during the strip's paint cycle. The returned rect is
/// the space actually consumed and must fit within `offered`; the container
/// advances its packing cursor by that extent. Drawing itself is clipped to
/// `offered` by the caller, so a misbehaving provider can only misreport
/// its extent, not paint outside it.
pub trait ArtProvider: Send + Sync {
    fn render_tab(
        &self,
        surface: &mut Surface,
        offered: Rect,
        content: &TabContent,
        style: NbStyle,
    ) -> Result<Rect>;
}

/// Default provider: the label inside an outlined box with a fixed margin,
/// sized to the measured text extent and clamped to the offer.
#[derive(Debug, Default)]
pub struct TextTabArt;

impl TextTabArt {
    pub const MARGIN: u16 = 2;
}

impl ArtProvider for TextTabArt {
    fn render_tab(
        &self,
        surface: &mut Surface,
        offered: Rect,
        content: &TabContent,
        _style: NbStyle,
    ) -> Result<Rect> {
        let label = match content {
            TabContent::Label(label) => label,
            TabContent::Data(value) => {
                return Err(MawError::UnsupportedContent(format!(
                    "TextTabArt expected a label, got data {value}"
                )));
            }
        };

        let text_cells = display_width(label) as u16;
        let width = text_cells
            .saturating_add(Self::MARGIN * 2)
            .min(offered.width);
        let consumed = Rect::new(offered.x, offered.y, width, offered.height);

        surface.outline(consumed);
        let row = offered.y + offered.height.saturating_sub(1) / 2;
        surface.put_str(offered.x + Self::MARGIN, row, label);

        Ok(consumed)
    }
}
