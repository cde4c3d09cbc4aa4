use std::io::Write;

use crate::display_width;
use crate::error::Result;
use crate::geometry::Rect;
use crate::registry::{ZoneId, ZoneState};

/// Renderer runtime parameters.
#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    pub restore_cursor: Option<(u16, u16)>,
}

/// ANSI escape code renderer writing dirty zones to a terminal handle.
///
/// Zone content arrives pre-rendered (widgets compose their own lines), so
/// the renderer only places lines at the zone rect and pads them to width.
pub struct AnsiRenderer {
    settings: RendererSettings,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn render(&mut self, writer: &mut impl Write, dirty: &[(ZoneId, ZoneState)]) -> Result<()> {
        for (_id, state) in dirty {
            render_zone(writer, state)?;
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            write!(writer, "\x1b[{};{}H", row + 1, col + 1)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn render_zone(writer: &mut impl Write, state: &ZoneState) -> Result<()> {
    let Rect {
        x,
        y,
        width,
        height,
    } = state.rect;

    if width == 0 || height == 0 {
        return Ok(());
    }

    let mut lines: Vec<String> = state
        .content
        .lines()
        .take(height as usize)
        .map(str::to_string)
        .collect();
    lines.resize(height as usize, String::new());

    for (offset, line) in lines.iter_mut().enumerate() {
        fit_line(line, width);
        write!(writer, "\x1b[{};{}H{}", y + offset as u16 + 1, x + 1, line)?;
    }

    Ok(())
}

/// Pad or truncate `line` to exactly `width` display cells.
fn fit_line(line: &mut String, width: u16) {
    while (display_width(line) as u16) > width {
        line.pop();
    }
    let mut cells = display_width(line) as u16;
    while cells < width {
        line.push(' ');
        cells += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ZoneRegistry;
    use std::collections::HashMap;

    #[test]
    fn fit_line_pads_and_truncates() {
        let mut line = "tabs".to_string();
        fit_line(&mut line, 6);
        assert_eq!(line, "tabs  ");

        let mut line = "overflowing".to_string();
        fit_line(&mut line, 4);
        assert_eq!(line, "over");
    }

    #[test]
    fn renderer_places_lines_at_zone_origin() {
        let mut registry = ZoneRegistry::new();
        let mut solved = HashMap::new();
        solved.insert("tabs".to_string(), Rect::new(2, 3, 5, 2));
        registry.sync_layout(&solved);
        registry.take_dirty();
        registry.apply_content("tabs", "hi".into()).unwrap();
        let dirty = registry.take_dirty();

        let mut output = Vec::new();
        let mut renderer = AnsiRenderer::with_default();
        renderer.render(&mut output, &dirty).unwrap();

        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\u{1b}[4;3Hhi"));
        assert!(rendered.contains("\u{1b}[5;3H"));
    }

    #[test]
    fn restore_cursor_emits_final_move() {
        let mut renderer = AnsiRenderer::with_default();
        renderer.settings_mut().restore_cursor = Some((0, 0));

        let mut output = Vec::new();
        renderer.render(&mut output, &[]).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "\u{1b}[1;1H");
    }
}
