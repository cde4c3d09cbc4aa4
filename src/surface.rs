use unicode_width::UnicodeWidthChar;

use crate::geometry::{Rect, Size};

/// In-memory character grid for composing one zone's content in zone-local
/// coordinates before it is handed to the registry.
///
/// A clip rect can be pushed over the grid; writes outside the active clip
/// are dropped cell by cell. Art providers draw through this so a provider
/// can never scribble outside the rectangle it was offered.
#[derive(Debug, Clone)]
pub struct Surface {
    size: Size,
    rows: Vec<Vec<char>>,
    clip: Option<Rect>,
}

impl Surface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            rows: vec![vec![' '; size.width as usize]; size.height as usize],
            clip: None,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.size.width, self.size.height)
    }

    /// Restrict subsequent writes to `rect`, intersected with the grid.
    pub fn set_clip(&mut self, rect: Rect) {
        self.clip = Some(self.bounds().intersect(rect));
    }

    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    fn writable(&self, x: u16, y: u16) -> bool {
        if !self.bounds().contains(x, y) {
            return false;
        }
        match self.clip {
            Some(clip) => clip.contains(x, y),
            None => true,
        }
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char) {
        if self.writable(x, y) {
            self.rows[y as usize][x as usize] = ch;
        }
    }

    /// Write `text` left to right from (x, y), advancing by display width.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str) {
        let mut cursor = x;
        for ch in text.chars() {
            let cells = ch.width().unwrap_or(0) as u16;
            if cells == 0 {
                continue;
            }
            self.put_char(cursor, y, ch);
            cursor = cursor.saturating_add(cells);
        }
    }

    /// Single-line box outline around `rect`. Degenerate rects are skipped.
    pub fn outline(&mut self, rect: Rect) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;

        for x in rect.x + 1..right {
            self.put_char(x, rect.y, '─');
            self.put_char(x, bottom, '─');
        }
        for y in rect.y + 1..bottom {
            self.put_char(rect.x, y, '│');
            self.put_char(right, y, '│');
        }
        self.put_char(rect.x, rect.y, '┌');
        self.put_char(right, rect.y, '┐');
        self.put_char(rect.x, bottom, '└');
        self.put_char(right, bottom, '┘');
    }

    /// Serialize the grid to zone content, one line per row.
    pub fn to_content(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_str_lands_in_row() {
        let mut surface = Surface::new(Size::new(10, 2));
        surface.put_str(2, 1, "tab");
        let content = surface.to_content();
        assert_eq!(content, "\n  tab");
    }

    #[test]
    fn writes_outside_bounds_are_dropped() {
        let mut surface = Surface::new(Size::new(4, 1));
        surface.put_str(2, 0, "long");
        assert_eq!(surface.to_content(), "  lo");
        surface.put_char(0, 5, 'x');
        assert_eq!(surface.to_content(), "  lo");
    }

    #[test]
    fn clip_masks_writes() {
        let mut surface = Surface::new(Size::new(8, 1));
        surface.set_clip(Rect::new(0, 0, 3, 1));
        surface.put_str(0, 0, "clipped");
        assert_eq!(surface.to_content(), "cli");

        surface.clear_clip();
        surface.put_str(0, 0, "clipped");
        assert_eq!(surface.to_content(), "clipped");
    }

    #[test]
    fn outline_draws_corners_and_edges() {
        let mut surface = Surface::new(Size::new(4, 3));
        surface.outline(Rect::new(0, 0, 4, 3));
        assert_eq!(surface.to_content(), "┌──┐\n│  │\n└──┘");
    }

    #[test]
    fn degenerate_outline_is_a_noop() {
        let mut surface = Surface::new(Size::new(4, 3));
        surface.outline(Rect::new(0, 0, 1, 3));
        assert_eq!(surface.to_content(), "\n\n");
    }
}
