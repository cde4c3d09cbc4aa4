use std::collections::HashMap;

use crate::error::{MawError, Result};
use crate::geometry::{Rect, Size};

/// Box axis for a strip of slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Row,
    Column,
}

/// Space rule for a single slot.
///
/// `Hidden` keeps the slot a member of the strip while solving it to zero
/// extent, so toggling visibility never changes strip membership or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRule {
    Fixed(u16),
    Fill(u16),
    Hidden,
}

pub type SlotId = String;

#[derive(Debug, Clone)]
struct Slot {
    id: SlotId,
    rule: SlotRule,
}

/// Ordered single-axis layout: a sequence of fixed, stretching, and hidden
/// slots walked with a cursor from the origin.
#[derive(Debug, Clone)]
pub struct Strip {
    direction: Direction,
    slots: Vec<Slot>,
}

impl Strip {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            slots: Vec::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn push(&mut self, id: impl Into<SlotId>, rule: SlotRule) {
        self.slots.push(Slot {
            id: id.into(),
            rule,
        });
    }

    pub fn with_slot(mut self, id: impl Into<SlotId>, rule: SlotRule) -> Self {
        self.push(id, rule);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot ids in strip order.
    pub fn order(&self) -> Vec<SlotId> {
        self.slots.iter().map(|slot| slot.id.clone()).collect()
    }

    pub fn rule_of(&self, id: &str) -> Option<SlotRule> {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| slot.rule)
    }

    /// Solve the strip against a terminal size, returning rects keyed by
    /// slot id. Fixed slots take their extent first, the remainder splits
    /// across fill slots by weight with leftover cells going to the
    /// earliest fill slots.
    pub fn solve(&self, size: Size) -> Result<HashMap<SlotId, Rect>> {
        if self.slots.is_empty() {
            return Err(MawError::EmptyLayout);
        }

        let axis_length = match self.direction {
            Direction::Row => size.width,
            Direction::Column => size.height,
        };

        let spans = self.solve_spans(axis_length);
        let mut rects = HashMap::new();
        let mut cursor: u16 = 0;

        for (slot, span) in self.slots.iter().zip(spans) {
            let rect = match self.direction {
                Direction::Row => Rect::new(cursor, 0, span, size.height),
                Direction::Column => Rect::new(0, cursor, size.width, span),
            };
            rects.insert(slot.id.clone(), rect);
            cursor = cursor.saturating_add(span);
        }

        Ok(rects)
    }

    fn solve_spans(&self, axis_length: u16) -> Vec<u16> {
        let mut fixed_total: u32 = 0;
        let mut fill_total: u32 = 0;
        for slot in &self.slots {
            match slot.rule {
                SlotRule::Fixed(extent) => fixed_total += extent as u32,
                SlotRule::Fill(weight) => fill_total += weight.max(1) as u32,
                SlotRule::Hidden => {}
            }
        }

        let free = (axis_length as u32).saturating_sub(fixed_total);
        let mut leftover = if fill_total > 0 { free % fill_total } else { 0 };
        let mut budget = axis_length;

        self.slots
            .iter()
            .map(|slot| {
                let want = match slot.rule {
                    SlotRule::Fixed(extent) => extent as u32,
                    SlotRule::Hidden => 0,
                    SlotRule::Fill(weight) => {
                        let weight = weight.max(1) as u32;
                        let mut share = free * weight / fill_total;
                        if leftover > 0 {
                            share += 1;
                            leftover -= 1;
                        }
                        share
                    }
                };
                let span = (want.min(u16::MAX as u32) as u16).min(budget);
                budget -= span;
                span
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_of(rects: &HashMap<SlotId, Rect>, id: &str) -> Rect {
        *rects.get(id).expect(id)
    }

    #[test]
    fn empty_strip_fails() {
        let strip = Strip::new(Direction::Column);
        assert!(matches!(
            strip.solve(Size::new(10, 10)),
            Err(MawError::EmptyLayout)
        ));
    }

    #[test]
    fn column_fixed_then_fill() {
        let strip = Strip::new(Direction::Column)
            .with_slot("tabs", SlotRule::Fixed(3))
            .with_slot("page", SlotRule::Fill(1));
        let rects = strip.solve(Size::new(40, 20)).unwrap();

        assert_eq!(rect_of(&rects, "tabs"), Rect::new(0, 0, 40, 3));
        assert_eq!(rect_of(&rects, "page"), Rect::new(0, 3, 40, 17));
    }

    #[test]
    fn hidden_slots_keep_membership_with_zero_extent() {
        let strip = Strip::new(Direction::Column)
            .with_slot("tabs", SlotRule::Fixed(2))
            .with_slot("a", SlotRule::Fill(1))
            .with_slot("b", SlotRule::Hidden)
            .with_slot("c", SlotRule::Hidden);
        let rects = strip.solve(Size::new(30, 12)).unwrap();

        assert_eq!(rects.len(), 4);
        assert_eq!(rect_of(&rects, "a").height, 10);
        assert!(rect_of(&rects, "b").is_empty());
        assert!(rect_of(&rects, "c").is_empty());
    }

    #[test]
    fn row_strip_walks_horizontally() {
        let strip = Strip::new(Direction::Row)
            .with_slot("tabs", SlotRule::Fixed(12))
            .with_slot("page", SlotRule::Fill(1));
        let rects = strip.solve(Size::new(80, 24)).unwrap();

        assert_eq!(rect_of(&rects, "tabs"), Rect::new(0, 0, 12, 24));
        assert_eq!(rect_of(&rects, "page"), Rect::new(12, 0, 68, 24));
    }

    #[test]
    fn fill_weights_split_with_remainder_to_earliest() {
        let strip = Strip::new(Direction::Row)
            .with_slot("a", SlotRule::Fill(1))
            .with_slot("b", SlotRule::Fill(1))
            .with_slot("c", SlotRule::Fill(1));
        let rects = strip.solve(Size::new(10, 5)).unwrap();

        assert_eq!(rect_of(&rects, "a").width, 4);
        assert_eq!(rect_of(&rects, "b").width, 3);
        assert_eq!(rect_of(&rects, "c").width, 3);
        assert_eq!(rect_of(&rects, "c").right(), 10);
    }

    #[test]
    fn fixed_overflow_clamps_to_budget() {
        let strip = Strip::new(Direction::Row)
            .with_slot("a", SlotRule::Fixed(8))
            .with_slot("b", SlotRule::Fixed(8));
        let rects = strip.solve(Size::new(10, 5)).unwrap();

        assert_eq!(rect_of(&rects, "a").width, 8);
        assert_eq!(rect_of(&rects, "b").width, 2);
    }
}
