//! Layout module orchestrator following the RSB module specification.
//!
//! Widgets build a [`Strip`] describing one box axis worth of slots; the
//! runtime solves it into per-zone rectangles on bootstrap and resize.

mod core;

pub use core::{Direction, SlotId, SlotRule, Strip};
