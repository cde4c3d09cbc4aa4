//! Notebook module orchestrator following the RSB module specification.
//!
//! [`NoteBook`] owns the page list and layout orchestration, [`TabContainer`]
//! owns the tab strip paint cycle and hit-testing, and [`PageInfo`] pairs a
//! page widget with the content its tab displays.

mod core;
mod tabs;

pub use core::{NoteBook, PageInfo, PageWidget, TextPage};
pub use tabs::{ParentKind, TabContainer};
