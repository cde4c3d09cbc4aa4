//! Modular art widgets: a tabbed notebook control for the zone runtime.
//!
//! The modules follow the RSB `MODULE_SPEC` pattern: orchestrator `mod.rs`
//! files re-export the private `core` implementations. The notebook widget,
//! its art-provider strategy, the application test harness, and the wrap-job
//! declarations for the native property-grid family all live here.

pub mod art;
pub mod bindings;
pub mod error;
pub mod geometry;
pub mod harness;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod notebook;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod style;
pub mod surface;
pub mod width;

pub use art::{ArtProvider, TabContent, TextTabArt};
pub use bindings::{GenBackend, ModuleModel, ModuleSpec, Tweak, WrapJob, property_grid_job};
pub use error::{MawError, Result};
pub use geometry::{Rect, Size};
pub use harness::{AppHarness, DEFAULT_WATCHDOG, TestWidget};
pub use layout::{Direction, SlotId, SlotRule, Strip};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, RuntimeMetrics};
pub use notebook::{NoteBook, PageInfo, PageWidget, ParentKind, TabContainer, TextPage};
pub use registry::{ZoneContent, ZoneId, ZoneRegistry};
pub use render::{AnsiRenderer, RendererSettings};
pub use runtime::diagnostics::LifecycleLoggerWidget;
pub use runtime::{
    EventFlow, Runtime, RuntimeConfig, RuntimeContext, RuntimeEvent, Widget,
};
pub use style::{
    GRAV_EAST, GRAV_NORTH, GRAV_SOUTH, GRAV_WEST, NbStyle, ORIENT_EAST, ORIENT_NORTH,
    ORIENT_SOUTH, ORIENT_WEST,
};
pub use surface::Surface;
pub use width::display_width;
