use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use serde_json::json;

use crate::error::{MawError, Result};
use crate::geometry::{Rect, Size};
use crate::layout::Strip;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::RuntimeMetrics;
use crate::registry::ZoneRegistry;
use crate::render::AnsiRenderer;

pub mod diagnostics;

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<RuntimeMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Hard deadline for the whole session. When it expires the loop is
    /// force-closed with a watchdog error. `None` runs unbounded.
    pub watchdog: Option<Duration>,
    /// Capture widget errors on the runtime instead of propagating them
    /// mid-dispatch. The loop unwinds naturally and the error is handed
    /// back through [`Runtime::take_trapped`] after it exits.
    pub trap_errors: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "maw::runtime.metrics".to_string(),
            watchdog: None,
            trap_errors: false,
        }
    }
}

impl RuntimeConfig {
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RuntimeMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RuntimeMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// High-level events delivered to widgets.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    FocusGained,
    FocusLost,
    Resize(Size),
    /// Synthetic "run this named test case" event posted by the harness.
    Test(String),
}

/// Control the propagation of an event across widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}

/// Context handed to widgets so they can interact with the runtime safely.
pub struct RuntimeContext<'a> {
    rects: &'a HashMap<String, Rect>,
    zone_updates: Vec<(String, String)>,
    layout_swap: Option<Strip>,
    redraw_requested: bool,
    exit_requested: bool,
    cursor_hint: Option<(u16, u16)>,
    page_switches: u64,
    tabs_painted: u64,
}

impl<'a> RuntimeContext<'a> {
    fn new(rects: &'a HashMap<String, Rect>) -> Self {
        Self {
            rects,
            zone_updates: Vec::new(),
            layout_swap: None,
            redraw_requested: false,
            exit_requested: false,
            cursor_hint: None,
            page_switches: 0,
            tabs_painted: 0,
        }
    }

    /// Queue new content for a zone, applied after the widget returns.
    pub fn set_zone(&mut self, zone_id: impl Into<String>, content: impl Into<String>) {
        self.zone_updates.push((zone_id.into(), content.into()));
        self.redraw_requested = true;
    }

    /// Replace the runtime's layout strip. Solved against the current size
    /// after the widget returns; zones absent from the new strip drop out.
    pub fn set_layout(&mut self, strip: Strip) {
        self.layout_swap = Some(strip);
        self.redraw_requested = true;
    }

    pub fn request_render(&mut self) {
        self.redraw_requested = true;
    }

    /// Signal that execution should terminate at the end of the frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn set_cursor_hint(&mut self, row: u16, col: u16) {
        self.cursor_hint = Some((row, col));
    }

    /// Solved rectangle for a zone, if the layout names it.
    pub fn rect(&self, zone_id: &str) -> Option<&Rect> {
        self.rects.get(zone_id)
    }

    /// Record a page activation for the metrics accumulator.
    pub fn note_page_switch(&mut self) {
        self.page_switches += 1;
    }

    /// Record tabs drawn this pass for the metrics accumulator.
    pub fn note_tabs_painted(&mut self, count: usize) {
        self.tabs_painted += count as u64;
    }

    fn into_outcome(self) -> ContextOutcome {
        ContextOutcome {
            zone_updates: self.zone_updates,
            layout_swap: self.layout_swap,
            redraw_requested: self.redraw_requested,
            exit_requested: self.exit_requested,
            cursor_hint: self.cursor_hint,
            page_switches: self.page_switches,
            tabs_painted: self.tabs_painted,
        }
    }
}

struct ContextOutcome {
    zone_updates: Vec<(String, String)>,
    layout_swap: Option<Strip>,
    redraw_requested: bool,
    exit_requested: bool,
    cursor_hint: Option<(u16, u16)>,
    page_switches: u64,
    tabs_painted: u64,
}

/// Behaviour injection point for the runtime.
pub trait Widget: Send {
    fn name(&self) -> &str {
        "maw_widget"
    }

    fn init(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_event(
        &mut self,
        _ctx: &mut RuntimeContext<'_>,
        _event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        Ok(EventFlow::Continue)
    }

    fn before_render(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }

    fn after_render(&mut self, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
        Ok(())
    }
}

pub struct Runtime {
    layout: Strip,
    size: Size,
    rects: HashMap<String, Rect>,
    registry: ZoneRegistry,
    renderer: AnsiRenderer,
    widgets: Vec<Box<dyn Widget>>,
    config: RuntimeConfig,
    should_exit: bool,
    redraw_requested: bool,
    trapped: Option<MawError>,
    started_at: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl Runtime {
    pub fn new(layout: Strip, renderer: AnsiRenderer, initial_size: Size) -> Result<Self> {
        let mut registry = ZoneRegistry::new();
        let rects = layout.solve(initial_size)?;
        registry.sync_layout(&rects);

        Ok(Self {
            layout,
            size: initial_size,
            rects,
            registry,
            renderer,
            widgets: Vec::new(),
            config: RuntimeConfig::default(),
            should_exit: false,
            redraw_requested: true,
            trapped: None,
            started_at: None,
            last_metrics_emit: None,
        })
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn register_widget<W>(&mut self, widget: W)
    where
        W: Widget + 'static,
    {
        self.widgets.push(Box::new(widget));
    }

    /// Error captured during a trapped dispatch, if any. Clears the slot.
    pub fn take_trapped(&mut self) -> Option<MawError> {
        self.trapped.take()
    }

    /// Drive the loop off live crossterm events until an exit is requested
    /// or the watchdog force-closes the session.
    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            if self.watchdog_expired() {
                break;
            }

            let timeout = self
                .config
                .tick_interval
                .saturating_sub(last_tick.elapsed());

            if event::poll(timeout)? {
                let runtime_event = self.map_event(event::read()?)?;
                self.dispatch_event(runtime_event)?;
                self.render_if_needed(stdout)?;
                if self.should_exit {
                    break;
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(RuntimeEvent::Tick { elapsed })?;
                self.render_if_needed(stdout)?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Drive the loop from a prepared event stream, used by tests, benches,
    /// and the application harness.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events {
            if self.should_exit || self.watchdog_expired() {
                break;
            }
            let event = match event {
                RuntimeEvent::Resize(size) => {
                    self.handle_resize(size)?;
                    RuntimeEvent::Resize(size)
                }
                other => other,
            };
            self.dispatch_event(event)?;
            self.render_if_needed(stdout)?;
        }
        self.finalize();
        Ok(())
    }

    fn watchdog_expired(&mut self) -> bool {
        let Some(limit) = self.config.watchdog else {
            return false;
        };
        let expired = self
            .started_at
            .map(|start| start.elapsed() >= limit)
            .unwrap_or(false);
        if expired {
            self.trapped.get_or_insert(MawError::WatchdogTimeout);
            self.should_exit = true;
            self.log_runtime_event(LogLevel::Warn, "watchdog_expired", std::iter::empty());
        }
        expired
    }

    fn dispatch_event(&mut self, event: RuntimeEvent) -> Result<()> {
        let mut consumed = false;
        for idx in 0..self.widgets.len() {
            let dispatched = {
                let widget = &mut self.widgets[idx];
                let mut ctx = RuntimeContext::new(&self.rects);
                let flow = widget.on_event(&mut ctx, &event);
                (flow, ctx.into_outcome())
            };
            let (flow, outcome) = dispatched;
            self.apply_outcome(outcome)?;
            match self.absorb(flow)? {
                Some(EventFlow::Consumed) => {
                    consumed = true;
                    break;
                }
                Some(EventFlow::Continue) => {}
                // Trapped error: unwind the dispatch, the loop exits next turn.
                None => break,
            }
        }

        self.record_event_metric();
        self.log_runtime_event(
            LogLevel::Debug,
            "event_dispatched",
            [
                json_kv("event", json!(Self::describe_event(&event))),
                json_kv("consumed", json!(consumed)),
            ],
        );
        self.maybe_emit_metrics();
        Ok(())
    }

    fn render_if_needed(&mut self, stdout: &mut impl Write) -> Result<()> {
        if !self.redraw_requested {
            return Ok(());
        }

        self.redraw_requested = false;

        for idx in 0..self.widgets.len() {
            let hooked = {
                let widget = &mut self.widgets[idx];
                let mut ctx = RuntimeContext::new(&self.rects);
                let result = widget.before_render(&mut ctx);
                (result, ctx.into_outcome())
            };
            let (result, outcome) = hooked;
            self.apply_outcome(outcome)?;
            if self.absorb(result.map(|_| EventFlow::Continue))?.is_none() {
                return Ok(());
            }
        }

        let dirty = self.registry.take_dirty();
        if !dirty.is_empty() {
            self.renderer.render(stdout, &dirty)?;
            self.record_render_metric(dirty.len());
            self.log_runtime_event(
                LogLevel::Debug,
                "render_completed",
                [json_kv("dirty_zones", json!(dirty.len()))],
            );
        }

        for idx in 0..self.widgets.len() {
            let hooked = {
                let widget = &mut self.widgets[idx];
                let mut ctx = RuntimeContext::new(&self.rects);
                let result = widget.after_render(&mut ctx);
                (result, ctx.into_outcome())
            };
            let (result, outcome) = hooked;
            self.apply_outcome(outcome)?;
            if self.absorb(result.map(|_| EventFlow::Continue))?.is_none() {
                return Ok(());
            }
        }

        if self.registry.has_dirty() {
            self.redraw_requested = true;
        }

        Ok(())
    }

    /// Resolve a widget result under the configured error policy. `None`
    /// means the error was trapped and the loop should unwind.
    fn absorb(&mut self, result: Result<EventFlow>) -> Result<Option<EventFlow>> {
        match result {
            Ok(flow) => Ok(Some(flow)),
            Err(err) if self.config.trap_errors => {
                self.log_runtime_event(
                    LogLevel::Error,
                    "widget_error_trapped",
                    [json_kv("error", json!(err.to_string()))],
                );
                self.trapped.get_or_insert(err);
                self.should_exit = true;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn apply_outcome(&mut self, outcome: ContextOutcome) -> Result<()> {
        let ContextOutcome {
            zone_updates,
            layout_swap,
            redraw_requested,
            exit_requested,
            cursor_hint,
            page_switches,
            tabs_painted,
        } = outcome;

        if let Some(strip) = layout_swap {
            self.layout = strip;
            self.resolve_layout()?;
        }

        let update_count = zone_updates.len();
        if update_count > 0 {
            for (zone, content) in zone_updates {
                self.registry.apply_content(&zone, content)?;
            }
            self.record_zone_updates_metric(update_count);
            self.redraw_requested = true;
        }

        if redraw_requested {
            self.redraw_requested = true;
        }

        if let Some(cursor) = cursor_hint {
            self.renderer.settings_mut().restore_cursor = Some(cursor);
        }

        if page_switches > 0 || tabs_painted > 0 {
            if let Some(metrics) = self.config.metrics.as_ref() {
                if let Ok(mut guard) = metrics.lock() {
                    guard.record_notebook_activity(page_switches, tabs_painted);
                }
            }
        }

        if exit_requested {
            self.should_exit = true;
            self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
        }

        Ok(())
    }

    fn map_event(&mut self, event: CrosstermEvent) -> Result<RuntimeEvent> {
        match event {
            CrosstermEvent::Key(key) => Ok(RuntimeEvent::Key(key)),
            CrosstermEvent::Mouse(mouse) => Ok(RuntimeEvent::Mouse(mouse)),
            CrosstermEvent::Paste(data) => Ok(RuntimeEvent::Paste(data)),
            CrosstermEvent::FocusGained => Ok(RuntimeEvent::FocusGained),
            CrosstermEvent::FocusLost => Ok(RuntimeEvent::FocusLost),
            CrosstermEvent::Resize(width, height) => {
                let size = Size::new(width, height);
                self.handle_resize(size)?;
                Ok(RuntimeEvent::Resize(size))
            }
        }
    }

    fn handle_resize(&mut self, size: Size) -> Result<()> {
        self.size = size;
        self.resolve_layout()?;
        self.log_runtime_event(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        Ok(())
    }

    fn resolve_layout(&mut self) -> Result<()> {
        self.rects = self.layout.solve(self.size)?;
        self.registry.sync_layout(&self.rects);
        self.redraw_requested = true;
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.redraw_requested = true;
        let now = Instant::now();
        self.started_at = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("widgets", json!(self.widgets.len())),
                json_kv("zones", json!(self.rects.len())),
            ],
        );

        for idx in 0..self.widgets.len() {
            let booted = {
                let widget = &mut self.widgets[idx];
                let widget_name = widget.name().to_string();
                let mut ctx = RuntimeContext::new(&self.rects);
                let result = widget.init(&mut ctx);
                self.log_runtime_event(
                    LogLevel::Debug,
                    "widget_initialized",
                    [json_kv("widget", json!(widget_name))],
                );
                (result, ctx.into_outcome())
            };
            let (result, outcome) = booted;
            self.apply_outcome(outcome)?;
            if self.absorb(result.map(|_| EventFlow::Continue))?.is_none() {
                return Ok(());
            }
        }

        self.render_if_needed(stdout)
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .started_at
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, "maw::runtime", message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_event_metric(&mut self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_event();
            }
        }
    }

    fn record_render_metric(&mut self, dirty_count: usize) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_render(dirty_count);
            }
        }
    }

    fn record_zone_updates_metric(&mut self, count: usize) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_zone_updates(count);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval.is_zero() {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = self
            .started_at
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let _ = logger.log_event(guard.snapshot(uptime).to_log_event(target));
            }
        }
    }

    fn describe_event(event: &RuntimeEvent) -> &'static str {
        match event {
            RuntimeEvent::Tick { .. } => "tick",
            RuntimeEvent::Key(_) => "key",
            RuntimeEvent::Mouse(_) => "mouse",
            RuntimeEvent::Paste(_) => "paste",
            RuntimeEvent::FocusGained => "focus_gained",
            RuntimeEvent::FocusLost => "focus_lost",
            RuntimeEvent::Resize(_) => "resize",
            RuntimeEvent::Test(_) => "test",
        }
    }
}
