//! In-process application test harness.
//!
//! Each named case boots a fresh runtime, mounts the widget under test,
//! posts a synthetic [`RuntimeEvent::Test`] naming the case, and drives the
//! loop until the widget signals completion or the watchdog force-closes
//! the session. Errors raised inside event handlers are trapped on the
//! runtime so the loop unwinds naturally, then re-raised to the caller.

use std::io;
use std::iter;
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::geometry::Size;
use crate::layout::{Direction, SlotRule, Strip};
use crate::logging::Logger;
use crate::render::AnsiRenderer;
use crate::runtime::{EventFlow, Runtime, RuntimeContext, RuntimeEvent, Widget};

/// Default watchdog: five minutes, matching an interactive debugging budget.
pub const DEFAULT_WATCHDOG: Duration = Duration::from_secs(300);

/// A widget that knows how to exercise itself.
///
/// A case signals success by requesting exit on its context and failure by
/// returning an error; a case that does neither keeps the loop alive until
/// the watchdog fires.
pub trait TestWidget: Widget {
    /// Named cases this widget advertises, in run order.
    fn cases(&self) -> Vec<String>;

    /// Execute one named case. Called from inside the running event loop.
    fn run_case(&mut self, case: &str, ctx: &mut RuntimeContext<'_>) -> Result<()>;
}

/// Routes the synthetic test event to the widget's case logic while
/// delegating everything else unchanged.
struct CaseDriver<W: TestWidget> {
    inner: W,
}

impl<W: TestWidget> Widget for CaseDriver<W> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn init(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.inner.init(ctx)
    }

    fn on_event(
        &mut self,
        ctx: &mut RuntimeContext<'_>,
        event: &RuntimeEvent,
    ) -> Result<EventFlow> {
        if let RuntimeEvent::Test(case) = event {
            self.inner.run_case(case, ctx)?;
            return Ok(EventFlow::Consumed);
        }
        self.inner.on_event(ctx, event)
    }

    fn before_render(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.inner.before_render(ctx)
    }

    fn after_render(&mut self, ctx: &mut RuntimeContext<'_>) -> Result<()> {
        self.inner.after_render(ctx)
    }
}

/// Factory for per-case application sessions.
#[derive(Clone)]
pub struct AppHarness {
    size: Size,
    watchdog: Duration,
    tick: Duration,
    logger: Option<Logger>,
}

impl Default for AppHarness {
    fn default() -> Self {
        Self {
            size: Size::new(80, 24),
            watchdog: DEFAULT_WATCHDOG,
            tick: Duration::from_millis(10),
            logger: None,
        }
    }
}

impl AppHarness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_watchdog(mut self, watchdog: Duration) -> Self {
        self.watchdog = watchdog;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Boot a fresh application and run one named case to completion.
    pub fn run_case<W, F>(&self, factory: F, case: &str) -> Result<()>
    where
        W: TestWidget + 'static,
        F: FnOnce() -> W,
    {
        // Placeholder layout: the widget swaps in its own strip during init.
        let root = Strip::new(Direction::Column).with_slot("maw:harness.root", SlotRule::Fill(1));
        let mut runtime = Runtime::new(root, AnsiRenderer::with_default(), self.size)?;
        runtime.config_mut().trap_errors = true;
        runtime.config_mut().watchdog = Some(self.watchdog);
        runtime.config_mut().logger = self.logger.clone();
        runtime.register_widget(CaseDriver { inner: factory() });

        // Synthetic ticks sleep for their own interval, so a case that never
        // completes idles instead of spinning; the budget guarantees enough
        // wall time has passed for the watchdog check to fire.
        let tick = self.tick;
        let tick_budget =
            (self.watchdog.as_millis() / self.tick.as_millis().max(1)) as usize + 1;
        let script = iter::once(RuntimeEvent::Test(case.to_string())).chain(
            iter::repeat_with(move || {
                thread::sleep(tick);
                RuntimeEvent::Tick { elapsed: tick }
            })
            .take(tick_budget),
        );

        let mut sink = io::sink();
        runtime.run_scripted(&mut sink, script)?;

        match runtime.take_trapped() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Run every advertised case, one fresh application each.
    pub fn run_all<W, F>(&self, factory: F) -> Vec<(String, Result<()>)>
    where
        W: TestWidget + 'static,
        F: Fn() -> W,
    {
        let cases = factory().cases();
        cases
            .into_iter()
            .map(|case| {
                let outcome = self.run_case(&factory, &case);
                (case, outcome)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MawError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts ticks so cases can exercise multi-frame behaviour.
    struct FixtureWidget {
        ticks: usize,
        armed: bool,
    }

    impl FixtureWidget {
        fn new() -> Self {
            Self {
                ticks: 0,
                armed: false,
            }
        }
    }

    impl Widget for FixtureWidget {
        fn name(&self) -> &str {
            "fixture"
        }

        fn on_event(
            &mut self,
            ctx: &mut RuntimeContext<'_>,
            event: &RuntimeEvent,
        ) -> Result<EventFlow> {
            if matches!(event, RuntimeEvent::Tick { .. }) {
                self.ticks += 1;
                if self.armed && self.ticks >= 3 {
                    ctx.request_exit();
                }
            }
            Ok(EventFlow::Continue)
        }
    }

    impl TestWidget for FixtureWidget {
        fn cases(&self) -> Vec<String> {
            vec![
                "test_pass".to_string(),
                "test_deferred_pass".to_string(),
                "test_fail".to_string(),
            ]
        }

        fn run_case(&mut self, case: &str, ctx: &mut RuntimeContext<'_>) -> Result<()> {
            match case {
                "test_pass" => {
                    ctx.request_exit();
                    Ok(())
                }
                "test_deferred_pass" => {
                    // Completion happens a few ticks later, on the loop.
                    self.armed = true;
                    Ok(())
                }
                "test_fail" => Err(MawError::TestFailed("expected failure".into())),
                "test_hang" => Ok(()),
                other => Err(MawError::TestFailed(format!("unknown case `{other}`"))),
            }
        }
    }

    fn harness() -> AppHarness {
        AppHarness::new().with_size(Size::new(40, 10))
    }

    #[test]
    fn passing_case_completes_cleanly() {
        harness().run_case(FixtureWidget::new, "test_pass").unwrap();
    }

    #[test]
    fn case_may_finish_on_a_later_frame() {
        harness()
            .run_case(FixtureWidget::new, "test_deferred_pass")
            .unwrap();
    }

    #[test]
    fn failing_case_error_is_reraised_after_the_loop() {
        let err = harness()
            .run_case(FixtureWidget::new, "test_fail")
            .unwrap_err();
        assert!(matches!(err, MawError::TestFailed(_)));
    }

    #[test]
    fn hung_case_is_closed_by_the_watchdog() {
        let err = harness()
            .with_watchdog(Duration::from_millis(5))
            .run_case(FixtureWidget::new, "test_hang")
            .unwrap_err();
        assert!(matches!(err, MawError::WatchdogTimeout));
    }

    #[test]
    fn hung_case_idles_instead_of_spinning() {
        struct TickCounter {
            ticks: Arc<AtomicUsize>,
        }

        impl Widget for TickCounter {
            fn on_event(
                &mut self,
                _ctx: &mut RuntimeContext<'_>,
                event: &RuntimeEvent,
            ) -> Result<EventFlow> {
                if matches!(event, RuntimeEvent::Tick { .. }) {
                    self.ticks.fetch_add(1, Ordering::Relaxed);
                }
                Ok(EventFlow::Continue)
            }
        }

        impl TestWidget for TickCounter {
            fn cases(&self) -> Vec<String> {
                vec!["test_hang".to_string()]
            }

            fn run_case(&mut self, _case: &str, _ctx: &mut RuntimeContext<'_>) -> Result<()> {
                Ok(())
            }
        }

        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let err = harness()
            .with_watchdog(Duration::from_millis(50))
            .run_case(move || TickCounter { ticks: counter }, "test_hang")
            .unwrap_err();

        assert!(matches!(err, MawError::WatchdogTimeout));
        // Ticks arrive at the 10ms default pace, so a 50ms watchdog sees a
        // handful of them, not thousands.
        assert!(ticks.load(Ordering::Relaxed) <= 10);
    }

    #[test]
    fn run_all_reports_per_case_outcomes() {
        let results = harness().run_all(FixtureWidget::new);
        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_ok());
        assert!(results[2].1.is_err());
    }
}
