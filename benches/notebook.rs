use std::io;
use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use maw::{
    AnsiRenderer, Direction, LifecycleLoggerWidget, LogEvent, LogSink, Logger, LoggingResult,
    NoteBook, Result, Runtime, RuntimeEvent, Size, SlotRule, Strip, TabContent, TextPage,
};

struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

fn build_runtime() -> Result<Runtime> {
    let mut nb = NoteBook::new("bench:nb", None, 0)?;
    for index in 0..8 {
        nb.add_page(
            TabContent::label(format!("tab {index}")),
            Box::new(TextPage::new(format!("page {index} body"))),
            false,
        );
    }

    let root = Strip::new(Direction::Column).with_slot("root", SlotRule::Fill(1));
    let mut runtime = Runtime::new(root, AnsiRenderer::with_default(), Size::new(120, 40))?;
    runtime.config_mut().logger = Some(Logger::new(NullSink));
    runtime.config_mut().enable_metrics();
    runtime.config_mut().metrics_interval = Duration::from_millis(1);
    runtime.register_widget(LifecycleLoggerWidget::new(Logger::new(NullSink)).log_ticks(true));
    runtime.register_widget(nb);
    Ok(runtime)
}

fn scripted_events() -> Vec<RuntimeEvent> {
    let mut events = Vec::new();
    for column in [2u16, 12, 22, 32, 42, 52] {
        events.push(RuntimeEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row: 1,
            modifiers: KeyModifiers::NONE,
        }));
        events.push(RuntimeEvent::Tick {
            elapsed: Duration::from_millis(5),
        });
    }
    events.push(RuntimeEvent::Resize(Size::new(100, 30)));
    events
}

fn notebook_click_script(c: &mut Criterion) {
    let script = scripted_events();
    c.bench_function("notebook_click_script", |b| {
        b.iter(|| {
            let mut runtime = build_runtime().expect("runtime");
            let mut sink = io::sink();
            runtime
                .run_scripted(&mut sink, black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

fn strip_solve(c: &mut Criterion) {
    let mut nb = NoteBook::new("bench:solve", None, 0).expect("notebook");
    for index in 0..32 {
        nb.add_page(
            TabContent::label(format!("tab {index}")),
            Box::new(TextPage::new("body")),
            false,
        );
    }
    let strip = nb.layout();

    c.bench_function("strip_solve_32_pages", |b| {
        b.iter(|| {
            strip
                .solve(black_box(Size::new(200, 50)))
                .expect("solve")
        });
    });
}

criterion_group!(benches, notebook_click_script, strip_solve);
criterion_main!(benches);
