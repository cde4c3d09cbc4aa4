use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Accumulated runtime counters, snapshotted into log events on an interval.
#[derive(Debug, Default, Clone)]
pub struct RuntimeMetrics {
    events: u64,
    renders: u64,
    dirty_zones: u64,
    zone_updates: u64,
    tabs_painted: u64,
    page_switches: u64,
}

impl RuntimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_render(&mut self, dirty_count: usize) {
        self.renders = self.renders.saturating_add(1);
        self.dirty_zones = self.dirty_zones.saturating_add(dirty_count as u64);
    }

    pub fn record_zone_updates(&mut self, count: usize) {
        if count > 0 {
            self.zone_updates = self.zone_updates.saturating_add(count as u64);
        }
    }

    pub fn record_notebook_activity(&mut self, page_switches: u64, tabs_painted: u64) {
        self.page_switches = self.page_switches.saturating_add(page_switches);
        self.tabs_painted = self.tabs_painted.saturating_add(tabs_painted);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            renders: self.renders,
            dirty_zones: self.dirty_zones,
            zone_updates: self.zone_updates,
            tabs_painted: self.tabs_painted,
            page_switches: self.page_switches,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub renders: u64,
    pub dirty_zones: u64,
    pub zone_updates: u64,
    pub tabs_painted: u64,
    pub page_switches: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("dirty_zones".to_string(), json!(self.dirty_zones));
        map.insert("zone_updates".to_string(), json!(self.zone_updates));
        map.insert("tabs_painted".to_string(), json!(self.tabs_painted));
        map.insert("page_switches".to_string(), json!(self.page_switches));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target,
            "runtime_metrics",
            self.as_fields(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_into_snapshot() {
        let mut metrics = RuntimeMetrics::new();
        metrics.record_event();
        metrics.record_event();
        metrics.record_render(3);
        metrics.record_zone_updates(2);
        metrics.record_notebook_activity(1, 4);

        let snapshot = metrics.snapshot(Duration::from_millis(250));
        assert_eq!(snapshot.uptime_ms, 250);
        assert_eq!(snapshot.events, 2);
        assert_eq!(snapshot.renders, 1);
        assert_eq!(snapshot.dirty_zones, 3);
        assert_eq!(snapshot.zone_updates, 2);
        assert_eq!(snapshot.page_switches, 1);
        assert_eq!(snapshot.tabs_painted, 4);
    }

    #[test]
    fn snapshot_log_event_carries_all_fields() {
        let metrics = RuntimeMetrics::new();
        let event = metrics
            .snapshot(Duration::from_secs(1))
            .to_log_event("maw::runtime.metrics");
        assert_eq!(event.message, "runtime_metrics");
        assert_eq!(event.fields.len(), 7);
    }
}
