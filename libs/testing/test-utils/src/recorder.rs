//! In-process metrics recorder for asserting what a code path emitted
//!
//! Install it for a closure with `metrics::with_local_recorder`, or for the rest
//! of a single-threaded test with `metrics::set_default_local_recorder`:
//!
//! ```rust,ignore
//! let recorder = CountingRecorder::default();
//! let _guard = metrics::set_default_local_recorder(&recorder);
//!
//! app.oneshot(request).await.unwrap();
//!
//! assert_eq!(recorder.count("processed_locations_total"), 1);
//! ```

use metrics::{
    Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};
use std::sync::{Arc, Mutex};

/// One counter increment: metric name plus its `status` label, if any
type Increment = (String, Option<String>);

type Log = Arc<Mutex<Vec<Increment>>>;

struct LoggedCounter {
    name: String,
    status: Option<String>,
    log: Log,
}

impl CounterFn for LoggedCounter {
    fn increment(&self, value: u64) {
        let mut log = self.log.lock().expect("recorder log poisoned");
        for _ in 0..value {
            log.push((self.name.clone(), self.status.clone()));
        }
    }

    fn absolute(&self, _value: u64) {}
}

/// Records every counter increment. Gauges and histograms are dropped.
#[derive(Clone, Default)]
pub struct CountingRecorder {
    log: Log,
}

impl CountingRecorder {
    /// Total increments seen for `name`
    pub fn count(&self, name: &str) -> usize {
        self.increments(name).len()
    }

    /// `status` label of each increment of `name`, in order
    pub fn statuses(&self, name: &str) -> Vec<String> {
        self.increments(name)
            .into_iter()
            .filter_map(|(_, status)| status)
            .collect()
    }

    fn increments(&self, name: &str) -> Vec<Increment> {
        self.log
            .lock()
            .expect("recorder log poisoned")
            .iter()
            .filter(|(n, _)| n == name)
            .cloned()
            .collect()
    }
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
        let status = key
            .labels()
            .find(|label| label.key() == "status")
            .map(|label| label.value().to_string());

        Counter::from_arc(Arc::new(LoggedCounter {
            name: key.name().to_string(),
            status,
            log: Arc::clone(&self.log),
        }))
    }

    fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_name_and_status() {
        let recorder = CountingRecorder::default();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("hits", "status" => "200").increment(2);
            metrics::counter!("misses").increment(1);
        });

        assert_eq!(recorder.count("hits"), 2);
        assert_eq!(recorder.statuses("hits"), vec!["200", "200"]);
        assert_eq!(recorder.count("misses"), 1);
        assert!(recorder.statuses("misses").is_empty());
    }
}
