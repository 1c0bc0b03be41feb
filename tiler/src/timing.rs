use std::time::Instant;

use crate::events::{Event, EventSink};

/// Reports the wall-clock time between construction and drop as an
/// [`Event::Runtime`].
pub struct ScopedTimer<'a> {
    sink: &'a dyn EventSink,
    label: &'static str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(sink: &'a dyn EventSink, label: &'static str) -> Self {
        Self {
            sink,
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        self.sink.info(Event::Runtime {
            label: self.label,
            elapsed: self.start.elapsed(),
        });
    }
}

/// Runs `f` and reports its runtime, whether it succeeds or not.
pub fn timed<T>(sink: &dyn EventSink, label: &'static str, f: impl FnOnce() -> T) -> T {
    let _timer = ScopedTimer::new(sink, label);
    f()
}
