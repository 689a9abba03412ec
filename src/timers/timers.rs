use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct PhaseTimer {
    start: Option<Instant>,
    elapsed: Duration,
}

impl PhaseTimer {
    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
        }
    }

    // includes time since start if still running
    fn elapsed(&self) -> Duration {
        match self.start {
            Some(instant) => self.elapsed + instant.elapsed(),
            None => self.elapsed,
        }
    }
}

/// Accumulated time per solver phase, keyed by phase name.
#[derive(Debug, Default)]
pub struct Timers {
    phases: HashMap<&'static str, PhaseTimer>,
}

impl Timers {
    pub fn reset_timer(&mut self, key: &'static str) {
        self.phases.insert(key, PhaseTimer::default());
    }

    pub fn start(&mut self, key: &'static str) {
        self.phases.entry(key).or_default().start();
    }

    pub fn stop(&mut self, key: &'static str) {
        if let Some(t) = self.phases.get_mut(key) {
            t.stop();
        }
    }

    /// time spent in a phase, zero if it never ran
    pub fn elapsed(&self, key: &'static str) -> Duration {
        self.phases
            .get(key)
            .map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn total_time(&self) -> Duration {
        self.phases
            .values()
            .fold(Duration::ZERO, |acc, t| acc + t.elapsed())
    }
}

macro_rules! timeit {
    ($timer:expr => $key:literal; $($tt:tt)+) => {
        $timer.start($key);
        $(
            $tt
        )+
        $timer.stop($key);
    }
}
pub(crate) use timeit;

#[test]
fn test_timers_accumulate() {
    let mut timers = Timers::default();
    assert_eq!(timers.elapsed("solve"), Duration::ZERO);

    timeit! {timers => "solve";
        std::thread::sleep(Duration::from_millis(2));
    }
    let first = timers.elapsed("solve");
    assert!(first >= Duration::from_millis(2));

    timeit! {timers => "solve";
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(timers.elapsed("solve") > first);
    assert_eq!(timers.total_time(), timers.elapsed("solve"));

    timers.reset_timer("solve");
    assert_eq!(timers.elapsed("solve"), Duration::ZERO);
}
