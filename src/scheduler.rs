use std::time::{Duration, Instant};

/// Opaque identifier for an installed timer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct TimerHandle(u64);

/// Periodic tick source.
///
/// Instead of invoking callbacks, a scheduler reports how many ticks fired
/// since the last poll; the single owner of the game state applies them.
pub trait Scheduler {
    /// Installs a timer firing every `interval`, first firing one interval from now.
    fn schedule(&mut self, interval: Duration) -> TimerHandle;

    /// Removes a timer. Unknown handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Returns the number of ticks fired by all installed timers since the last poll.
    fn poll(&mut self) -> u32;
}

/// Time source consulted by [`IntervalScheduler`].
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Duration,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }
}

/// Ticks allowed to fire in one poll after a stall before the timer resyncs.
pub const MAX_CATCH_UP_TICKS: u32 = 8;

#[derive(Debug, Clone, Copy)]
struct Timer {
    handle: TimerHandle,
    interval: Duration,
    next_due: Instant,
}

/// Fixed-interval scheduler over any [`Clock`].
#[derive(Debug)]
pub struct IntervalScheduler<C: Clock = SystemClock> {
    clock: C,
    timers: Vec<Timer>,
    next_id: u64,
}

impl IntervalScheduler<SystemClock> {
    #[must_use]
    pub fn system() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl IntervalScheduler<ManualClock> {
    #[must_use]
    pub fn manual() -> Self {
        Self::with_clock(ManualClock::new())
    }
}

impl<C: Clock> IntervalScheduler<C> {
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            timers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Number of installed timers.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Interval of an installed timer.
    #[must_use]
    pub fn interval_of(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers
            .iter()
            .find(|timer| timer.handle == handle)
            .map(|timer| timer.interval)
    }
}

impl<C: Clock> Scheduler for IntervalScheduler<C> {
    fn schedule(&mut self, interval: Duration) -> TimerHandle {
        debug_assert!(!interval.is_zero(), "timer interval must be non-zero");

        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            interval,
            next_due: self.clock.now() + interval,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|timer| timer.handle != handle);
    }

    fn poll(&mut self) -> u32 {
        let now = self.clock.now();
        let mut fired = 0;

        for timer in &mut self.timers {
            let mut fired_here = 0;
            while timer.next_due <= now {
                if fired_here == MAX_CATCH_UP_TICKS {
                    timer.next_due = now + timer.interval;
                    break;
                }
                fired_here += 1;
                timer.next_due += timer.interval;
            }
            fired += fired_here;
        }

        fired
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{IntervalScheduler, Scheduler, MAX_CATCH_UP_TICKS};

    #[test]
    fn timer_fires_once_per_interval() {
        let mut scheduler = IntervalScheduler::manual();
        scheduler.schedule(Duration::from_millis(100));

        scheduler.clock_mut().advance(Duration::from_millis(99));
        assert_eq!(scheduler.poll(), 0);

        scheduler.clock_mut().advance(Duration::from_millis(1));
        assert_eq!(scheduler.poll(), 1);

        scheduler.clock_mut().advance(Duration::from_millis(250));
        assert_eq!(scheduler.poll(), 2);
        assert_eq!(scheduler.poll(), 0);
    }

    #[test]
    fn cancelled_timer_stops_firing() {
        let mut scheduler = IntervalScheduler::manual();
        let handle = scheduler.schedule(Duration::from_millis(10));

        scheduler.cancel(handle);
        scheduler.clock_mut().advance(Duration::from_millis(100));

        assert_eq!(scheduler.poll(), 0);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn long_stall_is_capped_and_resynced() {
        let mut scheduler = IntervalScheduler::manual();
        scheduler.schedule(Duration::from_millis(10));

        scheduler.clock_mut().advance(Duration::from_secs(10));
        assert_eq!(scheduler.poll(), MAX_CATCH_UP_TICKS);

        scheduler.clock_mut().advance(Duration::from_millis(10));
        assert_eq!(scheduler.poll(), 1);
    }

    #[test]
    fn handles_are_unique() {
        let mut scheduler = IntervalScheduler::manual();
        let first = scheduler.schedule(Duration::from_millis(10));
        let second = scheduler.schedule(Duration::from_millis(20));

        assert_ne!(first, second);
        assert_eq!(scheduler.interval_of(second), Some(Duration::from_millis(20)));
    }
}
