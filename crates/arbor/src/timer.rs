//! Game clocks: a normalized [`Time`] value, a pausable stopwatch
//! [`Timer`] and a [`CountdownTimer`], all driven by a [`Clock`].

use std::{
    cell::Cell,
    fmt,
    ops::{Add, Sub},
    rc::Rc,
    time::{Duration, Instant},
};

const MS_PER_S: u64 = 1000;
const MS_PER_M: u64 = 60 * MS_PER_S;
const MS_PER_H: u64 = 60 * MS_PER_M;
const MS_PER_D: u64 = 24 * MS_PER_H;

/// A non-negative span of time with millisecond resolution, viewed as days,
/// hours, minutes, seconds and milliseconds.
///
/// Components are always normalized: setting a component to an out of range
/// value carries the excess into coarser units, and negative values borrow.
/// The total never drops below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    /// Total milliseconds.
    ms: u64,
}

/// Clamp a signed millisecond count to a valid total.
fn clamp(ms: i128) -> u64 {
    ms.clamp(0, i128::from(u64::MAX)) as u64
}

impl Time {
    /// Zero.
    pub const ZERO: Self = Self { ms: 0 };

    /// Build a time from components of any size or sign.
    pub fn new(days: i64, hours: i64, minutes: i64, seconds: i64, ms: i64) -> Self {
        let total = i128::from(days) * i128::from(MS_PER_D)
            + i128::from(hours) * i128::from(MS_PER_H)
            + i128::from(minutes) * i128::from(MS_PER_M)
            + i128::from(seconds) * i128::from(MS_PER_S)
            + i128::from(ms);
        Self { ms: clamp(total) }
    }

    /// A time from a number of milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self { ms }
    }

    /// A time from fractional seconds, rounded to the millisecond. Negative
    /// and non-finite inputs give zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self {
            ms: (secs * MS_PER_S as f64).round() as u64,
        }
    }

    /// Whole days.
    pub fn d(&self) -> u64 {
        self.ms / MS_PER_D
    }

    /// Hours within the day.
    pub fn h(&self) -> u64 {
        self.ms % MS_PER_D / MS_PER_H
    }

    /// Minutes within the hour.
    pub fn m(&self) -> u64 {
        self.ms % MS_PER_H / MS_PER_M
    }

    /// Seconds within the minute.
    pub fn s(&self) -> u64 {
        self.ms % MS_PER_M / MS_PER_S
    }

    /// Milliseconds within the second.
    pub fn ms(&self) -> u64 {
        self.ms % MS_PER_S
    }

    /// Replace one component, carrying into the rest.
    fn replace(&mut self, current: u64, unit: u64, value: i64) {
        let total = i128::from(self.ms) - i128::from(current * unit)
            + i128::from(value) * i128::from(unit);
        self.ms = clamp(total);
    }

    /// Set the day count.
    pub fn set_d(&mut self, days: i64) {
        self.replace(self.d(), MS_PER_D, days);
    }

    /// Set the hour component.
    pub fn set_h(&mut self, hours: i64) {
        self.replace(self.h(), MS_PER_H, hours);
    }

    /// Set the minute component.
    pub fn set_m(&mut self, minutes: i64) {
        self.replace(self.m(), MS_PER_M, minutes);
    }

    /// Set the second component.
    pub fn set_s(&mut self, seconds: i64) {
        self.replace(self.s(), MS_PER_S, seconds);
    }

    /// Set the millisecond component.
    pub fn set_ms(&mut self, ms: i64) {
        self.replace(self.ms(), 1, ms);
    }

    /// Total milliseconds.
    pub fn in_ms(&self) -> u64 {
        self.ms
    }

    /// Total seconds.
    pub fn in_s(&self) -> f64 {
        self.ms as f64 / MS_PER_S as f64
    }

    /// Total minutes.
    pub fn in_m(&self) -> f64 {
        self.ms as f64 / MS_PER_M as f64
    }

    /// Total hours.
    pub fn in_h(&self) -> f64 {
        self.ms as f64 / MS_PER_H as f64
    }

    /// Total days.
    pub fn in_d(&self) -> f64 {
        self.ms as f64 / MS_PER_D as f64
    }

    /// Is this zero?
    pub fn is_zero(&self) -> bool {
        self.ms == 0
    }
}

impl Add for Time {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ms: self.ms.saturating_add(rhs.ms),
        }
    }
}

impl Sub for Time {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            ms: self.ms.saturating_sub(rhs.ms),
        }
    }
}

impl From<Duration> for Time {
    fn from(d: Duration) -> Self {
        Self {
            ms: u64::try_from(d.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl From<Time> for Duration {
    fn from(t: Time) -> Self {
        Self::from_millis(t.ms)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (days, hours, mins, secs) = (self.d(), self.h(), self.m(), self.s());
        if days > 0 {
            let plural = if days == 1 { "" } else { "s" };
            write!(f, "{days} day{plural}, {hours:02}:{mins:02}:{secs:02}")?;
        } else if hours > 0 {
            write!(f, "{hours}:{mins:02}:{secs:02}")?;
        } else if mins > 0 {
            write!(f, "{mins}:{secs:02}")?;
        } else {
            write!(f, "{secs}")?;
        }
        if self.ms() > 0 {
            write!(f, ".{:03}", self.ms())?;
        }
        Ok(())
    }
}

/// A monotonic time source.
pub trait Clock {
    /// Time since an arbitrary fixed epoch.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    /// Epoch.
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    /// Shared current time.
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// A clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Set the clock.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Shared timer state: an accumulated time, and the clock reading it was
/// last folded at while running.
#[derive(Debug, Clone)]
struct Running<C> {
    /// Time source.
    clock: C,
    /// Accumulated or remaining time.
    time: Time,
    /// Clock reading at the last fold. `None` when stopped.
    last: Option<Duration>,
}

impl<C: Clock> Running<C> {
    /// Stopped, at zero.
    fn new(clock: C) -> Self {
        Self {
            clock,
            time: Time::ZERO,
            last: None,
        }
    }

    /// Take the whole milliseconds since the last fold. The fold point
    /// advances by the same amount, so sub-millisecond remainders carry
    /// into the next read.
    fn take_delta(&mut self) -> Time {
        let Some(last) = self.last else {
            return Time::ZERO;
        };
        let delta = Time::from(self.clock.now().saturating_sub(last));
        self.last = Some(last + Duration::from(delta));
        delta
    }

    /// Run from `time`.
    fn start(&mut self, time: Time) {
        self.time = time;
        self.last = Some(self.clock.now());
    }

    /// Stop folding.
    fn stop(&mut self) {
        self.last = None;
    }

    /// Start folding again if stopped.
    fn resume(&mut self) {
        if self.last.is_none() {
            self.last = Some(self.clock.now());
        }
    }

    /// Stop at zero.
    fn reset(&mut self) {
        self.time = Time::ZERO;
        self.last = None;
    }
}

/// A pausable stopwatch.
///
/// Elapsed time is folded in lazily: reading [`elapsed`](Self::elapsed)
/// while running adds the clock time since the previous read.
#[derive(Debug, Clone)]
pub struct Timer<C = SystemClock> {
    /// Accumulated time.
    inner: Running<C>,
}

impl<C: Clock> Timer<C> {
    /// A stopped timer at zero on a default clock.
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_clock(C::default())
    }

    /// A stopped timer at zero on the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            inner: Running::new(clock),
        }
    }

    /// Start running from `initial`.
    pub fn start(&mut self, initial: Time) {
        self.inner.start(initial);
    }

    /// Stop accumulating, keeping the elapsed time.
    pub fn pause(&mut self) {
        self.fold();
        self.inner.stop();
    }

    /// Resume after a pause. Time spent paused is not counted.
    pub fn unpause(&mut self) {
        self.inner.resume();
    }

    /// Stop and return to zero.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Reset, then start from zero.
    pub fn restart(&mut self) {
        self.reset();
        self.start(Time::ZERO);
    }

    /// Time accumulated so far.
    pub fn elapsed(&mut self) -> Time {
        self.fold();
        self.inner.time
    }

    /// Is the timer accumulating?
    pub fn is_running(&self) -> bool {
        self.inner.last.is_some()
    }

    /// Add clock time since the last fold.
    fn fold(&mut self) {
        let delta = self.inner.take_delta();
        self.inner.time = self.inner.time + delta;
    }
}

impl<C: Clock + Default> Default for Timer<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A timer that counts down from its start value.
///
/// When the remaining time would go below zero the timer resets: it stops at
/// zero and reports [`expired`](Self::expired) until started again.
#[derive(Debug, Clone)]
pub struct CountdownTimer<C = SystemClock> {
    /// Remaining time.
    inner: Running<C>,
    /// The value of the last start, used by `restart`.
    initial: Time,
    /// Did the countdown run out?
    expired: bool,
}

impl<C: Clock> CountdownTimer<C> {
    /// A stopped countdown on a default clock.
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_clock(C::default())
    }

    /// A stopped countdown on the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            inner: Running::new(clock),
            initial: Time::ZERO,
            expired: false,
        }
    }

    /// Start counting down from `initial`.
    pub fn start(&mut self, initial: Time) {
        self.initial = initial;
        self.expired = false;
        self.inner.start(initial);
    }

    /// Stop counting, keeping the remaining time.
    pub fn pause(&mut self) {
        self.fold();
        self.inner.stop();
    }

    /// Resume after a pause.
    pub fn unpause(&mut self) {
        if !self.expired {
            self.inner.resume();
        }
    }

    /// Stop at zero.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Start again from the last start value.
    pub fn restart(&mut self) {
        let initial = self.initial;
        self.reset();
        self.start(initial);
    }

    /// Time left.
    pub fn remaining(&mut self) -> Time {
        self.fold();
        self.inner.time
    }

    /// Has the countdown run out since the last start?
    pub fn expired(&mut self) -> bool {
        self.fold();
        self.expired
    }

    /// Is the countdown running?
    pub fn is_running(&mut self) -> bool {
        self.fold();
        self.inner.last.is_some()
    }

    /// Subtract clock time since the last fold, resetting on underflow.
    fn fold(&mut self) {
        let delta = self.inner.take_delta();
        if delta > self.inner.time {
            self.inner.reset();
            self.expired = true;
        } else {
            self.inner.time = self.inner.time - delta;
        }
    }
}

impl<C: Clock + Default> Default for CountdownTimer<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn normalizes() {
        let t = Time::new(0, 25, 61, 61, 1001);
        assert_eq!((t.d(), t.h(), t.m(), t.s(), t.ms()), (1, 2, 2, 2, 1));
        assert_eq!(Time::new(0, 0, 1, -30, 0), Time::new(0, 0, 0, 30, 0));
        assert_eq!(Time::new(0, 0, 0, -5, 0), Time::ZERO);
    }

    #[test]
    fn setters_carry() {
        let mut t = Time::new(0, 0, 2, 10, 0);
        t.set_s(90);
        assert_eq!((t.m(), t.s()), (3, 30));
        t.set_m(-1);
        assert_eq!((t.h(), t.m(), t.s()), (0, 0, 0));
        let mut t = Time::new(0, 1, 0, 0, 0);
        t.set_m(-1);
        assert_eq!((t.h(), t.m()), (0, 59));
        t.set_ms(2500);
        assert_eq!((t.m(), t.s(), t.ms()), (59, 2, 500));
        t.set_d(1);
        assert_eq!(t.in_ms(), MS_PER_D + 59 * MS_PER_M + 2500);
    }

    #[test]
    fn fractional_seconds() {
        let t = Time::from_secs_f64(61.25);
        assert_eq!((t.m(), t.s(), t.ms()), (1, 1, 250));
        assert_eq!(Time::from_secs_f64(-3.0), Time::ZERO);
        assert_eq!(Time::from_secs_f64(f64::NAN), Time::ZERO);
        assert_eq!(Time::new(0, 0, 1, 30, 0).in_m(), 1.5);
        assert_eq!(Time::new(1, 12, 0, 0, 0).in_d(), 1.5);
    }

    #[test]
    fn arithmetic() {
        let a = Time::new(0, 0, 0, 45, 0);
        let b = Time::new(0, 0, 0, 30, 0);
        assert_eq!(a + b, Time::new(0, 0, 1, 15, 0));
        assert_eq!(a - b, Time::new(0, 0, 0, 15, 0));
        assert_eq!(b - a, Time::ZERO);
        assert!(b < a);
    }

    #[test]
    fn display() {
        assert_eq!(Time::new(0, 0, 0, 5, 250).to_string(), "5.250");
        assert_eq!(Time::new(0, 0, 0, 5, 0).to_string(), "5");
        assert_eq!(Time::new(0, 0, 1, 5, 0).to_string(), "1:05");
        assert_eq!(Time::new(0, 1, 0, 5, 0).to_string(), "1:00:05");
        assert_eq!(Time::new(2, 1, 0, 5, 0).to_string(), "2 days, 01:00:05");
        assert_eq!(Time::new(1, 0, 0, 0, 7).to_string(), "1 day, 00:00:00.007");
    }

    #[test]
    fn stopwatch() {
        let clock = ManualClock::new();
        let mut t = Timer::with_clock(clock.clone());
        assert!(!t.is_running());
        clock.advance(secs(10));
        assert_eq!(t.elapsed(), Time::ZERO);

        t.start(Time::ZERO);
        clock.advance(secs(2));
        assert_eq!(t.elapsed(), Time::new(0, 0, 0, 2, 0));

        t.pause();
        clock.advance(secs(5));
        assert_eq!(t.elapsed(), Time::new(0, 0, 0, 2, 0));

        t.unpause();
        clock.advance(secs(1));
        assert_eq!(t.elapsed(), Time::new(0, 0, 0, 3, 0));

        t.restart();
        clock.advance(Duration::from_millis(1500));
        assert_eq!(t.elapsed().to_string(), "1.500");

        t.reset();
        assert!(!t.is_running());
        assert_eq!(t.elapsed(), Time::ZERO);
    }

    #[test]
    fn frame_reads_do_not_drift() {
        let clock = ManualClock::new();
        let frame = Duration::from_micros(16_667);
        let mut t = Timer::with_clock(clock.clone());
        let mut c = CountdownTimer::with_clock(clock.clone());
        t.start(Time::ZERO);
        c.start(Time::new(0, 0, 0, 10, 0));
        for _ in 0..100 {
            clock.advance(frame);
            t.elapsed();
            c.remaining();
        }
        assert_eq!(t.elapsed(), Time::from_millis(1666));
        assert_eq!(c.remaining(), Time::from_millis(10_000 - 1666));
    }

    #[test]
    fn countdown() {
        let clock = ManualClock::new();
        let mut t = CountdownTimer::with_clock(clock.clone());
        t.start(Time::new(0, 0, 0, 10, 0));
        clock.advance(secs(4));
        assert_eq!(t.remaining(), Time::new(0, 0, 0, 6, 0));
        assert!(!t.expired());

        clock.advance(secs(6));
        assert_eq!(t.remaining(), Time::ZERO);
        assert!(t.is_running());

        clock.advance(secs(1));
        assert!(t.expired());
        assert!(!t.is_running());
        assert_eq!(t.remaining(), Time::ZERO);

        t.unpause();
        assert!(!t.is_running());

        t.restart();
        clock.advance(secs(3));
        assert!(!t.expired());
        assert_eq!(t.remaining(), Time::new(0, 0, 0, 7, 0));
    }

    proptest! {
        #[test]
        fn components_in_range(
            days in 0i64..100,
            hours in -100i64..100,
            mins in -1000i64..1000,
            secs in -1000i64..1000,
            ms in -100_000i64..100_000,
        ) {
            let t = Time::new(days, hours, mins, secs, ms);
            prop_assert!(t.h() < 24 && t.m() < 60 && t.s() < 60 && t.ms() < 1000);
            let total = days * 86_400_000 + hours * 3_600_000 + mins * 60_000 + secs * 1000 + ms;
            prop_assert_eq!(t.in_ms(), total.max(0) as u64);
            prop_assert_eq!(
                Time::new(t.d() as i64, t.h() as i64, t.m() as i64, t.s() as i64, t.ms() as i64),
                t
            );
        }
    }
}
