// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tick-driven interpolation state machine.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use super::easing::Easing;
use super::value::AnimValue;
use crate::time::{Duration, HostTime};

/// Lifecycle of an [`Animation`].
///
/// ```text
/// Start ──► Waiting ──► Running ──► Last ──► End
///   ▲        (Init)                  │ (Clear)
///   └──────────── repeat ────────────┘
/// ```
///
/// `Init` replaces `Waiting` and `Clear` follows `Last` in the clip-reveal
/// variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Created or re-targeted; the next tick stamps the start time.
    Start,
    /// Reveal variant: inside the delay, progress held at 0.
    Init,
    /// Inside the delay; no values are produced.
    Waiting,
    /// Interpolating.
    Running,
    /// The first tick past the end; progress pinned to 1.
    Last,
    /// Reveal variant: one frame after `Last` that removes the clip.
    Clear,
    /// Finished; further ticks are ignored.
    End,
}

impl Status {
    /// Whether this status writes channel values on the tick that produced it.
    #[must_use]
    pub const fn applies_values(self) -> bool {
        matches!(self, Self::Init | Self::Running | Self::Last | Self::Clear)
    }
}

/// Duration, delay, easing, and repeat behavior of an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Length of the interpolation.
    pub duration: Duration,
    /// Time to wait after the first tick before interpolating.
    pub delay: Duration,
    /// Progress curve.
    pub easing: Easing,
    /// Restart after finishing instead of ending.
    pub repeat: bool,
}

impl Timing {
    /// Linear, undelayed, non-repeating timing of the given length.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing: Easing::Linear,
            repeat: false,
        }
    }

    /// Returns a copy with a start delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns a copy with a different easing curve.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Returns a copy that repeats.
    #[must_use]
    pub const fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
}

/// One interpolated channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track<K> {
    /// Channel key.
    pub key: K,
    /// Start value.
    pub from: AnimValue,
    /// End value.
    pub to: AnimValue,
    /// Value at the current progress.
    pub current: AnimValue,
}

/// Interpolates a set of keyed channels over host time.
///
/// The machine is advanced with absolute, monotonic [`HostTime`] stamps; the
/// first [`tick`](Self::tick) after creation or re-targeting becomes the
/// start time. `K` names the channels: [`Property`](super::Property) for
/// scene nodes, or any application key.
pub struct Animation<K> {
    tracks: Vec<Track<K>>,
    timing: Timing,
    status: Status,
    started: Option<HostTime>,
    progress: f64,
    reveal: bool,
    on_finish: Option<Box<dyn FnOnce()>>,
}

impl<K: fmt::Debug> fmt::Debug for Animation<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("tracks", &self.tracks)
            .field("timing", &self.timing)
            .field("status", &self.status)
            .field("started", &self.started)
            .field("progress", &self.progress)
            .field("reveal", &self.reveal)
            .finish_non_exhaustive()
    }
}

impl<K: PartialEq> Animation<K> {
    /// Creates an animation with no channels.
    #[must_use]
    pub fn new(timing: Timing) -> Self {
        Self {
            tracks: Vec::new(),
            timing,
            status: Status::Start,
            started: None,
            progress: 0.0,
            reveal: false,
            on_finish: None,
        }
    }

    /// Creates a clip-reveal animation: `Init` holds progress 0 during the
    /// delay and a `Clear` frame follows `Last`.
    #[must_use]
    pub fn reveal(timing: Timing) -> Self {
        Self {
            reveal: true,
            ..Self::new(timing)
        }
    }

    /// Adds (or replaces) a channel. Builder form of [`set_track`](Self::set_track).
    #[must_use]
    pub fn with_track(mut self, key: K, from: impl Into<AnimValue>, to: impl Into<AnimValue>) -> Self {
        self.set_track(key, from.into(), to.into());
        self
    }

    /// Registers a hook run once when the animation reaches [`Status::End`].
    #[must_use]
    pub fn on_finish(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.on_finish = Some(Box::new(hook));
        self
    }

    /// Adds a channel, or replaces the endpoints of an existing one.
    pub fn set_track(&mut self, key: K, from: AnimValue, to: AnimValue) {
        if let Some(track) = self.tracks.iter_mut().find(|t| t.key == key) {
            track.from = from;
            track.to = to;
            track.current = from;
        } else {
            self.tracks.push(Track {
                key,
                from,
                to,
                current: from,
            });
        }
    }

    /// Restarts from the current values towards new targets.
    ///
    /// Every channel's current value becomes its new start; channels named in
    /// `targets` also get a new end (unknown keys are ignored). The machine
    /// returns to [`Status::Start`] and the next tick stamps a new start time.
    pub fn retarget(&mut self, targets: impl IntoIterator<Item = (K, AnimValue)>) {
        for track in &mut self.tracks {
            track.from = track.current;
        }
        for (key, to) in targets {
            if let Some(track) = self.tracks.iter_mut().find(|t| t.key == key) {
                track.to = to;
            }
        }
        self.status = Status::Start;
        self.started = None;
        self.progress = 0.0;
    }

    /// Advances the machine to `now` and returns the new status.
    pub fn tick(&mut self, now: HostTime) -> Status {
        match self.status {
            Status::End => {}
            Status::Start => {
                self.started = Some(now);
                self.evaluate(now);
            }
            Status::Last if self.reveal => {
                self.status = Status::Clear;
            }
            Status::Last | Status::Clear => self.finish_or_restart(now),
            Status::Init | Status::Waiting | Status::Running => self.evaluate(now),
        }
        self.status
    }

    fn evaluate(&mut self, now: HostTime) {
        let start = self.started.unwrap_or(now);
        let elapsed = now.saturating_duration_since(start);
        let Timing {
            duration, delay, ..
        } = self.timing;

        if elapsed < delay {
            if self.reveal {
                self.status = Status::Init;
                self.set_progress(0.0);
            } else {
                self.status = Status::Waiting;
            }
        } else if elapsed.saturating_sub(delay) <= duration {
            self.status = Status::Running;
            let raw = elapsed.saturating_sub(delay).fraction_of(duration);
            self.set_progress(self.timing.easing.apply(raw));
        } else {
            self.status = Status::Last;
            self.set_progress(1.0);
        }
    }

    fn finish_or_restart(&mut self, now: HostTime) {
        if self.timing.repeat {
            self.started = Some(now);
            self.evaluate(now);
        } else {
            self.status = Status::End;
            if let Some(hook) = self.on_finish.take() {
                hook();
            }
        }
    }

    fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
        for track in &mut self.tracks {
            track.current = track.from.lerp(track.to, progress);
        }
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Eased progress of the last evaluation, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Timing parameters.
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Whether this is the clip-reveal variant.
    #[must_use]
    pub fn is_reveal(&self) -> bool {
        self.reveal
    }

    /// The channels with their current values.
    #[must_use]
    pub fn tracks(&self) -> &[Track<K>] {
        &self.tracks
    }

    /// The current value of one channel.
    #[must_use]
    pub fn value(&self, key: &K) -> Option<AnimValue> {
        self.tracks.iter().find(|t| &t.key == key).map(|t| t.current)
    }

    /// Whether the machine has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == Status::End
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Ch {
        X,
        Y,
    }

    fn x(anim: &Animation<Ch>) -> f64 {
        anim.value(&Ch::X).and_then(AnimValue::as_scalar).unwrap()
    }

    #[test]
    fn final_frame_is_exact_and_end_comes_later() {
        let d = Duration(1000);
        let mut anim = Animation::new(Timing::new(d)).with_track(Ch::X, 0.0, 100.0);
        assert_eq!(anim.tick(HostTime(0)), Status::Running);
        assert_eq!(x(&anim), 0.0);

        assert_eq!(anim.tick(HostTime(d.ticks() + 1)), Status::Last);
        assert_eq!(x(&anim), 100.0, "end value is exact");

        assert_eq!(anim.tick(HostTime(d.ticks() + 2)), Status::End);
        assert_eq!(anim.tick(HostTime(d.ticks() + 3)), Status::End, "ticks ignored");
    }

    #[test]
    fn delay_waits_before_running() {
        let timing = Timing::new(Duration(100)).with_delay(Duration(50));
        let mut anim = Animation::new(timing).with_track(Ch::X, 0.0, 10.0);
        assert_eq!(anim.tick(HostTime(1000)), Status::Waiting);
        assert_eq!(anim.tick(HostTime(1049)), Status::Waiting);
        assert_eq!(anim.tick(HostTime(1100)), Status::Running);
        assert!((x(&anim) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn repeat_restarts_at_elapsed_zero() {
        let timing = Timing::new(Duration(100)).with_repeat(true);
        let mut anim = Animation::new(timing).with_track(Ch::X, 10.0, 20.0);
        let mut now = 0;
        for _ in 0..500 {
            let status = anim.tick(HostTime(now));
            let v = x(&anim);
            assert!((10.0..=20.0).contains(&v), "value {v} escaped at {now}");
            assert_ne!(status, Status::End, "repeating animations never end");
            now += 7;
        }

        let mut anim = Animation::new(timing).with_track(Ch::X, 10.0, 20.0);
        anim.tick(HostTime(0));
        assert_eq!(anim.tick(HostTime(101)), Status::Last);
        assert_eq!(anim.tick(HostTime(500)), Status::Running, "restart evaluates");
        assert_eq!(x(&anim), 10.0, "restart tick is elapsed zero");
        assert_eq!(anim.tick(HostTime(550)), Status::Running);
        assert!((x(&anim) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn retarget_continues_from_current_value() {
        let mut anim = Animation::new(Timing::new(Duration(100)))
            .with_track(Ch::X, 0.0, 100.0)
            .with_track(Ch::Y, 0.0, 10.0);
        anim.tick(HostTime(0));
        anim.tick(HostTime(50));
        anim.retarget([(Ch::X, AnimValue::Scalar(0.0))]);
        assert_eq!(anim.status(), Status::Start);

        anim.tick(HostTime(1000));
        assert_eq!(x(&anim), 50.0, "restarts from the captured value");
        anim.tick(HostTime(1050));
        assert!((x(&anim) - 25.0).abs() < 1e-9);
        let y = anim.value(&Ch::Y).and_then(AnimValue::as_scalar).unwrap();
        assert!((y - 7.5).abs() < 1e-9, "untargeted channel keeps its end");
    }

    #[test]
    fn reveal_variant_inits_and_clears() {
        let timing = Timing::new(Duration(10)).with_delay(Duration(5));
        let mut anim = Animation::reveal(timing).with_track(Ch::X, 0.0, 1.0);
        assert_eq!(anim.tick(HostTime(0)), Status::Init);
        assert_eq!(x(&anim), 0.0);
        assert_eq!(anim.tick(HostTime(10)), Status::Running);
        assert_eq!(anim.tick(HostTime(16)), Status::Last);
        assert_eq!(anim.tick(HostTime(17)), Status::Clear);
        assert_eq!(anim.tick(HostTime(18)), Status::End);
    }

    #[test]
    fn finish_hook_runs_once() {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let mut anim = Animation::<Ch>::new(Timing::new(Duration(1)))
            .on_finish(move || seen.set(seen.get() + 1));
        anim.tick(HostTime(0));
        anim.tick(HostTime(2));
        anim.tick(HostTime(3));
        anim.tick(HostTime(4));
        assert!(anim.is_finished());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn zero_duration_jumps_to_the_end() {
        let mut anim = Animation::new(Timing::new(Duration::ZERO)).with_track(Ch::X, 0.0, 4.0);
        assert_eq!(anim.tick(HostTime(0)), Status::Running);
        assert_eq!(x(&anim), 4.0);
        assert_eq!(anim.tick(HostTime(1)), Status::Last);
    }
}
