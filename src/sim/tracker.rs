//! Position tracking and active-time countdowns
//!
//! Both only move when the drill ticks them, so a paused drill freezes the
//! note position, the spawn delay, and the reveal window together.

use super::state::ActiveItem;

/// Distance at or below which a note has reached the danger zone
pub const DEADLINE_THRESHOLD: f32 = 0.0;

/// Move `distance` toward the deadline at `speed` for `dt` seconds, floored at zero
#[inline]
pub fn advance(distance: f32, speed: f32, dt: f32) -> f32 {
    if dt == 0.0 {
        return distance;
    }
    (distance - speed * dt).max(0.0)
}

#[inline]
pub fn deadline_reached(distance: f32) -> bool {
    distance <= DEADLINE_THRESHOLD
}

impl<T> ActiveItem<T> {
    pub fn new(question: T, distance: f32, spawned_at: f64) -> Self {
        Self {
            question,
            distance_remaining: distance,
            spawned_at,
        }
    }

    /// Advance toward the danger zone; returns true once the deadline is reached
    pub fn advance(&mut self, speed: f32, dt: f32) -> bool {
        self.distance_remaining = advance(self.distance_remaining, speed, dt);
        deadline_reached(self.distance_remaining)
    }

    /// Fraction of the journey covered (0 at spawn, 1 at the danger zone)
    pub fn progress(&self, deadline_distance: f32) -> f32 {
        if deadline_distance <= 0.0 {
            return 1.0;
        }
        (1.0 - self.distance_remaining / deadline_distance).clamp(0.0, 1.0)
    }
}

/// One-shot timer measured in ticked time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
        }
    }

    /// Consume `dt`; true once the countdown has run out
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining = (self.remaining - dt).max(0.0);
        self.expired()
    }

    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_floors_at_zero() {
        assert_eq!(advance(10.0, 5.0, 1.0), 5.0);
        assert_eq!(advance(3.0, 5.0, 1.0), 0.0);
        assert_eq!(advance(3.0, 5.0, 0.0), 3.0);
        assert_eq!(advance(3.0, f32::INFINITY, 0.0), 3.0);
        assert_eq!(advance(3.0, f32::MAX, 1.0), 0.0);
        assert!(deadline_reached(0.0));
        assert!(!deadline_reached(0.01));
    }

    #[test]
    fn test_item_reaches_deadline() {
        let mut item = ActiveItem::new('x', 10.0, 0.0);
        assert!(!item.advance(4.0, 1.0));
        assert!((item.progress(10.0) - 0.4).abs() < 1e-6);
        assert!(!item.advance(4.0, 1.0));
        assert!(item.advance(4.0, 1.0));
        assert_eq!(item.distance_remaining, 0.0);
        assert_eq!(item.progress(10.0), 1.0);
    }

    #[test]
    fn test_countdown() {
        let mut timer = Countdown::new(0.3);
        assert!(!timer.advance(0.1));
        assert!(!timer.advance(0.1));
        assert!(timer.advance(0.2));
        assert_eq!(timer.remaining(), 0.0);

        let mut instant = Countdown::new(0.0);
        assert!(instant.advance(0.0));
    }
}
