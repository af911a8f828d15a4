//! Storefront promo state: sale countdown and image carousel.
//!
//! Both are pure values; the caller supplies the clock and drives rotation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time left until a deadline, broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Remaining time from `now` until `deadline`, zero once it has passed.
    pub fn until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = (deadline - now).num_seconds().max(0);
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    pub fn is_finished(&self) -> bool {
        self.total_seconds() == 0
    }

    /// `DD:HH:MM:SS`, zero padded.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Rotating index over a fixed list of images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    images: Vec<String>,
    index: usize,
}

impl Carousel {
    pub fn new(images: Vec<String>) -> Self {
        Self { images, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    /// Advance, wrapping to the first image.
    pub fn next(&mut self) -> Option<&str> {
        if !self.images.is_empty() {
            self.index = (self.index + 1) % self.images.len();
        }
        self.current()
    }

    /// Step back, wrapping to the last image.
    pub fn prev(&mut self) -> Option<&str> {
        if !self.images.is_empty() {
            self.index = (self.index + self.images.len() - 1) % self.images.len();
        }
        self.current()
    }

    /// Jump to `index`; out-of-range values are ignored.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        if index < self.images.len() {
            self.index = index;
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_countdown_breakdown() {
        let now = Utc::now();
        let deadline = now + Duration::seconds(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        let c = Countdown::until(deadline, now);
        assert_eq!(
            c,
            Countdown {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
        assert_eq!(c.display(), "02:03:04:05");
        assert!(!c.is_finished());
    }

    #[test]
    fn test_countdown_saturates() {
        let now = Utc::now();
        let c = Countdown::until(now - Duration::hours(1), now);
        assert!(c.is_finished());
        assert_eq!(c.display(), "00:00:00:00");
    }

    #[test]
    fn test_carousel_wraps() {
        let mut c = Carousel::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(c.current(), Some("a"));
        assert_eq!(c.prev(), Some("c"));
        assert_eq!(c.next(), Some("a"));
        assert_eq!(c.next(), Some("b"));
        assert_eq!(c.select(9), Some("b"));
        assert_eq!(c.select(2), Some("c"));
    }

    #[test]
    fn test_empty_carousel() {
        let mut c = Carousel::new(Vec::new());
        assert_eq!(c.next(), None);
        assert_eq!(c.prev(), None);
        assert_eq!(c.index(), 0);
    }
}
