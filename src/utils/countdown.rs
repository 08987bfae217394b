use std::time::{Duration, Instant};

/// A countdown fixed to a monotonic deadline.
///
/// The deadline is computed once when the countdown starts; the time left is
/// derived by subtraction whenever it is displayed, so there is no per-tick
/// callback to drift or leak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    started: Instant,
    length: Duration,
}

impl Countdown {
    pub fn starting_at(started: Instant, length: Duration) -> Self {
        Self { started, length }
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    /// `None` when the deadline lies beyond what an `Instant` can represent
    pub fn deadline(&self) -> Option<Instant> {
        self.started.checked_add(self.length)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        match self.deadline() {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => self
                .length
                .saturating_sub(now.saturating_duration_since(self.started)),
        }
    }

    pub fn is_elapsed(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}

/// Format a duration as `MM:SS`, rounding partial seconds up
pub fn format_remaining(remaining: Duration) -> String {
    let mut secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs += 1;
    }
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// A message that disappears a fixed time after it is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    visible: Countdown,
}

impl Notice {
    pub fn new(message: impl Into<String>, shown_at: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            visible: Countdown::starting_at(shown_at, ttl),
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        !self.visible.is_elapsed(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_saturates() {
        let start = Instant::now();
        let countdown = Countdown::starting_at(start, Duration::from_secs(180));

        assert_eq!(countdown.remaining(start), Duration::from_secs(180));
        assert_eq!(
            countdown.remaining(start + Duration::from_secs(30)),
            Duration::from_secs(150)
        );
        assert_eq!(countdown.remaining(start + Duration::from_secs(600)), Duration::ZERO);
        assert!(countdown.is_elapsed(start + Duration::from_secs(180)));
    }

    #[test]
    fn test_unrepresentable_deadline_saturates() {
        let start = Instant::now();
        let countdown = Countdown::starting_at(start, Duration::MAX);

        assert_eq!(countdown.deadline(), None);
        assert_eq!(countdown.remaining(start), Duration::MAX);
        assert!(!countdown.is_elapsed(start + Duration::from_secs(3600)));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_remaining(Duration::from_secs(180)), "03:00");
        assert_eq!(format_remaining(Duration::from_millis(59_100)), "01:00");
        assert_eq!(format_remaining(Duration::ZERO), "00:00");
    }

    #[test]
    fn test_notice_expires() {
        let shown = Instant::now();
        let notice = Notice::new("done", shown, Duration::from_secs(3));

        assert!(notice.is_visible(shown + Duration::from_secs(2)));
        assert!(!notice.is_visible(shown + Duration::from_secs(3)));
    }
}
