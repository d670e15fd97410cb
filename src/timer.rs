//! Deadline arithmetic for the two run-until timers.

/// Run time one button press adds or removes (5 minutes).
pub const TIME_QUANTUM_MS: u64 = 5 * 60 * 1000;

/// A deadline never ends up more than this far past `now` (16 minutes).
pub const TIME_MAX_MS: u64 = 16 * 60 * 1000;

/// Offset below `now` used when a deadline is forced to "just expired".
pub const EXPIRE_EPSILON_MS: u64 = 10;

/// A deadline that already reads as expired at `now_ms`.
pub fn expired_at(now_ms: u64) -> u64 {
    now_ms.saturating_sub(EXPIRE_EPSILON_MS)
}

/// Applies a signed adjustment to a channel deadline.
///
/// An expired deadline starts a fresh countdown on a positive delta and is
/// left alone by a negative one. An active deadline shifts by `delta_ms`;
/// shifting it to or below `now_ms` lands just under `now_ms` instead, so
/// the next status tick turns the channel off. The result is always capped
/// at `now_ms + TIME_MAX_MS`.
pub fn extend(off_at_ms: u64, delta_ms: i64, now_ms: u64) -> u64 {
    let shifted = if off_at_ms < now_ms {
        if delta_ms > 0 {
            now_ms.saturating_add_signed(delta_ms)
        } else {
            // Nothing left to shorten.
            off_at_ms
        }
    } else {
        let target = off_at_ms.saturating_add_signed(delta_ms);
        if delta_ms < 0 && target <= now_ms {
            expired_at(now_ms)
        } else {
            target
        }
    };
    shifted.min(now_ms.saturating_add(TIME_MAX_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 3_600_000;

    #[test]
    fn positive_delta_on_expired_deadline_starts_fresh_countdown() {
        assert_eq!(extend(NOW - 1, 300_000, NOW), NOW + 300_000);
    }

    #[test]
    fn negative_delta_on_expired_deadline_is_a_no_op() {
        assert_eq!(extend(NOW - 5_000, -300_000, NOW), NOW - 5_000);
        assert_eq!(extend(NOW - 5_000, 0, NOW), NOW - 5_000);
    }

    #[test]
    fn positive_delta_accumulates_while_active() {
        assert_eq!(extend(NOW + 290_000, 300_000, NOW), NOW + 590_000);
    }

    #[test]
    fn deadline_never_exceeds_now_plus_max() {
        // Oversized fresh start hits the cap directly.
        assert_eq!(extend(NOW - 1, 20 * 60 * 1000, NOW), NOW + TIME_MAX_MS);

        // Repeated presses pile up against the cap.
        let mut off_at = expired_at(NOW);
        for _ in 0..10 {
            off_at = extend(off_at, TIME_QUANTUM_MS as i64, NOW);
            assert!(off_at <= NOW + TIME_MAX_MS);
        }
        assert_eq!(off_at, NOW + TIME_MAX_MS);
    }

    #[test]
    fn shortening_past_now_lands_just_below_now() {
        let off_at = extend(NOW + 100_000, -300_000, NOW);
        assert!(off_at <= NOW);
        assert!(off_at > NOW - 1_000);
    }

    #[test]
    fn shortening_within_range_shifts_normally() {
        assert_eq!(extend(NOW + 400_000, -300_000, NOW), NOW + 100_000);
    }

    #[test]
    fn deadline_equal_to_now_counts_as_active() {
        // Boundary: shortening at the exact expiry instant forces the
        // deadline just below now rather than leaving it untouched.
        assert_eq!(extend(NOW, -300_000, NOW), expired_at(NOW));
    }
}
