//! In-game clock arithmetic and the time-speed rules built on it.

use serde::{Deserialize, Serialize};

use crate::constants::{NIGHT_END_HOUR, NIGHT_SPEED_MULTIPLIER, NIGHT_START_HOUR};

/// Day / hour / minute triple. Days start at 1 and never roll over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    pub day: u32,
    pub hour: u8,
    pub minute: u8,
}

impl SimClock {
    /// A new game starts on day 1 at 06:00.
    pub fn new() -> Self {
        Self {
            day: 1,
            hour: 6,
            minute: 0,
        }
    }

    pub fn at(day: u32, hour: u8, minute: u8) -> Self {
        Self {
            day: day.max(1),
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    /// Advances the clock by whole minutes, rolling hours and days.
    pub fn advance_minutes(&mut self, minutes: u32) {
        let total = self.minute as u32 + minutes;
        self.minute = (total % 60) as u8;
        let hours = self.hour as u32 + total / 60;
        self.hour = (hours % 24) as u8;
        self.day += hours / 24;
    }

    /// True exactly at midnight, when a new calendar day begins.
    pub fn is_new_day(&self) -> bool {
        self.hour == 0 && self.minute == 0
    }

    /// "HH:MM".
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// "Day D, HH:MM".
    pub fn full_time_string(&self) -> String {
        format!("Day {}, {:02}:{:02}", self.day, self.hour, self.minute)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

/// True inside the accelerated window (20:00 up to 06:00).
pub fn is_night(hour: u8) -> bool {
    hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR
}

/// Clock speed for the current hour: 10x at night or while the nursery
/// is under patrol protection, 1x otherwise.
pub fn speed_multiplier(hour: u8, protected: bool) -> f32 {
    if is_night(hour) || protected {
        NIGHT_SPEED_MULTIPLIER
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_within_hour() {
        let mut clock = SimClock::at(1, 10, 0);
        clock.advance_minutes(75);
        assert_eq!(clock, SimClock::at(1, 11, 15));
    }

    #[test]
    fn test_advance_rolls_days() {
        // 1500 minutes = 25 hours = one day plus 60 minutes.
        let mut clock = SimClock::at(1, 10, 0);
        clock.advance_minutes(1500);
        assert_eq!(clock, SimClock::at(2, 11, 0));
    }

    #[test]
    fn test_advance_across_midnight() {
        let mut clock = SimClock::at(3, 23, 59);
        clock.advance_minutes(1);
        assert_eq!(clock, SimClock::at(4, 0, 0));
        assert!(clock.is_new_day());
    }

    #[test]
    fn test_night_window() {
        assert!(is_night(20));
        assert!(is_night(23));
        assert!(is_night(0));
        assert!(is_night(5));
        assert!(!is_night(6));
        assert!(!is_night(12));
        assert!(!is_night(19));
    }

    #[test]
    fn test_speed_multiplier() {
        assert_eq!(speed_multiplier(12, false), 1.0);
        assert_eq!(speed_multiplier(22, false), 10.0);
        // Protection accelerates even at midday.
        assert_eq!(speed_multiplier(12, true), 10.0);
    }

    #[test]
    fn test_time_strings() {
        let clock = SimClock::at(5, 14, 30);
        assert_eq!(clock.time_string(), "14:30");
        assert_eq!(clock.full_time_string(), "Day 5, 14:30");
    }
}
