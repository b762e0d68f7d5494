//! Splitting millisecond timestamps into calendar-like parts

use fugit::MillisDurationU64;

/// Time since boot broken down into days, hours, minutes, seconds and
/// milliseconds
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Elapsed {
    /// Whole days
    pub days: u32,
    /// Hours of the current day, 0..24
    pub hours: u32,
    /// Minutes of the current hour, 0..60
    pub minutes: u32,
    /// Seconds of the current minute, 0..60
    pub seconds: u32,
    /// Milliseconds of the current second, 0..1000
    pub millis: u32,
}

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

impl Elapsed {
    /// Splits `duration`. Day counts beyond `u32::MAX` wrap.
    pub fn from_duration(duration: MillisDurationU64) -> Self {
        let millis = duration.ticks();
        let total_seconds = millis / 1000;
        Self {
            days: (total_seconds / SECONDS_PER_DAY) as u32,
            hours: ((total_seconds % SECONDS_PER_DAY) / 3600) as u32,
            minutes: ((total_seconds % 3600) / 60) as u32,
            seconds: (total_seconds % 60) as u32,
            millis: (millis % 1000) as u32,
        }
    }

    /// Splits a raw millisecond count
    pub fn from_millis(millis: u64) -> Self {
        Self::from_duration(MillisDurationU64::millis(millis))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!(Elapsed::from_millis(0), Elapsed::default());
    }

    #[test]
    fn all_parts() {
        // 2 days, 3 hours, 4 minutes, 5 seconds, 678 ms
        let ms = ((2 * 24 + 3) * 3600 + 4 * 60 + 5) * 1000 + 678;
        assert_eq!(
            Elapsed::from_millis(ms),
            Elapsed {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
                millis: 678,
            }
        );
    }

    #[test]
    fn just_below_a_day() {
        let e = Elapsed::from_duration(
            MillisDurationU64::secs(SECONDS_PER_DAY) - MillisDurationU64::millis(1),
        );
        assert_eq!(e.days, 0);
        assert_eq!(e.hours, 23);
        assert_eq!(e.minutes, 59);
        assert_eq!(e.seconds, 59);
        assert_eq!(e.millis, 999);
    }
}
