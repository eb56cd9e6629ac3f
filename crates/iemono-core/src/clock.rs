use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Where "today" comes from
///
/// Everything date-dependent takes its date from a `Clock` rather than reading
/// the wall clock, so tests can pin the calendar.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// Current instant, used for created/updated timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date as the user sees it (naive local date)
    fn today(&self) -> NaiveDate;
}

/// The real wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        // Noon keeps the timestamp on the same date in every sane offset
        Utc.from_utc_datetime(&self.today.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()))
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let clock = FixedClock::new(day);

        assert_eq!(clock.today(), day);
        assert_eq!(clock.today(), clock.today());
        assert_eq!(clock.now().date_naive(), day);
    }
}
