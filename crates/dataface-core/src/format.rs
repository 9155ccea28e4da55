//! Date and time label formatting

use core::fmt::Write;

use heapless::String;
use time::{Date, Month, Time, Weekday};

/// Placeholder for a clock time that has not been computed yet.
pub const TIME_PLACEHOLDER: &str = "--:--";

/// `HH:MM:SS`
pub fn time_hms(time: Time) -> String<8> {
    let mut out = String::new();
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    );
    out
}

/// `HH:MM`
pub fn time_hm(time: Time) -> String<5> {
    let mut out = String::new();
    let _ = write!(out, "{:02}:{:02}", time.hour(), time.minute());
    out
}

/// `Ddd, Mmm DD`, e.g. `Sat, Oct 17`
pub fn date_short(date: Date) -> String<11> {
    let mut out = String::new();
    let _ = write!(
        out,
        "{}, {} {:02}",
        weekday_abbrev(date.weekday()),
        month_abbrev(date.month()),
        date.day()
    );
    out
}

pub const fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Sunday => "Sun",
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
    }
}

pub const fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn pads_time_fields() {
        assert_eq!(time_hms(time!(7:05:09)).as_str(), "07:05:09");
        assert_eq!(time_hms(time!(23:59:59)).as_str(), "23:59:59");
        assert_eq!(time_hm(time!(0:00)).as_str(), "00:00");
        assert_eq!(time_hm(time!(18:42:31)).as_str(), "18:42");
    }

    #[test]
    fn short_date() {
        assert_eq!(date_short(date!(2026 - 10 - 17)).as_str(), "Sat, Oct 17");
        assert_eq!(date_short(date!(2024 - 03 - 04)).as_str(), "Mon, Mar 04");
    }
}
