/*!
Text forms of the calendar and duration values carried on the wire.

Durations use the ISO-8601 `PnYnMnWnDTnHnMnS` grammar. Years and months have
no fixed length, so they are read as 365 and 30 days.
*/

use super::*;
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time,
    format_description::well_known::Rfc3339, macros::format_description,
};
use winnow::{
    ModalResult, Parser,
    ascii::{dec_uint, digit1},
    combinator::{opt, preceded, terminated},
};

const SECONDS_PER_DAY: u64 = 86_400;

fn number(input: &mut &str) -> ModalResult<u64> {
    dec_uint.parse_next(input)
}

fn component(unit: char) -> impl FnMut(&mut &str) -> ModalResult<Option<u64>> {
    move |input: &mut &str| opt(terminated(number, unit)).parse_next(input)
}

/// Seconds with an optional fraction, as `(seconds, nanoseconds)`.
fn seconds(input: &mut &str) -> ModalResult<(u64, u32)> {
    (number, opt(preceded('.', digit1)))
        .map(|(whole, fraction): (u64, Option<&str>)| {
            let nanos = fraction.map_or(0, |f| {
                f.bytes()
                    .chain(std::iter::repeat(b'0'))
                    .take(9)
                    .fold(0u32, |acc, b| acc * 10 + (b - b'0') as u32)
            });
            (whole, nanos)
        })
        .parse_next(input)
}

fn parse_duration_parts(input: &mut &str) -> ModalResult<Duration> {
    (
        opt('-'),
        preceded(
            'P',
            (
                component('Y'),
                component('M'),
                component('W'),
                component('D'),
                opt(preceded(
                    'T',
                    (
                        component('H'),
                        component('M'),
                        opt(terminated(seconds, 'S')),
                    ),
                )),
            ),
        ),
    )
        .try_map(|(sign, (years, months, weeks, days, time))| {
            let (hours, minutes, seconds) = time.unwrap_or((None, None, None));
            if [years, months, weeks, days, hours, minutes].iter().all(Option::is_none)
                && seconds.is_none()
            {
                return Err(Error::InvalidDuration);
            }
            let (whole_seconds, nanos) = seconds.unwrap_or((0, 0));
            let total = [
                (years, 365 * SECONDS_PER_DAY),
                (months, 30 * SECONDS_PER_DAY),
                (weeks, 7 * SECONDS_PER_DAY),
                (days, SECONDS_PER_DAY),
                (hours, 3_600),
                (minutes, 60),
                (Some(whole_seconds), 1),
            ]
            .into_iter()
            .try_fold(0i64, |acc, (count, unit)| {
                let part = count.unwrap_or(0).checked_mul(unit)?;
                acc.checked_add(i64::try_from(part).ok()?)
            })
            .ok_or(Error::InvalidDuration)?;
            let duration = Duration::new(total, nanos as i32);
            Ok(if sign.is_some() { -duration } else { duration })
        })
        .parse_next(input)
}

/// Parses an ISO-8601 duration such as `PT1H` or `P1DT2H30M15.5S`.
pub fn parse_duration(s: &str) -> Option<Duration> {
    parse_duration_parts.parse(s).ok()
}

/// Formats a duration in the `[-]PnDTnHnMnS` form, omitting zero components.
pub fn format_duration(duration: Duration) -> String {
    let mut s = String::new();
    if duration.is_negative() {
        s.push('-');
    }
    let duration = duration.abs();
    s.push('P');

    let days = duration.whole_days();
    let hours = duration.whole_hours() % 24;
    let minutes = duration.whole_minutes() % 60;
    let seconds = duration.whole_seconds() % 60;
    let nanos = duration.subsec_nanoseconds();

    if days > 0 {
        s.push_str(&format!("{days}D"));
    }
    if days == 0 || hours > 0 || minutes > 0 || seconds > 0 || nanos > 0 {
        s.push('T');
        if hours > 0 {
            s.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            s.push_str(&format!("{minutes}M"));
        }
        if seconds > 0 || nanos > 0 || (hours == 0 && minutes == 0) {
            s.push_str(&seconds.to_string());
            if nanos > 0 {
                let fraction = format!("{nanos:09}");
                s.push('.');
                s.push_str(fraction.trim_end_matches('0'));
            }
            s.push('S');
        }
    }
    s
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> Result<String, Error> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| Error::UnrepresentableValue(e.to_string()))
}

/// Formats a time of day as `HH:MM:SS`, with a fraction only when one is present.
pub fn format_time(time: Time) -> Result<String, Error> {
    let formatted = if time.nanosecond() == 0 {
        time.format(format_description!("[hour]:[minute]:[second]"))
    } else {
        time.format(format_description!("[hour]:[minute]:[second].[subsecond]"))
    };
    formatted.map_err(|e| Error::UnrepresentableValue(e.to_string()))
}

/// Formats an instant as RFC 3339 text.
pub fn format_date_time_offset(value: OffsetDateTime) -> Result<String, Error> {
    value
        .format(&Rfc3339)
        .map_err(|e| Error::UnrepresentableValue(e.to_string()))
}

/// Parses a date, also accepting the date part of a full date-time.
pub fn parse_date(s: &str) -> Option<Date> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| OffsetDateTime::parse(s, &Rfc3339).ok().map(|v| v.date()))
        .or_else(|| parse_date_time(s).map(|v| v.date()))
}

/// Parses a time of day, also accepting the time part of a full date-time.
pub fn parse_time(s: &str) -> Option<Time> {
    Time::parse(
        s,
        format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
    .ok()
    .or_else(|| OffsetDateTime::parse(s, &Rfc3339).ok().map(|v| v.time()))
    .or_else(|| parse_date_time(s).map(|v| v.time()))
}

/// Parses a date-time with no UTC offset, such as `2024-01-31T08:00:00`.
pub fn parse_date_time(s: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
    .ok()
}

/// Parses an RFC 3339 date-time.
pub fn parse_date_time_offset(s: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(s, &Rfc3339).ok()
}
