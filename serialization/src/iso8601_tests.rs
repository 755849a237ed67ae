use super::*;
use iso8601::*;
use time::{
    Duration,
    macros::{date, datetime, time},
};

#[test]
fn durations() {
    assert_eq!(parse_duration("PT1H"), Some(Duration::hours(1)));
    assert_eq!(
        parse_duration("P1DT2H30M15.5S"),
        Some(Duration::days(1) + Duration::hours(2) + Duration::minutes(30) + Duration::milliseconds(15_500))
    );
    assert_eq!(parse_duration("P2W"), Some(Duration::days(14)));
    assert_eq!(parse_duration("P1Y2M"), Some(Duration::days(365 + 60)));
    assert_eq!(parse_duration("-PT90S"), Some(Duration::seconds(-90)));
    assert_eq!(parse_duration("PT0S"), Some(Duration::ZERO));

    assert_eq!(parse_duration(""), None);
    assert_eq!(parse_duration("P"), None);
    assert_eq!(parse_duration("PT"), None);
    assert_eq!(parse_duration("1H"), None);
    assert_eq!(parse_duration("PT1H "), None);
    assert_eq!(parse_duration("P99999999999999999999D"), None);
}

#[test]
fn duration_text() {
    assert_eq!(format_duration(Duration::hours(1)), "PT1H");
    assert_eq!(format_duration(Duration::ZERO), "PT0S");
    assert_eq!(format_duration(Duration::days(1)), "P1D");
    assert_eq!(
        format_duration(Duration::days(1) + Duration::minutes(5) + Duration::milliseconds(250)),
        "P1DT5M0.25S"
    );
    assert_eq!(format_duration(Duration::seconds(-90)), "-PT1M30S");

    for text in ["PT1H", "P3DT4H5M6S", "PT0.000000001S", "-P1D"] {
        let d = parse_duration(text).unwrap();
        assert_eq!(format_duration(d), text);
    }
}

#[test]
fn dates_and_times() {
    assert_eq!(format_date(date!(2017 - 09 - 04)).unwrap(), "2017-09-04");
    assert_eq!(parse_date("2017-09-04"), Some(date!(2017 - 09 - 04)));
    assert_eq!(parse_date("2017-09-04T08:00:00Z"), Some(date!(2017 - 09 - 04)));
    assert_eq!(parse_date("04/09/2017"), None);

    assert_eq!(format_time(time!(08:00:00)).unwrap(), "08:00:00");
    assert_eq!(format_time(time!(08:00:00.25)).unwrap(), "08:00:00.25");
    assert_eq!(parse_time("08:00:00"), Some(time!(08:00:00)));
    assert_eq!(parse_time("17:30:15.125"), Some(time!(17:30:15.125)));
    assert_eq!(parse_time("2017-09-04T08:00:00"), Some(time!(08:00:00)));
    assert_eq!(parse_time("25:00:00"), None);

    assert_eq!(
        parse_date_time("2024-01-31T08:00:00"),
        Some(datetime!(2024-01-31 08:00:00))
    );
    assert_eq!(parse_date_time("2024-01-31T08:00:00Z"), None);
    assert_eq!(
        parse_date_time_offset("2024-01-31T08:00:00+01:00"),
        Some(datetime!(2024-01-31 07:00:00 UTC))
    );
    assert_eq!(
        format_date_time_offset(datetime!(2024-01-31 08:00:00 UTC)).unwrap(),
        "2024-01-31T08:00:00Z"
    );
    let before_year_zero = time::Date::from_calendar_date(-1, time::Month::January, 1)
        .unwrap()
        .midnight()
        .assume_utc();
    assert!(format_date_time_offset(before_year_zero).is_err());
}
