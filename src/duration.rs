//! ISO-8601 durations as returned by the YouTube Data API.
//!
//! Calendar units are approximated: a month is 30 days, a year 365 days.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{Result, ScrapeError};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

static ISO8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:[.,]\d+)?S)?)?$",
    )
    .expect("valid regex")
});

/// Parse `PnYnMnWnDTnHnMnS` into a total elapsed duration.
///
/// Fractional seconds are truncated.
pub fn parse_iso8601(value: &str) -> Result<Duration> {
    let invalid = || ScrapeError::InvalidDuration(value.to_string());

    let caps = ISO8601.captures(value.trim()).ok_or_else(invalid)?;
    // "P" and "PT" alone carry no designator
    if caps.iter().skip(1).all(|c| c.is_none()) {
        return Err(invalid());
    }

    let units = [YEAR, MONTH, WEEK, DAY, HOUR, MINUTE, 1];
    let mut total: u64 = 0;
    for (idx, unit) in units.iter().enumerate() {
        let Some(m) = caps.get(idx + 1) else {
            continue;
        };
        let n: u64 = m.as_str().parse().map_err(|_| invalid())?;
        total = n
            .checked_mul(*unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(invalid)?;
    }

    Ok(Duration::from_secs(total))
}

/// Render as `{h}h{mm}m{ss}s`, dropping the hour part when it is zero.
///
/// Minutes and seconds are zero-padded whenever a larger unit is shown:
/// `54s`, `3m54s`, `3m05s`, `1h00m05s`.
pub fn format_compact(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / HOUR;
    let minutes = (secs % HOUR) / MINUTE;
    let seconds = secs % MINUTE;

    if hours > 0 {
        format!("{hours}h{minutes:02}m{seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: &str) -> String {
        format_compact(parse_iso8601(value).unwrap())
    }

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(fmt("PT3M54S"), "3m54s");
        assert_eq!(fmt("PT3M5S"), "3m05s");
        assert_eq!(fmt("PT45S"), "45s");
    }

    #[test]
    fn hour_component_pads_lower_units() {
        assert_eq!(fmt("PT1H0M5S"), "1h00m05s");
        assert_eq!(fmt("PT2H"), "2h00m00s");
        assert_eq!(fmt("PT10H30M"), "10h30m00s");
    }

    #[test]
    fn calendar_units_use_fixed_lengths() {
        assert_eq!(parse_iso8601("P1D").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_iso8601("P1M").unwrap(), Duration::from_secs(30 * 86_400));
        assert_eq!(parse_iso8601("P1Y").unwrap(), Duration::from_secs(365 * 86_400));
        assert_eq!(parse_iso8601("P1W").unwrap(), Duration::from_secs(7 * 86_400));
        assert_eq!(fmt("P1DT1M"), "24h01m00s");
    }

    #[test]
    fn month_and_minute_designators_are_distinguished() {
        assert_eq!(
            parse_iso8601("P1MT1M").unwrap(),
            Duration::from_secs(30 * 86_400 + 60)
        );
    }

    #[test]
    fn zero_length_live_streams() {
        assert_eq!(fmt("P0D"), "0s");
        assert_eq!(fmt("PT0S"), "0s");
    }

    #[test]
    fn fractional_seconds_truncate() {
        assert_eq!(fmt("PT1M2.75S"), "1m02s");
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "P", "PT", "3M54S", "PT3X", "garbage", "PT1H2"] {
            assert!(
                matches!(parse_iso8601(bad), Err(ScrapeError::InvalidDuration(_))),
                "{bad} should be rejected"
            );
        }
    }
}
