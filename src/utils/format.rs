//! Formatting utilities for timestamps and other display values.
//!
//! Timestamps are milliseconds since the Unix epoch, always rendered in UTC.

const MS_PER_DAY: i64 = 86_400_000;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Current wall-clock time in milliseconds since the epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// Current wall-clock time in milliseconds since the epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Check if a year is a leap year.
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_in_month(year: i64, month: u32) -> i64 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Split a day count since the epoch into (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let mut year = 1970i64;
    let mut remaining = days;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining < days_in_year {
            break;
        }
        remaining -= days_in_year;
        year += 1;
    }

    let mut month = 1u32;
    while remaining >= days_in_month(year, month) {
        remaining -= days_in_month(year, month);
        month += 1;
    }

    (year, month, remaining as u32 + 1)
}

fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let mut days = 0i64;
    for y in 1970..year {
        days += if is_leap_year(y) { 366 } else { 365 };
    }
    for m in 1..month {
        days += days_in_month(year, m);
    }
    days + i64::from(day) - 1
}

struct Civil {
    year: i64,
    month: u32,
    day: u32,
    hour: u64,
    minute: u64,
    second: u64,
    millis: u64,
    weekday: usize,
}

fn civil(timestamp_ms: u64) -> Civil {
    let days = timestamp_ms as i64 / MS_PER_DAY;
    let (year, month, day) = civil_from_days(days);
    let in_day = timestamp_ms % MS_PER_DAY as u64;
    Civil {
        year,
        month,
        day,
        hour: in_day / 3_600_000,
        minute: (in_day / 60_000) % 60,
        second: (in_day / 1000) % 60,
        millis: in_day % 1000,
        weekday: ((days + 4) % 7) as usize,
    }
}

/// Format a timestamp as ISO-8601 (`2025-01-01T00:00:00.000Z`).
pub fn format_iso(timestamp_ms: u64) -> String {
    let c = civil(timestamp_ms);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        c.year, c.month, c.day, c.hour, c.minute, c.second, c.millis
    )
}

/// Latest year [`parse_iso`] accepts.
const MAX_YEAR: i64 = 9999;

/// Parse an ISO-8601 date or date-time back into a timestamp.
///
/// Accepts `YYYY-MM-DD`, optionally followed by `THH:MM[:SS[.fff]]` and a
/// `Z` or `±HH:MM` offset. Years outside 1970..=9999 are rejected.
pub fn parse_iso(input: &str) -> Option<u64> {
    let input = input.trim();
    let (date, time) = match input.split_once(['T', ' ']) {
        Some((d, t)) => (d, Some(t)),
        None => (input, None),
    };

    let mut parts = date.splitn(3, '-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if !(1970..=MAX_YEAR).contains(&year)
        || !(1..=12).contains(&month)
        || day == 0
        || i64::from(day) > days_in_month(year, month)
    {
        return None;
    }

    let mut ms = days_from_civil(year, month, day).checked_mul(MS_PER_DAY)?;

    if let Some(time) = time {
        let (clock, offset_ms) = split_offset(time)?;
        let (hms, fraction) = match clock.split_once('.') {
            Some((hms, f)) => (hms, Some(f)),
            None => (clock, None),
        };
        let mut fields = hms.split(':');
        let hour: i64 = fields.next()?.parse().ok()?;
        let minute: i64 = fields.next()?.parse().ok()?;
        let second: i64 = match fields.next() {
            Some(s) => s.parse().ok()?,
            None => 0,
        };
        if fields.next().is_some() || hour > 23 || minute > 59 || second > 60 {
            return None;
        }
        let millis: i64 = match fraction {
            Some(f) if !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()) => {
                let digits: String = f.chars().chain("00".chars()).take(3).collect();
                digits.parse().ok()?
            }
            Some(_) => return None,
            None => 0,
        };
        let clock_ms = ((hour * 60 + minute) * 60 + second) * 1000 + millis;
        ms = ms.checked_add(clock_ms)?.checked_sub(offset_ms)?;
    }

    u64::try_from(ms).ok()
}

/// Separate a trailing `Z` / `±HH:MM` offset from the clock part.
fn split_offset(time: &str) -> Option<(&str, i64)> {
    if let Some(clock) = time.strip_suffix('Z') {
        return Some((clock, 0));
    }
    if let Some(pos) = time.rfind(['+', '-']) {
        let (clock, offset) = time.split_at(pos);
        let sign = if offset.starts_with('-') { -1 } else { 1 };
        let (h, m) = offset[1..].split_once(':').unwrap_or((&offset[1..], "0"));
        let h: i64 = h.parse().ok()?;
        let m: i64 = m.parse().ok()?;
        if !(0..=23).contains(&h) || !(0..=59).contains(&m) {
            return None;
        }
        return Some((clock, sign * (h * 60 + m) * 60_000));
    }
    Some((time, 0))
}

/// Format a timestamp for `ls -l` (e.g., "Jan  3 2025").
pub fn format_listing_date(timestamp_ms: u64) -> String {
    let c = civil(timestamp_ms);
    format!("{} {:2} {}", MONTHS[c.month as usize - 1], c.day, c.year)
}

/// Format a timestamp the way `date` prints it.
pub fn format_date_long(timestamp_ms: u64) -> String {
    let c = civil(timestamp_ms);
    format!(
        "{} {} {:02} {} {:02}:{:02}:{:02} GMT+0000 (Coordinated Universal Time)",
        WEEKDAYS[c.weekday],
        MONTHS[c.month as usize - 1],
        c.day,
        c.year,
        c.hour,
        c.minute,
        c.second
    )
}

/// Truncate a value for single-line display.
pub fn truncate_display(value: &str, max: usize, preview: usize) -> String {
    if value.chars().count() > max {
        let head: String = value.chars().take(preview).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_2025: u64 = 1_735_689_600_000;

    #[test]
    fn test_format_iso() {
        assert_eq!(format_iso(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_iso(JAN_1_2025), "2025-01-01T00:00:00.000Z");
        assert_eq!(format_iso(951_782_400_123), "2000-02-29T00:00:00.123Z");
    }

    #[test]
    fn test_parse_iso_forms() {
        assert_eq!(parse_iso("2025-01-01"), Some(JAN_1_2025));
        assert_eq!(parse_iso("2025-01-01T00:00:00.000Z"), Some(JAN_1_2025));
        assert_eq!(parse_iso("2025-01-01T01:30:00+01:30"), Some(JAN_1_2025));
        assert_eq!(parse_iso("2025-01-01T00:00:01.5Z"), Some(JAN_1_2025 + 1500));
    }

    #[test]
    fn test_parse_iso_rejects_garbage() {
        assert_eq!(parse_iso(""), None);
        assert_eq!(parse_iso("yesterday"), None);
        assert_eq!(parse_iso("2025-13-01"), None);
        assert_eq!(parse_iso("2023-02-29"), None);
        assert_eq!(parse_iso("1969-12-31"), None);
        assert_eq!(parse_iso("2025-01-01T25:00:00Z"), None);
    }

    #[test]
    fn test_parse_iso_rejects_out_of_range() {
        assert_eq!(parse_iso("99999999999-01-01"), None);
        assert_eq!(parse_iso("10000-01-01"), None);
        assert_eq!(parse_iso("2025-01-01T00:00+922337203685477580:00"), None);
        assert_eq!(parse_iso("2025-01-01T00:00+05:99"), None);
        assert!(parse_iso("9999-12-31T23:59:59.999Z").is_some());
        assert_eq!(parse_iso("2025-01-01T05:30+05:30"), Some(1_735_689_600_000));
    }

    #[test]
    fn test_iso_round_trip() {
        let ts = 1_760_620_496_789;
        assert_eq!(parse_iso(&format_iso(ts)), Some(ts));
    }

    #[test]
    fn test_format_listing_date() {
        assert_eq!(format_listing_date(JAN_1_2025 + 2 * 86_400_000), "Jan  3 2025");
    }

    #[test]
    fn test_format_date_long() {
        assert_eq!(
            format_date_long(JAN_1_2025 + 45_296_000),
            "Wed Jan 01 2025 12:34:56 GMT+0000 (Coordinated Universal Time)"
        );
    }

    #[test]
    fn test_truncate_display() {
        assert_eq!(truncate_display("short", 10, 7), "short");
        assert_eq!(truncate_display("abcdefghijk", 10, 7), "abcdefg...");
    }
}
