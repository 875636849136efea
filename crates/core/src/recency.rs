//! Freshness scoring: exponential decay with a 6-day half-life, clamped to
//! zero past the 14-day TTL. All naive timestamps are read as Singapore
//! local time (UTC+8).

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use eldermem_shared::AppError;

pub const TTL_DAYS: f64 = 14.0;
pub const HALF_LIFE_DAYS: f64 = 6.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Singapore timezone (UTC+8).
#[must_use]
pub fn sgt() -> FixedOffset {
  FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset")
}

/// Parse a stored timestamp string: RFC 3339 / ISO 8601 first, then the
/// bare `YYYY-MM-DD HH:MM:SS` shape some rows carry. Naive values are
/// attached to SGT.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, AppError> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.with_timezone(&sgt()));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
    return Ok(attach_sgt(naive));
  }
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
    .map(attach_sgt)
    .map_err(|_| AppError::validation(format!("unparseable timestamp: {raw}")))
}

fn attach_sgt(naive: NaiveDateTime) -> DateTime<FixedOffset> {
  naive
    .and_local_timezone(sgt())
    .single()
    // Fixed offsets have no gaps; this arm is unreachable in practice
    .unwrap_or_else(|| Utc::now().with_timezone(&sgt()))
}

/// Decay score for a record timestamp against an explicit reference time.
#[must_use]
pub fn score_at(record: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> f64 {
  let age_days = (now - record).num_seconds() as f64 / SECONDS_PER_DAY;

  if age_days > TTL_DAYS {
    return 0.0;
  }
  let decay_constant = std::f64::consts::LN_2 / HALF_LIFE_DAYS;
  round4((-decay_constant * age_days.max(0.0)).exp())
}

/// Decay score for a naive record timestamp (read as SGT) against now.
#[must_use]
pub fn score(record: NaiveDateTime) -> f64 {
  score_at(attach_sgt(record), Utc::now().with_timezone(&sgt()))
}

fn round4(value: f64) -> f64 {
  (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, NaiveDate};

  use super::*;

  fn now_sgt() -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(2025, 10, 15)
      .unwrap()
      .and_hms_opt(12, 0, 0)
      .unwrap()
      .and_local_timezone(sgt())
      .single()
      .unwrap()
  }

  #[test]
  fn fresh_record_scores_one() {
    let now = now_sgt();
    assert_eq!(score_at(now, now), 1.0);
  }

  #[test]
  fn half_life_halves_the_score() {
    let now = now_sgt();
    let at_half_life = now - Duration::days(6);
    assert!((score_at(at_half_life, now) - 0.5).abs() < 1e-4);
  }

  #[test]
  fn exactly_fourteen_days_is_still_positive() {
    let now = now_sgt();
    let at_ttl = now - Duration::days(14);
    let s = score_at(at_ttl, now);
    assert!(s > 0.0);
    // 2^(-14/6)
    assert!((s - 0.1984).abs() < 1e-4);
  }

  #[test]
  fn past_fourteen_days_is_zero() {
    let now = now_sgt();
    let expired = now - Duration::days(14) - Duration::seconds(9);
    assert_eq!(score_at(expired, now), 0.0);

    let ancient = now - Duration::days(200);
    assert_eq!(score_at(ancient, now), 0.0);
  }

  #[test]
  fn future_timestamps_clamp_to_one() {
    let now = now_sgt();
    let skewed = now + Duration::minutes(5);
    assert_eq!(score_at(skewed, now), 1.0);
  }

  #[test]
  fn scores_are_rounded_to_four_decimals() {
    let now = now_sgt();
    let record = now - Duration::days(1);
    let s = score_at(record, now);
    assert_eq!(s, (s * 10_000.0).round() / 10_000.0);
  }

  #[test]
  fn parses_rfc3339_and_bare_shapes() {
    let a = parse_timestamp("2025-10-15T12:00:00+08:00").unwrap();
    let b = parse_timestamp("2025-10-15T12:00:00").unwrap();
    let c = parse_timestamp("2025-10-15 12:00:00").unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
  }

  #[test]
  fn naive_strings_are_read_as_sgt() {
    let parsed = parse_timestamp("2025-10-15 12:00:00").unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 8 * 3600);
  }

  #[test]
  fn garbage_is_rejected() {
    assert!(parse_timestamp("last tuesday").is_err());
  }
}
