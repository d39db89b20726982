// src/scheduler.rs
//
// Cron-style driver: full pipeline once daily at 02:00 KST, closed-hospital
// recheck every 6 hours. Next-fire computation is pure so it can be tested
// without waiting for real time to pass; the loop itself just sleeps and
// dispatches. A failed run is logged and abandoned — the next tick starts
// fresh.

use crate::pipeline::Pipeline;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::time::Duration as StdDuration;

pub const DAILY_FIRE_HOUR: u32 = 2;
pub const RECHECK_INTERVAL_HOURS: i64 = 6;

/// Both registries and all subscription filters live in Korean wall-clock
/// terms; the schedule is pinned to KST regardless of host timezone.
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// The next 02:00 KST strictly after `now`.
pub fn next_daily_fire(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let two_am = now
        .date_naive()
        .and_hms_opt(DAILY_FIRE_HOUR, 0, 0)
        .unwrap()
        .and_local_timezone(now.timezone())
        .unwrap();
    if two_am > now {
        two_am
    } else {
        two_am + Duration::days(1)
    }
}

/// Blocking scheduler loop; never returns. `crawl --now` bypasses this and
/// runs the pipeline directly.
pub fn run_loop(pipeline: &Pipeline) -> ! {
    let tz = kst();
    let mut next_recheck = Utc::now().with_timezone(&tz) + Duration::hours(RECHECK_INTERVAL_HOURS);

    println!("⏰ Scheduler started (daily 02:00 KST, recheck every {RECHECK_INTERVAL_HOURS}h)");

    loop {
        let now = Utc::now().with_timezone(&tz);
        let next_daily = next_daily_fire(now);
        let daily_first = next_daily <= next_recheck;
        let fire_at = if daily_first { next_daily } else { next_recheck };

        let wait = (fire_at - now).to_std().unwrap_or(StdDuration::ZERO);
        std::thread::sleep(wait);

        if daily_first {
            println!("⏰ Daily pipeline run firing");
            if let Err(e) = pipeline.run_full() {
                eprintln!("❌ Daily pipeline run failed: {e}");
            }
        } else {
            println!("⏰ Closed-hospital recheck firing");
            if let Err(e) = pipeline.run_recheck() {
                eprintln!("❌ Recheck run failed: {e}");
            }
            next_recheck = fire_at + Duration::hours(RECHECK_INTERVAL_HOURS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        kst().with_ymd_and_hms(2026, 8, 30, h, m, 0).unwrap()
    }

    #[test]
    fn test_next_daily_fire_before_2am_is_today() {
        let next = next_daily_fire(at(1, 30));
        assert_eq!(next, at(2, 0));
    }

    #[test]
    fn test_next_daily_fire_after_2am_is_tomorrow() {
        let next = next_daily_fire(at(14, 0));
        assert_eq!(next, kst().with_ymd_and_hms(2026, 8, 31, 2, 0, 0).unwrap());
    }

    #[test]
    fn test_next_daily_fire_at_exactly_2am_is_tomorrow() {
        let next = next_daily_fire(at(2, 0));
        assert_eq!(next, kst().with_ymd_and_hms(2026, 8, 31, 2, 0, 0).unwrap());
    }
}
