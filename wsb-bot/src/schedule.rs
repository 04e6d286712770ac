//! Scheduled weekly leaderboard post
//!
//! Posts the weekly leaderboard to every announce chat on the configured
//! weekdays at a fixed UTC time.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc, Weekday};
use tracing::{error, info, warn};
use wsb_common::config::ScheduleConfig;
use wsb_common::time::now;

use crate::error::Result;
use crate::render::render_weekly;
use crate::state::BotContext;
use crate::telegram::Messenger;

/// Weekdays and time of day (UTC) of the weekly post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: Vec<Weekday>,
    time: NaiveTime,
}

impl WeeklySchedule {
    pub fn new(days: Vec<Weekday>, time: NaiveTime) -> Self {
        Self { days, time }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(config.days.clone(), config.time)
    }

    pub fn is_enabled(&self) -> bool {
        !self.days.is_empty()
    }

    /// First fire time strictly after `after`, `None` when no days are set
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start = after.date_naive();
        // Eight days covers "same weekday, but the time already passed"
        (0..=7u64)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .filter(|date| self.days.contains(&date.weekday()))
            .map(|date| date.and_time(self.time).and_utc())
            .find(|candidate| *candidate > after)
    }
}

/// Send the weekly leaderboard for `today` to every chat
///
/// Chats are attempted independently; the last failure is returned.
pub async fn post_weekly(
    ctx: &BotContext,
    messenger: &dyn Messenger,
    chats: &[i64],
    today: NaiveDate,
) -> Result<()> {
    let weekly = ctx.weekly(today).await?;
    let text = render_weekly(&weekly);
    info!(
        start = weekly.window.start,
        end = weekly.window.end,
        users = weekly.leaderboard.len(),
        chats = chats.len(),
        "Posting weekly leaderboard"
    );

    let mut result = Ok(());
    for &chat_id in chats {
        if let Err(e) = messenger.send_message(chat_id, &text).await {
            warn!(chat_id, error = %e, "Weekly leaderboard not delivered");
            result = Err(e);
        }
    }
    result
}

/// Sleep until each fire time and post, forever
pub async fn run(
    ctx: Arc<BotContext>,
    messenger: Arc<dyn Messenger>,
    chats: Vec<i64>,
    schedule: WeeklySchedule,
) {
    loop {
        let current = now();
        let Some(next) = schedule.next_after(current) else {
            info!("Weekly leaderboard schedule disabled");
            return;
        };
        info!(next = %next, "Next weekly leaderboard scheduled");

        let wait = (next - current).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        if let Err(e) = post_weekly(&ctx, messenger.as_ref(), &chats, next.date_naive()).await {
            error!(error = %e, "Weekly leaderboard post failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn friday_four_am() -> WeeklySchedule {
        WeeklySchedule::new(vec![Weekday::Fri], NaiveTime::from_hms_opt(4, 0, 0).unwrap())
    }

    #[test]
    fn test_next_after_later_in_week() {
        // 2022-02-14 is a Monday
        let next = friday_four_am().next_after(at("2022-02-14T12:00:00Z"));
        assert_eq!(next, Some(at("2022-02-18T04:00:00Z")));
    }

    #[test]
    fn test_next_after_same_day_before_time() {
        let next = friday_four_am().next_after(at("2022-02-18T03:59:59Z"));
        assert_eq!(next, Some(at("2022-02-18T04:00:00Z")));
    }

    #[test]
    fn test_next_after_same_day_after_time() {
        let next = friday_four_am().next_after(at("2022-02-18T04:00:00Z"));
        assert_eq!(next, Some(at("2022-02-25T04:00:00Z")));
    }

    #[test]
    fn test_next_after_picks_nearest_day() {
        let schedule = WeeklySchedule::new(
            vec![Weekday::Fri, Weekday::Mon],
            NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
        );
        let next = schedule.next_after(at("2022-02-19T00:00:00Z"));
        assert_eq!(next, Some(at("2022-02-21T18:30:00Z")));
    }

    #[test]
    fn test_disabled_schedule() {
        let schedule = WeeklySchedule::new(Vec::new(), NaiveTime::from_hms_opt(4, 0, 0).unwrap());
        assert!(!schedule.is_enabled());
        assert_eq!(schedule.next_after(at("2022-02-14T12:00:00Z")), None);
    }

    #[test]
    fn test_from_default_config() {
        let schedule = WeeklySchedule::from_config(&ScheduleConfig::default());
        assert_eq!(schedule, friday_four_am());
    }
}
