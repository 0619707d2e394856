use crate::class_sessions::ClassSession;
use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike, Weekday};
use clubdesk_core::ClientError;

/// First hour slot of a day.
pub const FIRST_HOUR: u32 = 8;
/// Last hour slot of a day.
pub const LAST_HOUR: u32 = 20;
/// Monday through Saturday.
pub const DAYS_PER_WEEK: usize = 6;

/// One week of class sessions laid out as a day × hour grid.
///
/// The grid starts on Monday and ends on Saturday. Each cell holds the
/// sessions whose start hour matches the slot, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSchedule {
    monday: NaiveDate,
    cells: Vec<Vec<Vec<ClassSession>>>,
}

impl WeekSchedule {
    /// Lay out `sessions` for the week `week_offset` weeks away from the
    /// current one. On a Sunday the current week is the one starting the next
    /// day. With `activity_filter` set, only that activity's sessions are kept.
    ///
    /// Fails with [`ClientError::Validation`] when the week falls outside the
    /// supported date range.
    pub fn build(
        sessions: &[ClassSession],
        today: NaiveDate,
        week_offset: i64,
        activity_filter: Option<i64>,
    ) -> Result<Self, ClientError> {
        let monday = week_monday(today, week_offset)
            .ok_or_else(|| ClientError::Validation("week offset out of range".to_string()))?;
        let mut cells = vec![vec![Vec::new(); slot_count()]; DAYS_PER_WEEK];

        for session in sessions {
            if activity_filter.is_some_and(|id| id != session.activite.id) {
                continue;
            }
            let day = (session.date - monday).num_days();
            if !(0..DAYS_PER_WEEK as i64).contains(&day) {
                continue;
            }
            let hour = session.heure_debut.hour();
            if !(FIRST_HOUR..=LAST_HOUR).contains(&hour) {
                log::debug!(
                    "Class session {} starts at {} outside the calendar hours",
                    session.id,
                    session.heure_debut.format("%H:%M")
                );
                continue;
            }
            cells[day as usize][(hour - FIRST_HOUR) as usize].push(session.clone());
        }

        Ok(Self { monday, cells })
    }

    /// Monday of the week.
    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Saturday of the week.
    pub fn saturday(&self) -> NaiveDate {
        self.monday + TimeDelta::days(DAYS_PER_WEEK as i64 - 1)
    }

    /// The six days of the week, Monday first.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..DAYS_PER_WEEK as i64)
            .map(|d| self.monday + TimeDelta::days(d))
            .collect()
    }

    /// Slot start times, 08:00 through 20:00.
    pub fn slots(&self) -> Vec<NaiveTime> {
        (FIRST_HOUR..=LAST_HOUR)
            .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
            .collect()
    }

    /// Sessions starting on `day` during the hour beginning at `slot`.
    pub fn cell(&self, day: NaiveDate, slot: NaiveTime) -> &[ClassSession] {
        let index = (day - self.monday).num_days();
        let hour = slot.hour();
        if !(0..DAYS_PER_WEEK as i64).contains(&index) || !(FIRST_HOUR..=LAST_HOUR).contains(&hour) {
            return &[];
        }
        &self.cells[index as usize][(hour - FIRST_HOUR) as usize]
    }

    /// Number of sessions placed in the grid.
    pub fn len(&self) -> usize {
        self.cells.iter().flatten().map(Vec::len).sum()
    }

    /// Whether no session was placed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Monday of the displayed week, provided its Saturday is still a valid date.
fn week_monday(today: NaiveDate, week_offset: i64) -> Option<NaiveDate> {
    let anchor = match today.weekday() {
        Weekday::Sun => today.succ_opt()?,
        _ => today,
    };
    let monday = anchor
        .checked_sub_signed(TimeDelta::days(i64::from(anchor.weekday().num_days_from_monday())))?
        .checked_add_signed(TimeDelta::try_weeks(week_offset)?)?;
    monday.checked_add_signed(TimeDelta::days(DAYS_PER_WEEK as i64 - 1))?;
    Some(monday)
}

fn slot_count() -> usize {
    (LAST_HOUR - FIRST_HOUR + 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_sessions::ActivityRef;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn session(id: i64, activity: i64, day: NaiveDate, start: NaiveTime) -> ClassSession {
        ClassSession {
            id,
            activite: ActivityRef {
                id: activity,
                nom_act: format!("Activity {}", activity),
                code_act: format!("A{}", activity),
            },
            date: day,
            heure_debut: start,
            heure_fin: start + TimeDelta::hours(1),
        }
    }

    #[test]
    fn week_starts_on_monday() {
        // 2026-10-16 is a Friday.
        let schedule = WeekSchedule::build(&[], date(2026, 10, 16), 0, None).unwrap();
        assert_eq!(schedule.monday(), date(2026, 10, 12));
        assert_eq!(schedule.saturday(), date(2026, 10, 17));
        assert_eq!(schedule.days().len(), 6);
        assert_eq!(schedule.slots().first(), Some(&time(8, 0)));
        assert_eq!(schedule.slots().last(), Some(&time(20, 0)));
        assert_eq!(schedule.slots().len(), 13);
    }

    #[test]
    fn sunday_shows_the_coming_week() {
        let schedule = WeekSchedule::build(&[], date(2026, 10, 18), 0, None).unwrap();
        assert_eq!(schedule.monday(), date(2026, 10, 19));
        let previous = WeekSchedule::build(&[], date(2026, 10, 18), -1, None).unwrap();
        assert_eq!(previous.monday(), date(2026, 10, 12));
    }

    #[test]
    fn offset_moves_whole_weeks() {
        let today = date(2026, 10, 16);
        assert_eq!(WeekSchedule::build(&[], today, 1, None).unwrap().monday(), date(2026, 10, 19));
        assert_eq!(WeekSchedule::build(&[], today, -2, None).unwrap().monday(), date(2026, 9, 28));
    }

    #[test]
    fn huge_week_offset_is_rejected() {
        let today = date(2026, 10, 16);
        for offset in [100_000_000, -100_000_000, i64::MAX, i64::MIN] {
            match WeekSchedule::build(&[], today, offset, None) {
                Err(ClientError::Validation(message)) => {
                    assert_eq!(message, "week offset out of range")
                }
                other => panic!("unexpected result for {}: {:?}", offset, other),
            }
        }
    }

    #[test]
    fn sessions_land_by_day_and_start_hour() {
        let monday = date(2026, 10, 12);
        let sessions = vec![
            session(1, 1, monday, time(9, 30)),
            session(2, 2, monday, time(9, 0)),
            session(3, 1, date(2026, 10, 17), time(20, 15)),
        ];
        let schedule = WeekSchedule::build(&sessions, date(2026, 10, 14), 0, None).unwrap();

        let ids: Vec<i64> = schedule.cell(monday, time(9, 0)).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(schedule.cell(date(2026, 10, 17), time(20, 0))[0].id, 3);
        assert!(schedule.cell(monday, time(10, 0)).is_empty());
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn out_of_grid_sessions_are_dropped() {
        let sessions = vec![
            session(1, 1, date(2026, 10, 18), time(10, 0)),
            session(2, 1, date(2026, 10, 19), time(10, 0)),
            session(3, 1, date(2026, 10, 13), time(7, 0)),
            session(4, 1, date(2026, 10, 13), time(21, 0)),
        ];
        let schedule = WeekSchedule::build(&sessions, date(2026, 10, 12), 0, None).unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn activity_filter_keeps_one_activity() {
        let monday = date(2026, 10, 12);
        let sessions = vec![
            session(1, 1, monday, time(10, 0)),
            session(2, 2, monday, time(10, 0)),
        ];
        let schedule = WeekSchedule::build(&sessions, monday, 0, Some(2)).unwrap();
        let cell = schedule.cell(monday, time(10, 0));
        assert_eq!(cell.len(), 1);
        assert_eq!(cell[0].id, 2);
    }

    #[test]
    fn cell_outside_the_week_is_empty() {
        let schedule = WeekSchedule::build(&[], date(2026, 10, 12), 0, None).unwrap();
        assert!(schedule.cell(date(2026, 10, 18), time(10, 0)).is_empty());
        assert!(schedule.cell(date(2026, 10, 12), time(6, 0)).is_empty());
    }
}
