//! Recurrence scheduling
//!
//! Next-due-date arithmetic and reminder eligibility. All calendar-day
//! comparisons are in UTC: timestamps are stored as UTC and "same day"
//! means the same UTC year/month/day. There is no local-time handling
//! anywhere in the core.

use chrono::{DateTime, Days, Months, Utc};

use crate::models::{Frequency, Transaction};

/// Compute the next occurrence after `anchor` for a recurrence rule.
///
/// Returns `None` for `Frequency::None` (the transaction is not recurring).
/// Month and year steps clamp to the last valid day of the target month:
/// Jan 31 + 1 month = Feb 28 (or Feb 29 in a leap year), never March.
pub fn next_due_date(anchor: DateTime<Utc>, frequency: Frequency) -> Option<DateTime<Utc>> {
    match frequency {
        Frequency::None => None,
        Frequency::Daily => anchor.checked_add_days(Days::new(1)),
        Frequency::Weekly => anchor.checked_add_days(Days::new(7)),
        Frequency::Monthly => anchor.checked_add_months(Months::new(1)),
        Frequency::Yearly => anchor.checked_add_months(Months::new(12)),
    }
}

/// True when both timestamps fall on the same UTC calendar day
pub fn is_same_utc_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Decide whether a transaction is eligible for a reminder at `now`.
///
/// Eligible when the transaction recurs, its next due date falls on today
/// (UTC), and no reminder has already gone out today. Decision only: the
/// caller is responsible for persisting `last_reminder_sent` after a
/// successful send.
pub fn is_due(transaction: &Transaction, now: DateTime<Utc>) -> bool {
    if !transaction.recurring.is_recurring() {
        return false;
    }
    let due = match transaction.next_due_date {
        Some(due) => due,
        None => return false,
    };
    if !is_same_utc_day(due, now) {
        return false;
    }
    match transaction.last_reminder_sent {
        Some(sent) => !is_same_utc_day(sent, now),
        None => true,
    }
}

/// Signed whole days from `now` until `due` (negative when overdue)
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due.date_naive() - now.date_naive()).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
    }

    fn recurring_tx(
        frequency: Frequency,
        next_due: Option<DateTime<Utc>>,
        last_sent: Option<DateTime<Utc>>,
    ) -> Transaction {
        Transaction {
            id: 1,
            budget_id: 1,
            name: "Rent".into(),
            amount: 1200.0,
            category: Some("Housing".into()),
            recurring: frequency,
            next_due_date: next_due,
            last_reminder_sent: last_sent,
            created_at: utc(2024, 1, 1),
        }
    }

    #[test]
    fn test_next_due_date_daily() {
        let next = next_due_date(utc(2024, 1, 15), Frequency::Daily).unwrap();
        assert_eq!(next, utc(2024, 1, 16));
    }

    #[test]
    fn test_next_due_date_weekly() {
        let next = next_due_date(utc(2024, 1, 15), Frequency::Weekly).unwrap();
        assert_eq!(next, utc(2024, 1, 22));
    }

    #[test]
    fn test_next_due_date_monthly() {
        let next = next_due_date(utc(2024, 1, 15), Frequency::Monthly).unwrap();
        assert_eq!(next, utc(2024, 2, 15));
    }

    #[test]
    fn test_next_due_date_monthly_clamps_short_months() {
        // Jan 31 + 1 month clamps to Feb 29 (2024 is a leap year)
        let next = next_due_date(utc(2024, 1, 31), Frequency::Monthly).unwrap();
        assert_eq!(next, utc(2024, 2, 29));

        // Non-leap year clamps to Feb 28
        let next = next_due_date(utc(2023, 1, 31), Frequency::Monthly).unwrap();
        assert_eq!(next, utc(2023, 2, 28));

        let next = next_due_date(utc(2024, 3, 31), Frequency::Monthly).unwrap();
        assert_eq!(next, utc(2024, 4, 30));
    }

    #[test]
    fn test_next_due_date_yearly() {
        let next = next_due_date(utc(2024, 6, 10), Frequency::Yearly).unwrap();
        assert_eq!(next, utc(2025, 6, 10));

        // Leap day clamps to Feb 28 in the following year
        let next = next_due_date(utc(2024, 2, 29), Frequency::Yearly).unwrap();
        assert_eq!(next, utc(2025, 2, 28));
    }

    #[test]
    fn test_next_due_date_always_advances() {
        let anchor = utc(2024, 1, 31);
        for freq in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ] {
            let next = next_due_date(anchor, freq).unwrap();
            assert!(next > anchor, "{} did not advance", freq);
        }
    }

    #[test]
    fn test_next_due_date_none_for_non_recurring() {
        assert!(next_due_date(utc(2024, 1, 15), Frequency::None).is_none());
        assert!(next_due_date(utc(2024, 1, 15), Frequency::parse("bogus")).is_none());
    }

    #[test]
    fn test_is_same_utc_day() {
        let morning = Utc.with_ymd_and_hms(2024, 1, 15, 0, 5, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 0).unwrap();
        assert!(is_same_utc_day(morning, night));
        assert!(!is_same_utc_day(morning, utc(2024, 1, 16)));
    }

    #[test]
    fn test_is_due_when_due_today_and_never_reminded() {
        let now = utc(2024, 2, 1);
        let tx = recurring_tx(Frequency::Monthly, Some(utc(2024, 2, 1)), None);
        assert!(is_due(&tx, now));
    }

    #[test]
    fn test_is_due_false_when_not_due_today() {
        let now = utc(2024, 2, 1);
        let tx = recurring_tx(Frequency::Monthly, Some(utc(2024, 2, 2)), None);
        assert!(!is_due(&tx, now));
    }

    #[test]
    fn test_is_due_false_when_already_reminded_today() {
        // Same-day dedup wins even when the due date matches now
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 18, 0, 0).unwrap();
        let sent = Utc.with_ymd_and_hms(2024, 2, 1, 6, 0, 0).unwrap();
        let tx = recurring_tx(Frequency::Monthly, Some(utc(2024, 2, 1)), Some(sent));
        assert!(!is_due(&tx, now));
    }

    #[test]
    fn test_is_due_true_when_reminded_on_earlier_day() {
        let now = utc(2024, 3, 1);
        let tx = recurring_tx(Frequency::Monthly, Some(utc(2024, 3, 1)), Some(utc(2024, 2, 1)));
        assert!(is_due(&tx, now));
    }

    #[test]
    fn test_is_due_false_for_non_recurring() {
        let now = utc(2024, 2, 1);
        let tx = recurring_tx(Frequency::None, None, None);
        assert!(!is_due(&tx, now));
    }

    #[test]
    fn test_is_due_false_without_due_date() {
        let now = utc(2024, 2, 1);
        let tx = recurring_tx(Frequency::Monthly, None, None);
        assert!(!is_due(&tx, now));
    }

    #[test]
    fn test_days_until() {
        let now = utc(2024, 1, 15);
        assert_eq!(days_until(utc(2024, 1, 20), now), 5);
        assert_eq!(days_until(utc(2024, 1, 15), now), 0);
        assert_eq!(days_until(utc(2024, 1, 10), now), -5);
    }
}
