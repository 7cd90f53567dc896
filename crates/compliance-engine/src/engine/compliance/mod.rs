//! Statutory arithmetic.
//!
//! Pure functions for the numeric and date-sensitive parts of compliance
//! rules: minimum-notice-period expiry dates, deposit caps, and arrears
//! thresholds. Every function that depends on case facts takes them as
//! explicit `Option`s and returns [`Computation`] — a missing input yields
//! `InsufficientData`, never a defaulted value that could mask an unanswered
//! question. The reference date is always passed in by the caller; nothing
//! here reads the system clock.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often rent falls due. Parsed leniently from wizard answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentFrequency {
    Weekly,
    Fortnightly,
    FourWeekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl RentFrequency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" | "per week" | "pw" => Some(Self::Weekly),
            "fortnightly" | "fortnight" | "biweekly" => Some(Self::Fortnightly),
            "four_weekly" | "four-weekly" | "4-weekly" | "4 weekly" => Some(Self::FourWeekly),
            "monthly" | "month" | "per month" | "pcm" => Some(Self::Monthly),
            "quarterly" | "quarter" => Some(Self::Quarterly),
            "yearly" | "annually" | "annual" | "per year" | "pa" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Payment periods in a year.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            RentFrequency::Weekly => 52.0,
            RentFrequency::Fortnightly => 26.0,
            RentFrequency::FourWeekly => 13.0,
            RentFrequency::Monthly => 12.0,
            RentFrequency::Quarterly => 4.0,
            RentFrequency::Yearly => 1.0,
        }
    }
}

/// Result of a fact-dependent computation. `InsufficientData` names the
/// canonical keys that were missing so callers can surface a useful prompt;
/// it must never be escalated into a blocking issue.
#[derive(Debug, Clone, PartialEq)]
pub enum Computation<T> {
    Value(T),
    InsufficientData { missing: Vec<&'static str> },
}

impl<T> Computation<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Computation::Value(value) => Some(value),
            Computation::InsufficientData { .. } => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Computation::InsufficientData { .. })
    }
}

fn require<T>(value: Option<T>, key: &'static str, missing: &mut Vec<&'static str>) -> Option<T> {
    if value.is_none() {
        missing.push(key);
    }
    value
}

/// Annual rent from an amount at a given payment frequency.
pub fn annualised_rent(rent: f64, frequency: RentFrequency) -> f64 {
    rent * frequency.periods_per_year()
}

/// Calendar-monthly equivalent of a rent amount.
pub fn monthly_equivalent(rent: f64, frequency: RentFrequency) -> f64 {
    annualised_rent(rent, frequency) / 12.0
}

/// Arrears expressed in whole-and-fractional months of rent.
pub fn arrears_in_months(
    arrears: Option<f64>,
    rent: Option<f64>,
    frequency: Option<RentFrequency>,
) -> Computation<f64> {
    let mut missing = Vec::new();
    let arrears = require(arrears, super::facts::keys::ARREARS_AMOUNT, &mut missing);
    let rent = require(rent, super::facts::keys::RENT_AMOUNT, &mut missing);
    let frequency = require(frequency, super::facts::keys::RENT_FREQUENCY, &mut missing);

    match (arrears, rent, frequency) {
        (Some(arrears), Some(rent), Some(frequency)) if rent > 0.0 => {
            Computation::Value(arrears / monthly_equivalent(rent, frequency))
        }
        (_, Some(rent), _) if rent <= 0.0 => Computation::InsufficientData {
            missing: vec![super::facts::keys::RENT_AMOUNT],
        },
        _ => Computation::InsufficientData { missing },
    }
}

/// Jurisdiction-specific basis for the maximum lawful deposit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum DepositCapPolicy {
    /// England: five weeks' rent, six where annual rent reaches the
    /// threshold (Tenant Fees Act 2019, Schedule 1).
    WeeksOfRent {
        weeks: u32,
        higher_weeks: u32,
        annual_rent_threshold: f64,
    },
    /// Scotland: two months' rent (Rent (Scotland) Act 1984 s.90).
    MonthsOfRent { months: u32 },
}

/// Maximum lawful deposit for the given rent under a cap policy.
pub fn deposit_cap(
    rent: Option<f64>,
    frequency: Option<RentFrequency>,
    policy: &DepositCapPolicy,
) -> Computation<f64> {
    let mut missing = Vec::new();
    let rent = require(rent, super::facts::keys::RENT_AMOUNT, &mut missing);
    let frequency = require(frequency, super::facts::keys::RENT_FREQUENCY, &mut missing);

    let (Some(rent), Some(frequency)) = (rent, frequency) else {
        return Computation::InsufficientData { missing };
    };

    let annual = annualised_rent(rent, frequency);
    let cap = match policy {
        DepositCapPolicy::WeeksOfRent {
            weeks,
            higher_weeks,
            annual_rent_threshold,
        } => {
            let applicable = if annual >= *annual_rent_threshold {
                *higher_weeks
            } else {
                *weeks
            };
            (annual / 52.0) * f64::from(applicable)
        }
        DepositCapPolicy::MonthsOfRent { months } => {
            monthly_equivalent(rent, frequency) * f64::from(*months)
        }
    };
    Computation::Value(cap)
}

/// A statutory minimum notice period. Components are additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoticePeriod {
    #[serde(default)]
    pub months: u32,
    #[serde(default)]
    pub weeks: u32,
    #[serde(default)]
    pub days: u32,
}

impl NoticePeriod {
    pub const fn months(months: u32) -> Self {
        Self {
            months,
            weeks: 0,
            days: 0,
        }
    }

    pub const fn days(days: u32) -> Self {
        Self {
            months: 0,
            weeks: 0,
            days,
        }
    }
}

/// Earliest date a notice served on `service_date` may lawfully expire.
pub fn earliest_expiry(service_date: NaiveDate, period: &NoticePeriod) -> NaiveDate {
    let extra_days = u64::from(period.weeks) * 7 + u64::from(period.days);
    let with_months = service_date
        .checked_add_months(Months::new(period.months))
        .unwrap_or(NaiveDate::MAX);
    with_months
        .checked_add_days(Days::new(extra_days))
        .unwrap_or(NaiveDate::MAX)
}

/// Latest of the earliest-expiry dates across candidate notice periods.
///
/// Used when several grounds with different minimum periods are relied on
/// together: the longest period governs the whole notice.
pub fn required_expiry(service_date: NaiveDate, periods: &[NoticePeriod]) -> Option<NaiveDate> {
    periods
        .iter()
        .map(|period| earliest_expiry(service_date, period))
        .max()
}

/// Whole calendar months elapsed between two dates (0 when `end` precedes
/// `start`).
pub fn whole_months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    let mut months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn arrears_of_two_monthly_payments_is_two_months() {
        let result = arrears_in_months(Some(3000.0), Some(1500.0), Some(RentFrequency::Monthly));
        assert_eq!(result, Computation::Value(2.0));
    }

    #[test]
    fn weekly_rent_converts_through_annual_equivalent() {
        // £300/week is £15,600/year, £1,300/calendar month.
        let result = arrears_in_months(Some(2600.0), Some(300.0), Some(RentFrequency::Weekly));
        assert_eq!(result, Computation::Value(2.0));
    }

    #[test]
    fn missing_rent_reports_insufficient_data_not_zero() {
        let result = arrears_in_months(Some(3000.0), None, Some(RentFrequency::Monthly));
        match result {
            Computation::InsufficientData { missing } => {
                assert_eq!(missing, vec![super::super::facts::keys::RENT_AMOUNT]);
            }
            other => panic!("expected insufficient data, got {other:?}"),
        }
    }

    #[test]
    fn england_cap_switches_to_six_weeks_at_fifty_thousand() {
        let policy = DepositCapPolicy::WeeksOfRent {
            weeks: 5,
            higher_weeks: 6,
            annual_rent_threshold: 50_000.0,
        };
        // £1,000 pcm -> £12,000 pa -> five weeks of £230.77.
        let low = deposit_cap(Some(1000.0), Some(RentFrequency::Monthly), &policy)
            .value()
            .expect("cap");
        assert!((low - 5.0 * 12_000.0 / 52.0).abs() < 0.01);

        // £4,200 pcm -> £50,400 pa -> six-week cap applies.
        let high = deposit_cap(Some(4200.0), Some(RentFrequency::Monthly), &policy)
            .value()
            .expect("cap");
        assert!((high - 6.0 * 50_400.0 / 52.0).abs() < 0.01);
    }

    #[test]
    fn scottish_cap_is_two_months_rent() {
        let policy = DepositCapPolicy::MonthsOfRent { months: 2 };
        let cap = deposit_cap(Some(900.0), Some(RentFrequency::Monthly), &policy)
            .value()
            .expect("cap");
        assert!((cap - 1800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn earliest_expiry_adds_months_then_days() {
        let period = NoticePeriod {
            months: 2,
            weeks: 0,
            days: 0,
        };
        assert_eq!(
            earliest_expiry(date(2025, 12, 22), &period),
            date(2026, 2, 22)
        );

        let fortnight = NoticePeriod::days(14);
        assert_eq!(
            earliest_expiry(date(2026, 1, 1), &fortnight),
            date(2026, 1, 15)
        );
    }

    #[test]
    fn required_expiry_takes_longest_period() {
        let service = date(2026, 1, 1);
        let periods = [NoticePeriod::days(14), NoticePeriod::months(2)];
        assert_eq!(required_expiry(service, &periods), Some(date(2026, 3, 1)));
        assert_eq!(required_expiry(service, &[]), None);
    }

    #[test]
    fn whole_months_ignores_partial_month() {
        assert_eq!(whole_months_between(date(2025, 1, 15), date(2025, 4, 14)), 2);
        assert_eq!(whole_months_between(date(2025, 1, 15), date(2025, 4, 15)), 3);
        assert_eq!(whole_months_between(date(2025, 4, 1), date(2025, 1, 1)), 0);
    }
}
