//! Daily transaction totals for one month.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use common::{TransactionType, UserId};
use domain::{Transaction, TransactionSearch};
use remote::TransactionResource;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ProjectionError, Result};

/// Which month, owner and type to chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerQuery {
    #[serde(default)]
    pub owner_id: Option<UserId>,
    pub year: i32,
    pub month: u32,
    /// `None` charts every type.
    #[serde(default = "default_type")]
    pub transaction_type: Option<TransactionType>,
}

fn default_type() -> Option<TransactionType> {
    Some(TransactionType::Expense)
}

impl LedgerQuery {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            owner_id: None,
            year,
            month,
            transaction_type: default_type(),
        }
    }

    pub fn owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn transaction_type(mut self, transaction_type: Option<TransactionType>) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// First and last calendar day of the month.
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate)> {
        let invalid = || ProjectionError::InvalidMonth {
            year: self.year,
            month: self.month,
        };
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(invalid)?;
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        let last = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
        Ok((first, last))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub day: NaiveDate,
    pub total: Decimal,
}

/// Amount per day of the selected month, plus the types seen overall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerChart {
    pub year: i32,
    pub month: u32,
    pub transaction_type: Option<TransactionType>,
    /// Sorted by day; days without transactions are absent.
    pub points: Vec<DailyPoint>,
    pub month_total: Decimal,
    /// Every type present in the input, sorted by name.
    pub types_present: Vec<TransactionType>,
}

impl LedgerChart {
    /// Buckets `transactions` that fall in the query's month and type.
    ///
    /// The bucketed value is `total_amount`; the owner filter is applied
    /// here too so callers can pass an unfiltered list.
    pub fn build(transactions: &[Transaction], query: &LedgerQuery) -> Result<Self> {
        let (first, last) = query.bounds()?;

        let types_present = transactions
            .iter()
            .map(|tx| tx.transaction_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|name| name.parse().ok())
            .collect();

        let mut buckets: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for tx in transactions {
            let day = tx.date.date_naive();
            if day < first || day > last {
                continue;
            }
            if query.owner_id.is_some_and(|owner| tx.owner_id != owner) {
                continue;
            }
            if query
                .transaction_type
                .is_some_and(|ty| tx.transaction_type != ty)
            {
                continue;
            }
            let total = buckets.entry(day).or_default();
            *total = total
                .checked_add(tx.total_amount)
                .ok_or(ProjectionError::Overflow { day })?;
        }

        let points: Vec<DailyPoint> = buckets
            .into_iter()
            .map(|(day, total)| DailyPoint { day, total })
            .collect();
        let month_total = points.iter().try_fold(Decimal::ZERO, |acc, p| {
            acc.checked_add(p.total)
                .ok_or(ProjectionError::Overflow { day: p.day })
        })?;

        Ok(Self {
            year: query.year,
            month: query.month,
            transaction_type: query.transaction_type,
            points,
            month_total,
            types_present,
        })
    }

    /// Searches the remote store for the month and builds the chart.
    ///
    /// The type filter is applied locally so `types_present` still lists
    /// every type in the month.
    #[tracing::instrument(skip(remote))]
    pub async fn load<R: TransactionResource>(remote: &R, query: &LedgerQuery) -> Result<Self> {
        let (first, last) = query.bounds()?;
        let mut search = TransactionSearch::new().date_from(first).date_to(last);
        if let Some(owner) = query.owner_id {
            search = search.owner(owner);
        }
        let transactions = remote.search_transactions(&search).await?;
        let chart = Self::build(&transactions, query)?;
        tracing::debug!(
            year = chart.year,
            month = chart.month,
            days = chart.points.len(),
            "ledger chart built"
        );
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, owner: i64, ty: &str, date: &str, total: &str) -> Transaction {
        serde_json::from_value(serde_json::json!({
            "id": id, "title": format!("tx {id}"), "owner_id": owner,
            "transaction_type": ty, "quantity": 1, "total_amount": total, "date": date
        }))
        .unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, 1, "expense", "2025-10-03T08:00:00Z", "100"),
            tx(2, 1, "expense", "2025-10-03T18:00:00Z", "50.50"),
            tx(3, 1, "earning", "2025-10-03", "999"),
            tx(4, 1, "expense", "2025-10-31", "10"),
            tx(5, 1, "expense", "2025-11-01", "7"),
            tx(6, 2, "expense", "2025-10-10", "5"),
            tx(7, 1, "capital", "2025-09-30", "1000"),
        ]
    }

    #[test]
    fn test_buckets_expenses_by_day() {
        let chart = LedgerChart::build(&sample(), &LedgerQuery::new(2025, 10)).unwrap();

        let days: Vec<String> = chart.points.iter().map(|p| p.day.to_string()).collect();
        assert_eq!(days, vec!["2025-10-03", "2025-10-10", "2025-10-31"]);
        assert_eq!(chart.points[0].total, "150.50".parse::<Decimal>().unwrap());
        assert_eq!(chart.month_total, "165.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_owner_and_all_types() {
        let query = LedgerQuery::new(2025, 10)
            .owner(UserId::new(1))
            .transaction_type(None);
        let chart = LedgerChart::build(&sample(), &query).unwrap();

        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.month_total, "1159.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_types_present_sorted() {
        let chart = LedgerChart::build(&sample(), &LedgerQuery::new(2025, 10)).unwrap();
        assert_eq!(
            chart.types_present,
            vec![
                TransactionType::Capital,
                TransactionType::Earning,
                TransactionType::Expense
            ]
        );
    }

    #[test]
    fn test_overflowing_totals_are_reported() {
        let mut huge = sample();
        huge.truncate(2);
        huge[0].total_amount = Decimal::MAX;

        let result = LedgerChart::build(&huge, &LedgerQuery::new(2025, 10));
        assert!(matches!(
            result,
            Err(ProjectionError::Overflow { day }) if day.to_string() == "2025-10-03"
        ));

        // Separate days each fit, but the month does not.
        let mut spread = vec![sample().remove(0), sample().remove(3)];
        spread[0].total_amount = Decimal::MAX;
        spread[1].total_amount = Decimal::MAX;
        let result = LedgerChart::build(&spread, &LedgerQuery::new(2025, 10));
        assert!(matches!(result, Err(ProjectionError::Overflow { .. })));
    }

    #[test]
    fn test_december_bounds() {
        let (first, last) = LedgerQuery::new(2025, 12).bounds().unwrap();
        assert_eq!(first.to_string(), "2025-12-01");
        assert_eq!(last.to_string(), "2025-12-31");

        let (_, last) = LedgerQuery::new(2024, 2).bounds().unwrap();
        assert_eq!(last.to_string(), "2024-02-29");
    }

    #[test]
    fn test_invalid_month() {
        let result = LedgerChart::build(&[], &LedgerQuery::new(2025, 13));
        assert!(matches!(
            result,
            Err(ProjectionError::InvalidMonth { year: 2025, month: 13 })
        ));
    }
}
