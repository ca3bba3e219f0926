//! The aggregation engine: raw rows in, one `DashboardData` out.
//!
//! Every call recomputes from the full input sets; nothing is cached or
//! mutated incrementally, so a call is deterministic given identical inputs
//! and reference date. The period, month, category and vendor views all
//! follow the same shape — group by a key, accumulate, then sort and derive —
//! and share the [`Grouped`] accumulator so tie-break behavior is defined
//! once.

use crate::enrich::{enrich_budget, enrich_expense};
use crate::period::{month_short_name, PeriodId};
use crate::schema::*;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

const TOP_VENDORS: usize = 8;
const RECENT_LIMIT: usize = 20;
const WARNING_THRESHOLD: f64 = 0.85;

/// Map-keyed accumulator that preserves first-seen order.
///
/// Group slots live in an arena vector indexed by key, so iterating the
/// finished groups yields insertion order; a stable sort on top of that
/// gives every rollup the same deterministic tie-break (first encountered
/// wins).
struct Grouped<K: Ord, V> {
    slots: Vec<V>,
    index: BTreeMap<K, usize>,
}

impl<K: Ord, V> Grouped<K, V> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    fn entry(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let slots = &mut self.slots;
        let slot = *self.index.entry(key).or_insert_with(|| {
            slots.push(init());
            slots.len() - 1
        });
        &mut slots[slot]
    }

    fn into_vec(self) -> Vec<V> {
        self.slots
    }
}

fn status_for(planned: f64, actual: f64) -> BudgetStatus {
    if actual > planned {
        BudgetStatus::Over
    } else if actual / planned.max(1.0) > WARNING_THRESHOLD {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Ok
    }
}

fn execution_pct(planned: f64, actual: f64) -> f64 {
    if planned > 0.0 {
        (actual / planned * 100.0).round()
    } else {
        0.0
    }
}

/// Periods with an unparsable numeric suffix sort after all real ones.
fn period_sort_index(period: &PeriodId) -> u32 {
    period.index().unwrap_or(u32::MAX)
}

struct PeriodAcc {
    period: PeriodId,
    year: String,
    planned: f64,
    actual: f64,
}

struct MonthAcc {
    month: String,
    month_index: u32,
    year: String,
    planned: f64,
    actual: f64,
}

struct CategoryAcc {
    category: String,
    planned: f64,
    actual: f64,
    transactions: Vec<ExpenseEntry>,
}

struct VendorAcc {
    vendor: String,
    total: f64,
    count: usize,
    category: String,
}

/// Builds dashboard views from raw budget and expense rows.
///
/// The reference date is the engine's single time-dependent input: it picks
/// the fallback year for rows without one and anchors the current-period
/// pointer. Everything else is a pure function of the row sets.
pub struct DashboardBuilder {
    today: NaiveDate,
}

impl DashboardBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn build(&self, budget_rows: &[RawRow], expense_rows: &[RawRow]) -> DashboardData {
        let current_year = self.today.year().to_string();

        let budgets: Vec<BudgetEntry> = budget_rows
            .iter()
            .map(|row| enrich_budget(row, &current_year))
            .collect();
        let expenses: Vec<ExpenseEntry> = expense_rows
            .iter()
            .map(|row| enrich_expense(row, &current_year))
            .collect();

        let summary = build_summary(&budgets, &expenses);
        let period_data = build_period_rollup(&budgets, &expenses);
        let monthly_data = build_monthly_rollup(&period_data);
        let category_data = build_category_rollup(&budgets, &expenses);
        let necessity_data = build_necessity_rollup(&expenses);
        let vendor_data = build_vendor_rollup(&expenses);
        let recent_transactions = build_recent_transactions(&expenses);
        let distribution_data = build_distribution(&category_data);

        let current_period = PeriodId::from_date(self.today);
        // Lookup by period id alone: the dashboard tracks the ongoing year's
        // data, so a year qualifier would only hide the match.
        let current_period_data = period_data
            .iter()
            .find(|p| p.period == current_period)
            .cloned();

        DashboardData {
            summary,
            period_data,
            monthly_data,
            category_data,
            necessity_data,
            vendor_data,
            recent_transactions,
            distribution_data,
            current_period,
            current_period_data,
        }
    }
}

fn build_summary(budgets: &[BudgetEntry], expenses: &[ExpenseEntry]) -> Summary {
    let total_planned: f64 = budgets.iter().map(|b| b.planned).sum();
    let total_actual: f64 = expenses.iter().map(|e| e.amount).sum();
    let execution_rate = if total_planned > 0.0 {
        total_actual / total_planned * 100.0
    } else {
        0.0
    };

    Summary {
        total_planned,
        total_actual,
        remaining: total_planned - total_actual,
        execution_rate,
    }
}

fn build_period_rollup(
    budgets: &[BudgetEntry],
    expenses: &[ExpenseEntry],
) -> Vec<PeriodAggregate> {
    let mut groups: Grouped<(String, String), PeriodAcc> = Grouped::new();

    for entry in budgets {
        let key = (entry.year.clone(), entry.period.as_str().to_string());
        let acc = groups.entry(key, || PeriodAcc {
            period: entry.period.clone(),
            year: entry.year.clone(),
            planned: 0.0,
            actual: 0.0,
        });
        acc.planned += entry.planned;
    }

    for entry in expenses {
        let Some(period) = &entry.period else {
            continue;
        };
        let key = (entry.year.clone(), period.as_str().to_string());
        let acc = groups.entry(key, || PeriodAcc {
            period: period.clone(),
            year: entry.year.clone(),
            planned: 0.0,
            actual: 0.0,
        });
        acc.actual += entry.amount;
    }

    let mut accs = groups.into_vec();
    accs.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| period_sort_index(&a.period).cmp(&period_sort_index(&b.period)))
    });

    let mut cumulative_planned = 0.0;
    let mut cumulative_actual = 0.0;
    accs.into_iter()
        .map(|acc| {
            cumulative_planned += acc.planned;
            cumulative_actual += acc.actual;
            let label = acc.period.label();
            PeriodAggregate {
                name: label.short,
                month: label.month,
                half: label.half,
                month_index: label.month_index,
                planned: acc.planned,
                actual: acc.actual,
                balance: acc.planned - acc.actual,
                execution: execution_pct(acc.planned, acc.actual),
                cumulative_planned,
                cumulative_actual,
                status: status_for(acc.planned, acc.actual),
                period: acc.period,
                year: acc.year,
            }
        })
        .collect()
}

/// Monthly view is derived from the period rollup, not sourced
/// independently: each month merges its one or two periods.
fn build_monthly_rollup(period_data: &[PeriodAggregate]) -> Vec<MonthlyAggregate> {
    let mut groups: Grouped<(String, u32), MonthAcc> = Grouped::new();

    for p in period_data {
        let acc = groups.entry((p.year.clone(), p.month_index), || MonthAcc {
            month: p.month.clone(),
            month_index: p.month_index,
            year: p.year.clone(),
            planned: 0.0,
            actual: 0.0,
        });
        acc.planned += p.planned;
        acc.actual += p.actual;
    }

    let mut accs = groups.into_vec();
    accs.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.month_index.cmp(&b.month_index))
    });

    let mut cumulative_planned = 0.0;
    let mut cumulative_actual = 0.0;
    accs.into_iter()
        .map(|acc| {
            cumulative_planned += acc.planned;
            cumulative_actual += acc.actual;
            let name = if acc.month.is_empty() {
                String::new()
            } else {
                month_short_name(acc.month_index).to_string()
            };
            MonthlyAggregate {
                name,
                month: acc.month,
                month_index: acc.month_index,
                year: acc.year,
                planned: acc.planned,
                actual: acc.actual,
                balance: acc.planned - acc.actual,
                cumulative_planned,
                cumulative_actual,
            }
        })
        .collect()
}

fn build_category_rollup(
    budgets: &[BudgetEntry],
    expenses: &[ExpenseEntry],
) -> Vec<CategoryAggregate> {
    let mut groups: Grouped<String, CategoryAcc> = Grouped::new();

    for entry in budgets {
        let acc = groups.entry(entry.category.clone(), || CategoryAcc {
            category: entry.category.clone(),
            planned: 0.0,
            actual: 0.0,
            transactions: Vec::new(),
        });
        acc.planned += entry.planned;
    }

    for entry in expenses {
        let acc = groups.entry(entry.category.clone(), || CategoryAcc {
            category: entry.category.clone(),
            planned: 0.0,
            actual: 0.0,
            transactions: Vec::new(),
        });
        acc.actual += entry.amount;
        acc.transactions.push(entry.clone());
    }

    let mut aggregates: Vec<CategoryAggregate> = groups
        .into_vec()
        .into_iter()
        .map(|acc| CategoryAggregate {
            balance: acc.planned - acc.actual,
            execution: execution_pct(acc.planned, acc.actual),
            status: status_for(acc.planned, acc.actual),
            category: acc.category,
            planned: acc.planned,
            actual: acc.actual,
            transactions: acc.transactions,
        })
        .collect();

    aggregates.sort_by(|a, b| b.planned.total_cmp(&a.planned));
    aggregates
}

fn build_necessity_rollup(expenses: &[ExpenseEntry]) -> Vec<NecessityAggregate> {
    let mut totals: BTreeMap<u8, (f64, usize)> = BTreeMap::new();
    for entry in expenses {
        let slot = totals.entry(entry.tier.severity()).or_insert((0.0, 0));
        slot.0 += entry.amount;
        slot.1 += 1;
    }

    // Fixed severity order, most essential first; absent tiers are omitted.
    NecessityTier::ALL
        .iter()
        .filter_map(|tier| {
            let (total, count) = totals.get(&tier.severity())?;
            Some(NecessityAggregate {
                tier: *tier,
                total: *total,
                count: *count,
            })
        })
        .collect()
}

fn build_vendor_rollup(expenses: &[ExpenseEntry]) -> Vec<VendorAggregate> {
    let mut groups: Grouped<String, VendorAcc> = Grouped::new();

    for entry in expenses {
        let acc = groups.entry(entry.vendor.clone(), || VendorAcc {
            vendor: entry.vendor.clone(),
            total: 0.0,
            count: 0,
            category: entry.category.clone(),
        });
        acc.total += entry.amount;
        acc.count += 1;
    }

    let mut accs = groups.into_vec();
    // Stable sort over insertion order: equal totals keep first-seen order.
    accs.sort_by(|a, b| b.total.total_cmp(&a.total));
    accs.truncate(TOP_VENDORS);

    accs.into_iter()
        .map(|acc| VendorAggregate {
            vendor: acc.vendor,
            total: acc.total,
            count: acc.count,
            category: acc.category,
        })
        .collect()
}

fn build_recent_transactions(expenses: &[ExpenseEntry]) -> Vec<RecentTransaction> {
    let mut dated: Vec<(NaiveDate, &ExpenseEntry)> = expenses
        .iter()
        .filter_map(|e| e.date.map(|d| (d, e)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.truncate(RECENT_LIMIT);

    dated
        .into_iter()
        .enumerate()
        .map(|(id, (date, entry))| RecentTransaction {
            id,
            date,
            vendor: entry.vendor.clone(),
            amount: entry.amount,
            category: entry.category.clone(),
            tier: entry.tier,
            description: entry.description.clone(),
            period: entry.period.clone(),
        })
        .collect()
}

fn build_distribution(category_data: &[CategoryAggregate]) -> Vec<DistributionSlice> {
    category_data
        .iter()
        .filter(|c| c.actual > 0.0)
        .map(|c| DistributionSlice {
            name: c.category.clone(),
            value: c.actual,
        })
        .collect()
}
