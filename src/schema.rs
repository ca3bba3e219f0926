//! Canonical record shapes and the derived dashboard structures.
//!
//! Everything here is serde-shaped: the input rows arrive from an external
//! retrieval collaborator and the output structure feeds an external
//! presentation collaborator, both across a serialization boundary.

use crate::period::PeriodId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A raw tabular row: arbitrary string keys to string values. Column names
/// are not fixed; the enricher resolves the documented alias chains.
pub type RawRow = BTreeMap<String, String>;

/// Four-level classification of how avoidable an expense is, ranked from
/// most to least essential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NecessityTier {
    Necesario,
    Importante,
    Moderado,
    Prescindible,
}

impl NecessityTier {
    /// All tiers in fixed severity order, most essential first.
    pub const ALL: [NecessityTier; 4] = [
        NecessityTier::Necesario,
        NecessityTier::Importante,
        NecessityTier::Moderado,
        NecessityTier::Prescindible,
    ];

    /// Severity rank, 4 (Necesario) down to 1 (Prescindible).
    pub fn severity(&self) -> u8 {
        match self {
            NecessityTier::Necesario => 4,
            NecessityTier::Importante => 3,
            NecessityTier::Moderado => 2,
            NecessityTier::Prescindible => 1,
        }
    }

    /// Case-insensitive label lookup; unrecognized labels fall back to the
    /// default tier.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "necesario" => NecessityTier::Necesario,
            "importante" => NecessityTier::Importante,
            "moderado" => NecessityTier::Moderado,
            "prescindible" => NecessityTier::Prescindible,
            _ => NecessityTier::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NecessityTier::Necesario => "Necesario",
            NecessityTier::Importante => "Importante",
            NecessityTier::Moderado => "Moderado",
            NecessityTier::Prescindible => "Prescindible",
        }
    }
}

impl Default for NecessityTier {
    fn default() -> Self {
        NecessityTier::Moderado
    }
}

impl fmt::Display for NecessityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution status of a grouping against its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Over,
}

/// A planned allocation for one (period, category) pair. Multiple entries
/// sharing the pair are summed during aggregation, never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Raw period token from the sheet; budget rows are period-native and an
    /// absent column yields an empty placeholder token.
    pub period: PeriodId,
    pub year: String,
    pub category: String,
    /// Always finite and non-negative.
    pub planned: f64,
}

/// One recorded expense transaction in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// `None` when the source date was absent or unparsable.
    pub date: Option<NaiveDate>,
    /// Explicit period column wins, else derived from `date`, else `None`.
    pub period: Option<PeriodId>,
    pub year: String,
    pub category: String,
    pub tier: NecessityTier,
    pub vendor: String,
    pub description: String,
    /// Always finite and non-negative; malformed amounts collapse to 0.
    pub amount: f64,
}

/// Global budget-vs-actual totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_planned: f64,
    pub total_actual: f64,
    pub remaining: f64,
    /// Percentage of plan executed, 0 when nothing was planned.
    pub execution_rate: f64,
}

/// Budget-vs-actual rollup for one (year, period) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub period: PeriodId,
    pub year: String,
    /// Human label, e.g. "Ene 1-15"; raw token for unrecognized periods.
    pub name: String,
    /// Full month name, empty for unrecognized periods.
    pub month: String,
    pub half: u8,
    pub month_index: u32,
    pub planned: f64,
    pub actual: f64,
    pub balance: f64,
    /// Rounded percentage of plan executed, 0 when nothing was planned.
    pub execution: f64,
    /// Prefix sums over the chronologically sorted period sequence.
    pub cumulative_planned: f64,
    pub cumulative_actual: f64,
    pub status: BudgetStatus,
}

/// Monthly rollup, derived by merging each month's one or two periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// Three-letter month abbreviation.
    pub name: String,
    pub month: String,
    pub month_index: u32,
    pub year: String,
    pub planned: f64,
    pub actual: f64,
    pub balance: f64,
    pub cumulative_planned: f64,
    pub cumulative_actual: f64,
}

/// Execution rollup for one spending category, across both datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub planned: f64,
    pub actual: f64,
    pub balance: f64,
    pub execution: f64,
    pub status: BudgetStatus,
    /// Contributing expenses, in input order.
    pub transactions: Vec<ExpenseEntry>,
}

/// Spend rollup for one necessity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NecessityAggregate {
    pub tier: NecessityTier,
    pub total: f64,
    pub count: usize,
}

/// Spend concentration for one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorAggregate {
    pub vendor: String,
    pub total: f64,
    pub count: usize,
    /// Category recorded on the first contributing transaction seen.
    pub category: String,
}

/// One entry of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTransaction {
    /// Sequential identifier reflecting the date-descending sort order.
    pub id: usize,
    pub date: NaiveDate,
    pub vendor: String,
    pub amount: f64,
    pub category: String,
    pub tier: NecessityTier,
    pub description: String,
    pub period: Option<PeriodId>,
}

/// One slice of the spend-distribution view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub name: String,
    pub value: f64,
}

/// The full output contract of one aggregation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub summary: Summary,
    /// Sorted ascending by (year, numeric period suffix).
    pub period_data: Vec<PeriodAggregate>,
    /// Sorted ascending by (year, month index).
    pub monthly_data: Vec<MonthlyAggregate>,
    /// Sorted by planned amount descending.
    pub category_data: Vec<CategoryAggregate>,
    /// Ordered by fixed severity ranking.
    pub necessity_data: Vec<NecessityAggregate>,
    /// Top 8 vendors by total descending, first-seen tie-break.
    pub vendor_data: Vec<VendorAggregate>,
    /// At most 20 entries, newest first.
    pub recent_transactions: Vec<RecentTransaction>,
    /// Categories with actual spend, projected to name/value pairs.
    pub distribution_data: Vec<DistributionSlice>,
    /// Period the builder's reference date falls in.
    pub current_period: PeriodId,
    /// Matching period rollup, looked up by period id alone; `None` when the
    /// datasets carry nothing for the current period.
    pub current_period_data: Option<PeriodAggregate>,
}
