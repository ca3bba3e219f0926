//! # Budget Dashboard Core
//!
//! A library for aggregating two flat tabular datasets — planned budget
//! allocations per bi-weekly period and recorded expense transactions —
//! into the derived views a reporting dashboard consumes.
//!
//! ## Core Concepts
//!
//! - **Raw rows**: loosely-typed string-to-string records from an external
//!   tabular source; column headers follow documented alias chains
//! - **Quincena**: one of 24 fixed bi-weekly periods per year, split at
//!   day 15/16 of each calendar month
//! - **Enrichment**: best-effort coercion of each raw row into a canonical
//!   record; malformed fields take documented defaults, no row is dropped
//! - **Rollups**: period, monthly, category, necessity-tier and vendor
//!   groupings with balances, execution percentages and running totals,
//!   recomputed from scratch on every call
//!
//! ## Example
//!
//! ```rust,ignore
//! use budget_dashboard_core::build_dashboard;
//! use std::collections::BTreeMap;
//!
//! let budget_rows = vec![BTreeMap::from([
//!     ("Quincena".to_string(), "Q1".to_string()),
//!     ("Categoria".to_string(), "Mercado".to_string()),
//!     ("Presupuesto (USD)".to_string(), "150".to_string()),
//! ])];
//! let expense_rows = vec![BTreeMap::from([
//!     ("Fecha del Gasto".to_string(), "2025-01-03".to_string()),
//!     ("Establecimiento".to_string(), "Super Xtra".to_string()),
//!     ("Monto (USD)".to_string(), "45.50".to_string()),
//!     ("Categoria del Gasto".to_string(), "Mercado".to_string()),
//! ])];
//!
//! let data = build_dashboard(&budget_rows, &expense_rows);
//! assert_eq!(data.summary.total_planned, 150.0);
//! ```

pub mod engine;
pub mod enrich;
pub mod error;
pub mod ingestion;
pub mod normalize;
pub mod period;
pub mod schema;

pub use engine::DashboardBuilder;
pub use enrich::{enrich_budget, enrich_expense, DEFAULT_CATEGORY, DEFAULT_VENDOR};
pub use error::{DashboardError, Result};
pub use ingestion::{grid_to_rows, rows_from_json};
pub use normalize::{first_non_empty, parse_amount, parse_date};
pub use period::{PeriodId, PeriodLabel, PERIODS_PER_YEAR};
pub use schema::*;

use chrono::NaiveDate;
use log::{debug, info};

/// Aggregates raw budget and expense rows into dashboard views, anchored to
/// today's date for the current-period pointer and year fallbacks.
pub fn build_dashboard(budget_rows: &[RawRow], expense_rows: &[RawRow]) -> DashboardData {
    build_dashboard_at(
        budget_rows,
        expense_rows,
        chrono::Local::now().date_naive(),
    )
}

/// Same as [`build_dashboard`] with an explicit reference date; given a
/// fixed date the result is fully deterministic.
pub fn build_dashboard_at(
    budget_rows: &[RawRow],
    expense_rows: &[RawRow],
    today: NaiveDate,
) -> DashboardData {
    info!(
        "Aggregating dashboard from {} budget rows and {} expense rows",
        budget_rows.len(),
        expense_rows.len()
    );

    let data = DashboardBuilder::new(today).build(budget_rows, expense_rows);

    debug!(
        "Derived {} period, {} monthly, {} category aggregates; {} recent transactions",
        data.period_data.len(),
        data.monthly_data.len(),
        data.category_data.len(),
        data.recent_transactions.len()
    );

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let budget_rows = vec![row(&[
            ("Quincena", "Q1"),
            ("Categoria", "Mercado"),
            ("Presupuesto (USD)", "150"),
        ])];
        let expense_rows = vec![row(&[
            ("Fecha del Gasto", "2025-01-03"),
            ("Establecimiento", "Store"),
            ("Monto (USD)", "45.50"),
            ("Categoria del Gasto", "Mercado"),
            ("Necesidad", "Necesario"),
        ])];

        let data = build_dashboard_at(&budget_rows, &expense_rows, reference_date());

        assert_eq!(data.summary.total_planned, 150.0);
        assert_eq!(data.summary.total_actual, 45.50);
        assert_eq!(data.summary.remaining, 104.50);

        let q1 = &data.period_data[0];
        assert_eq!(q1.planned, 150.0);
        assert_eq!(q1.actual, 45.50);
        assert_eq!(q1.balance, 104.50);
        assert_eq!(q1.status, BudgetStatus::Ok);

        let mercado = &data.category_data[0];
        assert_eq!(mercado.execution, 30.0);

        assert_eq!(data.current_period, PeriodId::new("Q1"));
        assert_eq!(
            data.current_period_data.as_ref().map(|p| p.actual),
            Some(45.50)
        );
    }

    #[test]
    fn test_deterministic_for_fixed_date() {
        let budget_rows = vec![
            row(&[
                ("Quincena", "Q1"),
                ("Categoria", "Mercado"),
                ("Presupuesto (USD)", "150"),
            ]),
            row(&[
                ("Quincena", "Q2"),
                ("Categoria", "Ocio"),
                ("Presupuesto (USD)", "80"),
            ]),
        ];
        let expense_rows = vec![
            row(&[
                ("Fecha del Gasto", "2025-01-03"),
                ("Establecimiento", "Store"),
                ("Monto (USD)", "45.50"),
                ("Categoria del Gasto", "Mercado"),
            ]),
            row(&[
                ("Fecha del Gasto", "2025-01-20"),
                ("Establecimiento", "Cinemark"),
                ("Monto (USD)", "22"),
                ("Categoria del Gasto", "Ocio"),
            ]),
        ];

        let first = build_dashboard_at(&budget_rows, &expense_rows, reference_date());
        let second = build_dashboard_at(&budget_rows, &expense_rows, reference_date());
        assert_eq!(first, second);
    }

    #[test]
    fn test_category_totals_close_against_summary() {
        let expense_rows = vec![
            row(&[("Monto (USD)", "10"), ("Categoria del Gasto", "A")]),
            row(&[("Monto (USD)", "20"), ("Categoria del Gasto", "B")]),
            row(&[("Monto (USD)", "abc")]),
        ];

        let data = build_dashboard_at(&[], &expense_rows, reference_date());

        let category_total: f64 = data.category_data.iter().map(|c| c.actual).sum();
        assert!((category_total - data.summary.total_actual).abs() < 1e-9);
        assert_eq!(data.summary.total_actual, 30.0);
    }
}
