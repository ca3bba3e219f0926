//! Enrichment of raw rows into canonical budget and expense records.
//!
//! The source sheet has gone through several header wordings over its life,
//! so every logical field resolves through an ordered alias chain; the
//! chains live here as constants and the lookup itself is
//! [`crate::normalize::first_non_empty`]. Both functions are pure and never drop a
//! row: a field missing every alias takes its documented default.

use crate::normalize::{first_non_empty, parse_amount, parse_date};
use crate::period::PeriodId;
use crate::schema::{BudgetEntry, ExpenseEntry, NecessityTier, RawRow};
use chrono::Datelike;

pub const DEFAULT_CATEGORY: &str = "Sin categoría";
pub const DEFAULT_VENDOR: &str = "—";

const EXPENSE_AMOUNT_KEYS: &[&str] = &["Monto (USD)", "Monto", "Amount"];
const EXPENSE_CATEGORY_KEYS: &[&str] = &["Categoria del Gasto", "Categoria"];
const NECESSITY_KEYS: &[&str] = &[
    "Necesidad",
    "¿Cómo calificaría la necesidad de este gasto?",
];
const VENDOR_KEYS: &[&str] = &[
    "Establecimiento",
    "Establecimiento donde se realizó el gasto",
];
const DESCRIPTION_KEYS: &[&str] = &[
    "Descripcion",
    "Descripción o Detalles Adicionales",
    "Descripcion o Detalles Adicionales",
];
const DATE_KEYS: &[&str] = &["Fecha del Gasto", "Fecha"];
const YEAR_KEYS: &[&str] = &["Año"];
const EXPENSE_PERIOD_KEYS: &[&str] = &["Quincena"];

const BUDGET_AMOUNT_KEYS: &[&str] = &["Presupuesto (USD)", "Presupuesto"];
const BUDGET_CATEGORY_KEYS: &[&str] = &["Categoria", "Categoría"];
const BUDGET_PERIOD_KEYS: &[&str] = &["Quincena", "Q"];

/// Resolves an expense row into canonical shape.
///
/// Period resolution: an explicit period column wins, else the period is
/// derived from the resolved date, else it stays unresolved. Year falls back
/// from an explicit column to the date's year to `current_year`.
pub fn enrich_expense(row: &RawRow, current_year: &str) -> ExpenseEntry {
    let date = first_non_empty(row, DATE_KEYS).and_then(parse_date);

    let period = first_non_empty(row, EXPENSE_PERIOD_KEYS)
        .and_then(PeriodId::parse)
        .or_else(|| date.map(PeriodId::from_date));

    let year = first_non_empty(row, YEAR_KEYS)
        .map(str::to_string)
        .or_else(|| date.map(|d| d.year().to_string()))
        .unwrap_or_else(|| current_year.to_string());

    ExpenseEntry {
        date,
        period,
        year,
        category: text_or(row, EXPENSE_CATEGORY_KEYS, DEFAULT_CATEGORY),
        tier: first_non_empty(row, NECESSITY_KEYS)
            .map(NecessityTier::from_label)
            .unwrap_or_default(),
        vendor: text_or(row, VENDOR_KEYS, DEFAULT_VENDOR),
        description: text_or(row, DESCRIPTION_KEYS, ""),
        amount: first_non_empty(row, EXPENSE_AMOUNT_KEYS)
            .map(parse_amount)
            .unwrap_or(0.0),
    }
}

/// Resolves a budget row into canonical shape. Budget rows are
/// period-native: there is no date to derive a period from, and an absent
/// period column yields an empty placeholder token.
pub fn enrich_budget(row: &RawRow, current_year: &str) -> BudgetEntry {
    BudgetEntry {
        period: first_non_empty(row, BUDGET_PERIOD_KEYS)
            .map(PeriodId::new)
            .unwrap_or_else(|| PeriodId::new("")),
        year: text_or(row, YEAR_KEYS, current_year),
        category: text_or(row, BUDGET_CATEGORY_KEYS, DEFAULT_CATEGORY),
        planned: first_non_empty(row, BUDGET_AMOUNT_KEYS)
            .map(parse_amount)
            .unwrap_or(0.0),
    }
}

fn text_or(row: &RawRow, keys: &[&str], default: &str) -> String {
    first_non_empty(row, keys).unwrap_or(default).to_string()
}
