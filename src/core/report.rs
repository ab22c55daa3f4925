//! Reporting logic - Project dashboards and text rendering of budgets.
//!
//! Pure formatting helpers live here so the bot layer only has to send the
//! resulting strings.

use crate::{
    core::{
        budget::{self, BudgetSheet, BudgetTotals},
        cost::{self, CostComparison},
        project,
    },
    entities::{budget_item, project as project_entity, realized_cost},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::fmt::Write;

/// Everything shown for a project on the dashboard
#[derive(Debug, Clone)]
pub struct ProjectReport {
    /// The project
    pub project: project_entity::Model,
    /// Active budget version with its items, if any
    pub active_sheet: Option<BudgetSheet>,
    /// Number of budget versions
    pub budget_versions: usize,
    /// Budgeted vs. realized
    pub comparison: CostComparison,
    /// Most recent realized costs, newest first
    pub recent_costs: Vec<realized_cost::Model>,
}

impl ProjectReport {
    /// Totals of the active budget, zero when there is none
    #[must_use]
    pub fn totals(&self) -> BudgetTotals {
        self.active_sheet.as_ref().map_or(
            BudgetTotals {
                direct_cost: 0.0,
                markup_amount: 0.0,
                sell_price: 0.0,
            },
            BudgetSheet::totals,
        )
    }
}

/// Gathers the dashboard figures for one project.
///
/// `cost_limit` caps the number of recent costs returned (default 5).
pub async fn generate_project_report(
    db: &DatabaseConnection,
    project_id: i64,
    cost_limit: Option<usize>,
) -> Result<ProjectReport> {
    let project = project::get_project_by_id(db, project_id)
        .await?
        .ok_or_else(|| Error::ProjectNotFound {
            name: project_id.to_string(),
        })?;

    let active_sheet = budget::load_active_sheet(db, project_id).await?;
    let budget_versions = budget::get_budgets_for_project(db, project_id).await?.len();

    let costs = cost::get_costs_for_project(db, project_id).await?;
    let budgeted = active_sheet
        .as_ref()
        .map_or(0.0, |sheet| sheet.totals().sell_price);
    let comparison = cost::compare(budgeted, &costs);

    let recent_costs = costs
        .into_iter()
        .rev()
        .take(cost_limit.unwrap_or(5))
        .collect();

    Ok(ProjectReport {
        project,
        active_sheet,
        budget_versions,
        comparison,
        recent_costs,
    })
}

/// Formats an amount as Brazilian reais: `R$ 1.234,56`.
#[must_use]
pub fn format_brl(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{frac_part}")
}

/// Text progress bar such as `[███░░░░░░░] 35%`.
#[must_use]
pub fn format_progress_bar(percentage: i32, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percentage.clamp(0, 100);

    // clamped is in 0..=100 and length is small
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((f64::from(clamped) / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {percentage}%", "█".repeat(filled), "░".repeat(empty))
}

/// One line of a budget listing.
#[must_use]
pub fn format_item_line(item: &budget_item::Model) -> String {
    format!(
        "#{} {} | {} | {} {} x {} = {}",
        item.id,
        item.code,
        item.description,
        item.quantity,
        item.unit,
        format_brl(item.unit_price),
        format_brl(item.total_price)
    )
}

/// Renders a budget version with its items and derived totals.
pub fn format_budget_sheet(sheet: &BudgetSheet) -> Result<String> {
    let mut out = String::new();
    let totals = sheet.totals();

    writeln!(
        out,
        "Orçamento v{} ({}) | BDI {}%",
        sheet.budget.version, sheet.budget.status, sheet.budget.bdi
    )?;

    if sheet.items.is_empty() {
        writeln!(out, "(sem itens)")?;
    }
    for item in &sheet.items {
        writeln!(out, "{}", format_item_line(item))?;
    }

    writeln!(out, "Custo direto: {}", format_brl(totals.direct_cost))?;
    writeln!(out, "BDI: {}", format_brl(totals.markup_amount))?;
    write!(out, "Preço de venda: {}", format_brl(totals.sell_price))?;
    Ok(out)
}

/// Renders a budgeted vs. realized comparison.
pub fn format_comparison(comparison: &CostComparison) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Orçado: {}", format_brl(comparison.budgeted))?;
    writeln!(out, "Realizado: {}", format_brl(comparison.realized))?;
    let marker = if comparison.is_over_budget() {
        "🔴"
    } else {
        "🟢"
    };
    write!(out, "Variação: {:+.1}% {marker}", comparison.variance_percent)?;
    Ok(out)
}

/// Summary line for a realized cost.
#[must_use]
pub fn format_cost_line(cost: &realized_cost::Model) -> String {
    format!(
        "#{} {} | {} | {} | {}",
        cost.id,
        cost.date.format("%d/%m/%Y"),
        cost.category,
        cost.description,
        format_brl(cost.amount)
    )
}

/// Renders the dashboard for one project.
pub fn format_project_report(report: &ProjectReport) -> Result<String> {
    let mut out = String::new();
    let project = &report.project;

    writeln!(out, "**{}** ({})", project.name, project.status)?;
    writeln!(out, "Cliente: {} | Endereço: {}", project.client, project.address)?;
    writeln!(out, "Início: {}", project.start_date.format("%d/%m/%Y"))?;
    writeln!(
        out,
        "Progresso: {}",
        format_progress_bar(project.completion_percentage, None)
    )?;
    writeln!(
        out,
        "Versões de orçamento: {} | Preço de venda atual: {}",
        report.budget_versions,
        format_brl(report.totals().sell_price)
    )?;
    writeln!(out, "{}", format_comparison(&report.comparison)?)?;

    if !report.recent_costs.is_empty() {
        writeln!(out, "Últimos custos:")?;
        for cost in &report.recent_costs {
            writeln!(out, "• {}", format_cost_line(cost))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::cost::{NewRealizedCost, add_realized_cost};
    use crate::test_utils::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(14.5), "R$ 14,50");
        assert_eq!(format_brl(1_234.56), "R$ 1.234,56");
        assert_eq!(format_brl(23_680.0), "R$ 23.680,00");
        assert_eq!(format_brl(450_000.0), "R$ 450.000,00");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-50.0), "-R$ 50,00");
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(0, Some(10)), "[░░░░░░░░░░] 0%");
        assert_eq!(format_progress_bar(50, Some(10)), "[█████░░░░░] 50%");
        assert_eq!(format_progress_bar(100, Some(10)), "[██████████] 100%");
    }

    #[test]
    fn test_format_comparison_marks_overrun() -> Result<()> {
        let over = CostComparison {
            budgeted: 100.0,
            realized: 150.0,
            variance_percent: 50.0,
        };
        let text = format_comparison(&over)?;
        assert!(text.contains("+50.0%"));
        assert!(text.contains("🔴"));
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_sheet_rendering() -> Result<()> {
        let (db, project, budget) = setup_with_project().await?;
        add_test_item(&db, budget.id, 10.0, 100.0).await?;

        let sheet = crate::core::budget::load_sheet(&db, budget.id).await?;
        let text = format_budget_sheet(&sheet)?;
        assert!(text.starts_with("Orçamento v1 (draft) | BDI 20%"));
        assert!(text.contains("Custo direto: R$ 1.000,00"));
        assert!(text.contains("BDI: R$ 200,00"));
        assert!(text.contains("Preço de venda: R$ 1.200,00"));
        assert_eq!(sheet.budget.project_id, project.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_project_report() -> Result<()> {
        let (db, project, budget) = setup_with_project().await?;
        add_test_item(&db, budget.id, 2.0, 500.0).await?;
        for amount in [100.0, 200.0, 300.0] {
            add_realized_cost(
                &db,
                NewRealizedCost {
                    project_id: project.id,
                    description: format!("Pagamento {amount}"),
                    amount,
                    category: Some("Mão de obra".to_string()),
                    date: None,
                },
            )
            .await?;
        }

        let report = generate_project_report(&db, project.id, Some(2)).await?;
        assert_eq!(report.budget_versions, 1);
        assert_eq!(report.totals().direct_cost, 1_000.0);
        assert_eq!(report.comparison.realized, 600.0);
        assert_eq!(report.recent_costs.len(), 2);
        assert_eq!(report.recent_costs[0].amount, 300.0);

        let text = format_project_report(&report)?;
        assert!(text.contains(&project.name));
        assert!(text.contains("Últimos custos:"));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_for_missing_project() -> Result<()> {
        let db = setup_test_db().await?;
        let result = generate_project_report(&db, 42, None).await;
        assert!(matches!(result, Err(Error::ProjectNotFound { .. })));
        Ok(())
    }
}
