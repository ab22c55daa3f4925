//! Budget Discord commands - the line-item editor, BDI, revisions and catalog search.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, lookup, reply},
        },
        core::{budget, catalog, item, report},
        entities::BudgetStatus,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum BudgetStatusChoice {
        #[name = "rascunho"]
        Draft,
        #[name = "aprovado"]
        Approved,
        #[name = "obsoleto"]
        Obsolete,
    }

    impl From<BudgetStatusChoice> for BudgetStatus {
        fn from(choice: BudgetStatusChoice) -> Self {
            match choice {
                BudgetStatusChoice::Draft => Self::Draft,
                BudgetStatusChoice::Approved => Self::Approved,
                BudgetStatusChoice::Obsolete => Self::Obsolete,
            }
        }
    }

    /// Parent command for the budget editor.
    #[poise::command(
        slash_command,
        subcommands(
            "budget_show",
            "budget_add_item",
            "budget_quantity",
            "budget_remove",
            "budget_bdi",
            "budget_revise",
            "budget_versions",
            "budget_status"
        )
    )]
    pub async fn budget(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Subcomandos: `show`, `add_item`, `quantity`, `remove`, `bdi`, `revise`, \
             `versions`, `status`",
        )
        .await?;
        Ok(())
    }

    /// Shows a budget version with items and totals. Defaults to the active version.
    #[poise::command(slash_command, rename = "show")]
    pub async fn budget_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
        #[description = "Versão (padrão: a mais recente)"] version: Option<i32>,
        #[description = "Id do orçamento (#id em /budget versions)"] budget_id: Option<i64>,
    ) -> Result<()> {
        let Some((found, selected)) =
            lookup::find_budget(ctx, &project, version, budget_id).await?
        else {
            return Ok(());
        };
        let sheet = budget::load_sheet(&ctx.data().database, selected.id).await?;

        let text = format!(
            "📋 **{}** (#{})\n```\n{}\n```",
            found.name,
            sheet.budget.id,
            report::format_budget_sheet(&sheet)?
        );
        reply::say_long(ctx, &text).await
    }

    /// Appends a catalog composition (quantity 1) to the active budget.
    #[poise::command(slash_command, rename = "add_item")]
    pub async fn budget_add_item(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
        #[description = "Código da composição"]
        #[autocomplete = "autocomplete::autocomplete_catalog_code"]
        code: String,
        #[description = "Versão (padrão: a mais recente)"] version: Option<i32>,
        #[description = "Id do orçamento (#id em /budget versions)"] budget_id: Option<i64>,
    ) -> Result<()> {
        let Some((_, selected)) =
            lookup::find_budget(ctx, &project, version, budget_id).await?
        else {
            return Ok(());
        };

        let db = &ctx.data().database;
        match item::add_catalog_item(db, selected.id, &code).await {
            Ok(added) => {
                let sheet = budget::load_sheet(db, selected.id).await?;
                ctx.say(format!(
                    "✅ Adicionado ao orçamento v{}: {}\nCusto direto: {}",
                    selected.version,
                    report::format_item_line(&added),
                    report::format_brl(sheet.totals().direct_cost)
                ))
                .await?;
            }
            Err(Error::CatalogItemNotFound { code }) => {
                ctx.say(format!(
                    "❌ Composição '{code}' não encontrada. Use `/catalog` para pesquisar."
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Changes the quantity of a line and recomputes its total.
    #[poise::command(slash_command, rename = "quantity")]
    pub async fn budget_quantity(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Número do item (#id)"] item_id: i64,
        #[description = "Nova quantidade"] quantity: f64,
    ) -> Result<()> {
        match item::update_item_quantity(&ctx.data().database, item_id, quantity).await {
            Ok(updated) => {
                ctx.say(format!("✅ {}", report::format_item_line(&updated)))
                    .await?;
            }
            Err(Error::InvalidQuantity { .. }) => {
                ctx.say("❌ A quantidade deve ser um número maior ou igual a zero.")
                    .await?;
            }
            Err(Error::ItemNotFound { id }) => {
                ctx.say(format!("❌ Item #{id} não encontrado.")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Removes a line from its budget.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn budget_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Número do item (#id)"] item_id: i64,
    ) -> Result<()> {
        match item::delete_item(&ctx.data().database, item_id).await {
            Ok(()) => {
                ctx.say(format!("🗑️ Item #{item_id} removido.")).await?;
            }
            Err(Error::ItemNotFound { id }) => {
                ctx.say(format!("❌ Item #{id} não encontrado.")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Sets the BDI percentage and shows the new sell price.
    #[poise::command(slash_command, rename = "bdi")]
    pub async fn budget_bdi(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
        #[description = "BDI em %"] bdi: f64,
        #[description = "Versão (padrão: a mais recente)"] version: Option<i32>,
        #[description = "Id do orçamento (#id em /budget versions)"] budget_id: Option<i64>,
    ) -> Result<()> {
        let Some((_, selected)) =
            lookup::find_budget(ctx, &project, version, budget_id).await?
        else {
            return Ok(());
        };

        let db = &ctx.data().database;
        match budget::set_bdi(db, selected.id, bdi).await {
            Ok(updated) => {
                let totals = budget::load_sheet(db, updated.id).await?.totals();
                ctx.say(format!(
                    "✅ BDI da v{} ajustado para {}%. BDI: {} | Preço de venda: {}",
                    updated.version,
                    updated.bdi,
                    report::format_brl(totals.markup_amount),
                    report::format_brl(totals.sell_price)
                ))
                .await?;
            }
            Err(Error::InvalidBdi { .. }) => {
                ctx.say("❌ O BDI deve ser um número maior ou igual a zero.")
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Copies a budget version into a new revision.
    #[poise::command(slash_command, rename = "revise")]
    pub async fn budget_revise(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
        #[description = "Versão de origem (padrão: a mais recente)"] version: Option<i32>,
        #[description = "Id do orçamento (#id em /budget versions)"] budget_id: Option<i64>,
    ) -> Result<()> {
        let Some((found, source)) =
            lookup::find_budget(ctx, &project, version, budget_id).await?
        else {
            return Ok(());
        };
        let revision = budget::create_revision(&ctx.data().database, source.id).await?;
        ctx.say(format!(
            "📝 Revisão criada para **{}**: v{} (#{}) → v{} (#{}).",
            found.name, source.version, source.id, revision.version, revision.id
        ))
        .await?;
        Ok(())
    }

    /// Lists all budget versions of a project with their sell prices.
    #[poise::command(slash_command, rename = "versions")]
    pub async fn budget_versions(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
    ) -> Result<()> {
        let Some(found) = lookup::find_project(ctx, &project).await? else {
            return Ok(());
        };

        let db = &ctx.data().database;
        let budgets = budget::get_budgets_for_project(db, found.id).await?;
        let active_id = lookup::pick_budget(&budgets, None, None).map(|b| b.id);

        let mut out = format!("🗂️ **Versões de {}**\n", found.name);
        for b in &budgets {
            let totals = budget::load_sheet(db, b.id).await?.totals();
            writeln!(
                out,
                "• #{} v{} | {} | BDI {}% | {} | criado em {}{}",
                b.id,
                b.version,
                b.status,
                b.bdi,
                report::format_brl(totals.sell_price),
                b.created_at.format("%d/%m/%Y %H:%M"),
                if Some(b.id) == active_id { " ⭐" } else { "" }
            )?;
        }
        reply::say_long(ctx, &out).await
    }

    /// Changes the approval state of a budget version.
    #[poise::command(slash_command, rename = "status")]
    pub async fn budget_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
        #[description = "Nova situação"] status: BudgetStatusChoice,
        #[description = "Versão (padrão: a mais recente)"] version: Option<i32>,
        #[description = "Id do orçamento (#id em /budget versions)"] budget_id: Option<i64>,
    ) -> Result<()> {
        let Some((found, selected)) =
            lookup::find_budget(ctx, &project, version, budget_id).await?
        else {
            return Ok(());
        };
        let updated = budget::set_status(&ctx.data().database, selected.id, status.into()).await?;
        ctx.say(format!(
            "✅ Orçamento v{} de **{}** agora está: {}.",
            updated.version, found.name, updated.status
        ))
        .await?;
        Ok(())
    }

    /// Searches the reference catalog by description or code.
    #[poise::command(slash_command, prefix_command)]
    pub async fn catalog(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Termo de busca (descrição ou código)"] term: Option<String>,
    ) -> Result<()> {
        let entries =
            catalog::search_catalog(&ctx.data().database, term.as_deref().unwrap_or("")).await?;
        if entries.is_empty() {
            ctx.say("🔎 Nenhuma composição encontrada.").await?;
            return Ok(());
        }

        let mut out = String::from("🔎 **Catálogo**\n");
        for entry in &entries {
            writeln!(
                out,
                "• `{}` [{}] {} | {} | {}",
                entry.code,
                entry.source,
                entry.description,
                entry.unit,
                report::format_brl(entry.unit_price)
            )?;
        }
        reply::say_long(ctx, &out).await
    }
}

// Re-export all commands
pub use inner::*;
