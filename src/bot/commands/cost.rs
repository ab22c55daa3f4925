//! Realized-cost and reference-table Discord commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, lookup, reply},
        },
        core::{cost, reference, report},
        entities::TableKind,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for budgeted vs. realized tracking.
    #[poise::command(slash_command, subcommands("cost_add", "cost_remove", "cost_summary"))]
    pub async fn cost(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Subcomandos: `/cost add`, `/cost remove`, `/cost summary`")
            .await?;
        Ok(())
    }

    /// Records money spent on a project.
    #[poise::command(slash_command, rename = "add")]
    pub async fn cost_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
        #[description = "Valor pago"] amount: f64,
        #[description = "Descrição"] description: String,
        #[description = "Categoria (padrão: Material)"]
        #[autocomplete = "autocomplete::autocomplete_cost_category"]
        category: Option<String>,
        #[description = "Data (AAAA-MM-DD ou DD/MM/AAAA, padrão: hoje)"] date: Option<String>,
    ) -> Result<()> {
        let date = match date.as_deref().map(reply::parse_date) {
            Some(None) => {
                ctx.say("❌ Data inválida. Use AAAA-MM-DD ou DD/MM/AAAA.")
                    .await?;
                return Ok(());
            }
            Some(parsed) => parsed,
            None => None,
        };

        let Some(found) = lookup::find_project(ctx, &project).await? else {
            return Ok(());
        };

        let db = &ctx.data().database;
        let result = cost::add_realized_cost(
            db,
            cost::NewRealizedCost {
                project_id: found.id,
                description,
                amount,
                category,
                date,
            },
        )
        .await;

        match result {
            Ok(recorded) => {
                let comparison = cost::compare_budget_to_actual(db, found.id).await?;
                ctx.say(format!(
                    "✅ Custo registrado em **{}**: {}\n{}",
                    found.name,
                    report::format_cost_line(&recorded),
                    report::format_comparison(&comparison)?
                ))
                .await?;
            }
            Err(Error::InvalidAmount { .. }) => {
                ctx.say("❌ O valor deve ser maior que zero.").await?;
            }
            Err(Error::EmptyField { .. }) => {
                ctx.say("❌ A descrição é obrigatória.").await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Deletes a realized cost.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn cost_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Número do custo (#id)"] cost_id: i64,
    ) -> Result<()> {
        match cost::delete_realized_cost(&ctx.data().database, cost_id).await {
            Ok(()) => {
                ctx.say(format!("🗑️ Custo #{cost_id} removido.")).await?;
            }
            Err(Error::CostNotFound { id }) => {
                ctx.say(format!("❌ Custo #{id} não encontrado.")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists a project's costs and compares them with the active budget.
    #[poise::command(slash_command, rename = "summary")]
    pub async fn cost_summary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
    ) -> Result<()> {
        let Some(found) = lookup::find_project(ctx, &project).await? else {
            return Ok(());
        };

        let db = &ctx.data().database;
        let costs = cost::get_costs_for_project(db, found.id).await?;
        let comparison = cost::compare_budget_to_actual(db, found.id).await?;

        let mut out = format!("💰 **Orçado x Realizado | {}**\n", found.name);
        if costs.is_empty() {
            writeln!(out, "Nenhum custo registrado.")?;
        }
        for c in &costs {
            writeln!(out, "• {}", report::format_cost_line(c))?;
        }
        write!(out, "{}", report::format_comparison(&comparison)?)?;
        reply::say_long(ctx, &out).await
    }

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum TableKindChoice {
        #[name = "SINAPI"]
        Sinapi,
        #[name = "TCPO"]
        Tcpo,
        #[name = "Própria"]
        Own,
    }

    impl From<TableKindChoice> for TableKind {
        fn from(choice: TableKindChoice) -> Self {
            match choice {
                TableKindChoice::Sinapi => Self::Sinapi,
                TableKindChoice::Tcpo => Self::Tcpo,
                TableKindChoice::Own => Self::Own,
            }
        }
    }

    /// Parent command for reference price tables.
    #[poise::command(slash_command, subcommands("table_import", "table_list"))]
    pub async fn table(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Subcomandos: `/table import`, `/table list`").await?;
        Ok(())
    }

    /// Registers an uploaded reference table.
    #[poise::command(slash_command, rename = "import")]
    pub async fn table_import(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Arquivo da tabela"] file: serenity::Attachment,
        #[description = "Tipo de tabela"] kind: TableKindChoice,
    ) -> Result<()> {
        let data = ctx.data();
        let table = reference::import_reference_table(
            &data.database,
            data.table_source.as_ref(),
            &file.filename,
            kind.into(),
            &data.import_region,
        )
        .await?;

        ctx.say(format!(
            "📥 Tabela **{}** ({}) importada | {} | {}",
            table.name,
            table.kind,
            table.region,
            table.date.format("%d/%m/%Y")
        ))
        .await?;
        Ok(())
    }

    /// Lists imported reference tables.
    #[poise::command(slash_command, rename = "list")]
    pub async fn table_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let tables = reference::get_all_reference_tables(&ctx.data().database).await?;
        if tables.is_empty() {
            ctx.say("📚 Nenhuma tabela importada.").await?;
            return Ok(());
        }

        let mut out = String::from("📚 **Tabelas de referência**\n");
        for t in &tables {
            writeln!(
                out,
                "• **{}** | {} | {} | {}",
                t.name,
                t.kind,
                t.region,
                t.date.format("%m/%Y")
            )?;
        }
        reply::say_long(ctx, &out).await
    }
}

// Re-export all commands
pub use inner::*;
