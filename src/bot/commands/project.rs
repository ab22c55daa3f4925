//! Project and client Discord commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, lookup, reply},
        },
        core::{client, project, report},
        entities::ProjectStatus,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ProjectStatusChoice {
        #[name = "planejamento"]
        Planning,
        #[name = "em andamento"]
        Active,
        #[name = "concluído"]
        Completed,
    }

    impl From<ProjectStatusChoice> for ProjectStatus {
        fn from(choice: ProjectStatusChoice) -> Self {
            match choice {
                ProjectStatusChoice::Planning => Self::Planning,
                ProjectStatusChoice::Active => Self::Active,
                ProjectStatusChoice::Completed => Self::Completed,
            }
        }
    }

    /// Parent command for construction projects.
    #[poise::command(
        slash_command,
        subcommands(
            "project_create",
            "project_list",
            "project_show",
            "project_status",
            "project_progress"
        )
    )]
    pub async fn project(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Subcomandos: `/project create`, `/project list`, `/project show`, \
             `/project status`, `/project progress`",
        )
        .await?;
        Ok(())
    }

    /// Creates a project together with its first budget version.
    #[poise::command(slash_command, rename = "create")]
    pub async fn project_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Nome do projeto"] name: String,
        #[description = "Cliente"]
        #[autocomplete = "autocomplete::autocomplete_client_name"]
        client: Option<String>,
        #[description = "Endereço da obra"] address: Option<String>,
        #[description = "Data de início (AAAA-MM-DD ou DD/MM/AAAA)"] start_date: Option<String>,
    ) -> Result<()> {
        let start_date = match start_date.as_deref().map(reply::parse_date) {
            Some(None) => {
                ctx.say("❌ Data inválida. Use AAAA-MM-DD ou DD/MM/AAAA.")
                    .await?;
                return Ok(());
            }
            Some(date) => date,
            None => None,
        };

        let db = &ctx.data().database;
        match project::create_project(
            db,
            project::NewProject {
                name,
                client,
                address,
                start_date,
            },
        )
        .await
        {
            Ok((created, budget)) => {
                ctx.say(format!(
                    "✅ Projeto **{}** criado para {} com o orçamento v{} (BDI {}%).",
                    created.name, created.client, budget.version, budget.bdi
                ))
                .await?;
            }
            Err(Error::EmptyField { .. }) => {
                ctx.say("❌ O nome do projeto é obrigatório.").await?;
            }
            Err(Error::DuplicateProject { name }) => {
                ctx.say(format!("❌ Já existe um projeto chamado **{name}**."))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists all projects.
    #[poise::command(slash_command, rename = "list")]
    pub async fn project_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let projects = project::get_all_projects(&ctx.data().database).await?;
        if projects.is_empty() {
            ctx.say("📁 Nenhum projeto cadastrado. Use `/project create`.")
                .await?;
            return Ok(());
        }

        let mut out = String::from("📁 **Projetos**\n");
        for p in &projects {
            writeln!(
                out,
                "• **{}** | {} | {} | {}",
                p.name,
                p.client,
                p.status,
                report::format_progress_bar(p.completion_percentage, Some(10))
            )?;
        }
        reply::say_long(ctx, &out).await
    }

    /// Shows the dashboard of a project.
    #[poise::command(slash_command, rename = "show")]
    pub async fn project_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        name: String,
    ) -> Result<()> {
        let Some(found) = lookup::find_project(ctx, &name).await? else {
            return Ok(());
        };
        let dashboard =
            report::generate_project_report(&ctx.data().database, found.id, Some(5)).await?;
        reply::say_long(ctx, &report::format_project_report(&dashboard)?).await
    }

    /// Moves a project to another stage.
    #[poise::command(slash_command, rename = "status")]
    pub async fn project_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        name: String,
        #[description = "Nova situação"] status: ProjectStatusChoice,
    ) -> Result<()> {
        let Some(found) = lookup::find_project(ctx, &name).await? else {
            return Ok(());
        };
        let updated =
            project::set_project_status(&ctx.data().database, found.id, status.into()).await?;
        ctx.say(format!(
            "✅ Projeto **{}** agora está em: {}.",
            updated.name, updated.status
        ))
        .await?;
        Ok(())
    }

    /// Records physical progress.
    #[poise::command(slash_command, rename = "progress")]
    pub async fn project_progress(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        name: String,
        #[description = "Percentual concluído (0 a 100)"] percentage: i32,
    ) -> Result<()> {
        let Some(found) = lookup::find_project(ctx, &name).await? else {
            return Ok(());
        };
        match project::set_completion_percentage(&ctx.data().database, found.id, percentage).await
        {
            Ok(updated) => {
                ctx.say(format!(
                    "✅ **{}**: {}",
                    updated.name,
                    report::format_progress_bar(updated.completion_percentage, None)
                ))
                .await?;
            }
            Err(Error::InvalidPercentage { .. }) => {
                ctx.say("❌ O percentual deve estar entre 0 e 100.").await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Parent command for clients.
    #[poise::command(slash_command, subcommands("client_add", "client_list", "client_show"))]
    pub async fn client(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Subcomandos: `/client add`, `/client list`, `/client show`").await?;
        Ok(())
    }

    /// Registers a client.
    #[poise::command(slash_command, rename = "add")]
    pub async fn client_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Nome"] name: String,
        #[description = "E-mail"] email: Option<String>,
        #[description = "Telefone"] phone: Option<String>,
        #[description = "Empresa"] company: Option<String>,
    ) -> Result<()> {
        let result = client::create_client(
            &ctx.data().database,
            client::NewClient {
                name,
                email: email.unwrap_or_default(),
                phone: phone.unwrap_or_default(),
                company: company.unwrap_or_default(),
            },
        )
        .await;

        match result {
            Ok(created) => {
                ctx.say(format!("✅ Cliente **{}** cadastrado.", created.name))
                    .await?;
            }
            Err(Error::EmptyField { .. }) => {
                ctx.say("❌ O nome do cliente é obrigatório.").await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists clients and how many projects each has.
    #[poise::command(slash_command, rename = "list")]
    pub async fn client_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let clients = client::get_all_clients(db).await?;
        if clients.is_empty() {
            ctx.say("👤 Nenhum cliente cadastrado.").await?;
            return Ok(());
        }

        let mut out = String::from("👤 **Clientes**\n");
        for c in &clients {
            let projects = project::get_projects_for_client(db, &c.name).await?;
            writeln!(
                out,
                "• **{}** | {} | {} | {} | {} projeto(s)",
                c.name,
                c.company,
                c.email,
                c.phone,
                projects.len()
            )?;
        }
        reply::say_long(ctx, &out).await
    }

    /// Shows a client's contact details and projects.
    #[poise::command(slash_command, rename = "show")]
    pub async fn client_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Nome do cliente"]
        #[autocomplete = "autocomplete::autocomplete_client_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let found = match client::get_client_by_name(db, &name).await {
            Ok(found) => found,
            Err(Error::ClientNotFound { name }) => {
                ctx.say(format!("❌ Cliente **{name}** não encontrado."))
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let mut out = format!(
            "👤 **{}**\nEmpresa: {}\nE-mail: {}\nTelefone: {}\n",
            found.name, found.company, found.email, found.phone
        );
        let projects = project::get_projects_for_client(db, &found.name).await?;
        if projects.is_empty() {
            writeln!(out, "Nenhum projeto vinculado.")?;
        }
        for p in &projects {
            writeln!(out, "• **{}** | {} | {}%", p.name, p.status, p.completion_percentage)?;
        }
        reply::say_long(ctx, &out).await
    }
}

// Re-export all commands
pub use inner::*;
