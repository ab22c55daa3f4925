//! AI consultant Discord commands.
//!
//! `/ask` keeps a conversation per channel. `/budget_ask` and `/analyze_plan`
//! are one-shot questions asked from the budget, the first one with the
//! budget's context attached.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        ai::PlanImage,
        bot::{
            BotData,
            handlers::{autocomplete, lookup, reply},
        },
        core::{budget, consultant},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    async fn download_plan(attachment: &serenity::Attachment) -> Result<PlanImage> {
        let bytes = attachment.download().await?;
        let mime_type = attachment
            .content_type
            .clone()
            .filter(|t| t.starts_with("image/"))
            .unwrap_or_else(|| "image/jpeg".to_string());
        Ok(PlanImage { bytes, mime_type })
    }

    /// Asks the technical consultant, optionally attaching a floor plan.
    #[poise::command(slash_command)]
    pub async fn ask(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Pergunta ou instrução"] question: Option<String>,
        #[description = "Planta baixa para análise visual"] plan: Option<serenity::Attachment>,
    ) -> Result<()> {
        ctx.defer().await?;

        let image = match &plan {
            Some(attachment) => Some(download_plan(attachment).await?),
            None => None,
        };

        let data = ctx.data();
        let submission = consultant::Submission {
            text: question.unwrap_or_default(),
            image,
        };

        match data
            .sessions
            .submit(data.advisor.as_ref(), ctx.channel_id().get(), submission)
            .await
        {
            Ok(answer) => reply::say_long(ctx, &answer).await?,
            Err(Error::ConsultantBusy) => {
                ctx.say("⏳ Ainda estou respondendo a pergunta anterior neste canal.")
                    .await?;
            }
            Err(Error::EmptySubmission) => {
                ctx.say("❌ Envie uma pergunta ou uma planta.").await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Shows the conversation so far in this channel.
    #[poise::command(slash_command, prefix_command)]
    pub async fn consultant_history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let conversation = ctx.data().sessions.history(ctx.channel_id().get()).await;

        let mut out = String::new();
        for message in conversation.messages() {
            let author = match message.role {
                consultant::Role::User => "👷",
                consultant::Role::Assistant => "🤖",
            };
            let image = if message.has_image { " 🖼️" } else { "" };
            writeln!(out, "{author}{image} {}\n", message.content)?;
        }
        reply::say_long(ctx, &out).await
    }

    /// Starts a new conversation in this channel.
    #[poise::command(slash_command, prefix_command)]
    pub async fn consultant_reset(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.data().sessions.reset(ctx.channel_id().get()).await;
        ctx.say(consultant::WELCOME_MESSAGE).await?;
        Ok(())
    }

    /// Asks the consultant about a project's budget.
    #[poise::command(slash_command, prefix_command)]
    pub async fn budget_ask(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Projeto"]
        #[autocomplete = "autocomplete::autocomplete_project_name"]
        project: String,
        #[description = "Pergunta"] question: String,
        #[description = "Versão (padrão: a mais recente)"] version: Option<i32>,
        #[description = "Id do orçamento (#id em /budget versions)"] budget_id: Option<i64>,
    ) -> Result<()> {
        if question.trim().is_empty() {
            ctx.say("❌ Escreva uma pergunta.").await?;
            return Ok(());
        }
        ctx.defer().await?;

        let Some((found, selected)) =
            lookup::find_budget(ctx, &project, version, budget_id).await?
        else {
            return Ok(());
        };

        let data = ctx.data();
        let sheet = budget::load_sheet(&data.database, selected.id).await?;
        let context = consultant::budget_context(&found, &sheet);
        let answer =
            consultant::get_construction_advice(data.advisor.as_ref(), &question, Some(&context))
                .await;

        reply::say_long(ctx, &answer).await
    }

    /// Estimates materials from a floor plan.
    #[poise::command(slash_command)]
    pub async fn analyze_plan(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Planta baixa ou detalhe técnico"] plan: serenity::Attachment,
        #[description = "Instrução adicional"] prompt: Option<String>,
    ) -> Result<()> {
        ctx.defer().await?;

        let image = download_plan(&plan).await?;
        let prompt =
            consultant::prompt_or_default(prompt.as_deref(), consultant::BUDGET_VISION_PROMPT);
        let answer =
            consultant::analyze_plan_image(ctx.data().advisor.as_ref(), &image, prompt).await;

        reply::say_long(ctx, &answer).await
    }
}

// Re-export all commands
pub use inner::*;
