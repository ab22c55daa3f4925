//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Lists the available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**OrçaAI - Ajuda**\n\n\
        **Projetos e clientes**\n\
        • `/project create|list|show|status|progress` - Cadastro e acompanhamento de obras.\n\
        • `/client add|list` - Cadastro de clientes.\n\n\
        **Orçamento**\n\
        • `/budget show <projeto> [versão]` - Itens, custo direto, BDI e preço de venda.\n\
        • `/budget add_item <projeto> <código>` - Adiciona uma composição do catálogo.\n\
        • `/budget quantity <item> <quantidade>` - Altera a quantidade de um item.\n\
        • `/budget remove <item>` - Remove um item.\n\
        • `/budget bdi <projeto> <bdi>` - Altera o BDI.\n\
        • `/budget revise <projeto> [versão]` - Cria uma nova revisão.\n\
        • `/budget versions <projeto>` - Lista as versões.\n\
        • `/budget status <projeto> <situação>` - Aprova ou marca como obsoleto.\n\
        • `/catalog <termo>` - Pesquisa composições SINAPI/TCPO.\n\n\
        **Custos realizados**\n\
        • `/cost add|remove|summary` - Orçado x realizado.\n\n\
        **Tabelas de referência**\n\
        • `/table import <arquivo> <tipo>` e `/table list`.\n\n\
        **Consultor IA**\n\
        • `/ask <pergunta> [planta]` - Conversa com o consultor técnico.\n\
        • `/budget_ask <projeto> <pergunta>` - Pergunta com o contexto do orçamento.\n\
        • `/analyze_plan <planta> [instrução]` - Levantamento de quantitativos a partir da planta.\n\
        • `/consultant_reset` - Reinicia a conversa deste canal.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
