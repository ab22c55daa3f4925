//! Technical consultant - Construction advice and plan analysis.
//!
//! [`get_construction_advice`] and [`analyze_plan_image`] never fail: any
//! advisor error is logged and replaced by a fixed reply, and an empty answer
//! gets its own fixed reply. Conversations are kept per Discord channel in
//! [`ConsultantSessions`].

use crate::{
    ai::{Advisor, PlanImage},
    core::budget::BudgetSheet,
    entities::project,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::error;

/// Reply when a text completion fails
pub const ADVICE_ERROR_REPLY: &str = "Desculpe, ocorreu um erro ao processar sua solicitação técnica. Verifique sua conexão ou tente novamente.";
/// Reply when a text completion comes back empty
pub const ADVICE_EMPTY_REPLY: &str = "Não foi possível gerar uma resposta no momento.";
/// Reply when a vision completion fails
pub const VISION_ERROR_REPLY: &str = "Erro ao analisar a planta.";
/// Reply when a vision completion comes back empty
pub const VISION_EMPTY_REPLY: &str = "Não consegui analisar a imagem.";

/// Placeholder used in the system instruction when there is no project context
pub const NO_CONTEXT: &str = "Nenhum contexto específico fornecido.";

/// First message of every conversation
pub const WELCOME_MESSAGE: &str = "Olá! Sou seu Consultor Técnico OrçaAI. Posso ajudar com dúvidas sobre composições (SINAPI/TCPO), analisar custos ou, no modo Visual, ler plantas baixas e estimar quantitativos. Como posso ajudar hoje?";

/// Plan prompt used by the consultant conversation when the user sends only an image
pub const CONSULTANT_VISION_PROMPT: &str =
    "Analise esta planta e liste os elementos construtivos visíveis.";
/// Plan prompt used from the budget screen when the user sends only an image
pub const BUDGET_VISION_PROMPT: &str = "Identifique os elementos construtivos e estime materiais.";

const QTO_INSTRUCTION: &str = "Atue como um especialista em Levantamento de Quantitativos (QTO). Analise esta planta baixa/detalhe técnico.";

/// System instruction for text advice, embedding the project context.
#[must_use]
pub fn system_instruction(context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(NO_CONTEXT);

    format!(
        "Você é um Engenheiro Civil Sênior e Especialista em Orçamentos de Obras trabalhando para o OrçaAI.\n\
         Seu objetivo é ajudar engenheiros e orçamentistas a criar orçamentos precisos, analisar composições de custos e sugerir melhorias.\n\
         Seja técnico, direto e use terminologia adequada (SINAPI, TCPO, BDI, Curva ABC).\n\
         Sempre responda em Português do Brasil.\n\n\
         Contexto atual do projeto: {context}"
    )
}

/// Vision prompt: the QTO instruction followed by the user's request.
#[must_use]
pub fn vision_prompt(prompt: &str) -> String {
    format!("{QTO_INSTRUCTION} {prompt}")
}

/// The user's prompt, or `default` when it is missing or blank.
#[must_use]
pub fn prompt_or_default<'a>(prompt: Option<&'a str>, default: &'a str) -> &'a str {
    prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(default)
}

/// Describes a budget for the consultant:
/// `Projeto: <name>. Orçamento Total: R$ <direct cost>. Itens: <descriptions>.`
#[must_use]
pub fn budget_context(project: &project::Model, sheet: &BudgetSheet) -> String {
    let items = sheet
        .items
        .iter()
        .map(|item| item.description.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Projeto: {}. Orçamento Total: R$ {:.2}. Itens: {items}.",
        project.name,
        sheet.totals().direct_cost
    )
}

/// Asks the advisor a technical question. Always returns displayable text.
pub async fn get_construction_advice(
    advisor: &dyn Advisor,
    query: &str,
    context: Option<&str>,
) -> String {
    match advisor
        .complete_text(&system_instruction(context), query)
        .await
    {
        Ok(text) if text.trim().is_empty() => ADVICE_EMPTY_REPLY.to_string(),
        Ok(text) => text,
        Err(e) => {
            error!("Construction advice request failed: {e}");
            ADVICE_ERROR_REPLY.to_string()
        }
    }
}

/// Asks the advisor to read a plan image. Always returns displayable text.
pub async fn analyze_plan_image(advisor: &dyn Advisor, image: &PlanImage, prompt: &str) -> String {
    match advisor.complete_vision(image, &vision_prompt(prompt)).await {
        Ok(text) if text.trim().is_empty() => VISION_EMPTY_REPLY.to_string(),
        Ok(text) => text,
        Err(e) => {
            error!("Plan analysis request failed: {e}");
            VISION_ERROR_REPLY.to_string()
        }
    }
}

/// Who wrote a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The person asking
    User,
    /// The consultant
    Assistant,
}

/// One entry of a conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Author
    pub role: Role,
    /// Text as shown
    pub content: String,
    /// Whether a plan image was attached
    pub has_image: bool,
    /// When the message was added
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: String, has_image: bool) -> Self {
        Self {
            role,
            content,
            has_image,
            timestamp: Utc::now(),
        }
    }
}

/// A consultant conversation.
///
/// While a reply is pending the conversation is loading and refuses new
/// submissions.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    loading: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// A conversation holding only the welcome message
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![Message::new(
                Role::Assistant,
                WELCOME_MESSAGE.to_string(),
                false,
            )],
            loading: false,
        }
    }

    /// Messages in order
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while a reply is pending
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Records the user's message and marks the conversation as loading.
    ///
    /// # Errors
    /// [`Error::ConsultantBusy`] while a reply is pending and
    /// [`Error::EmptySubmission`] when there is neither text nor image.
    pub fn begin(&mut self, text: &str, has_image: bool) -> Result<()> {
        if self.loading {
            return Err(Error::ConsultantBusy);
        }
        if text.trim().is_empty() && !has_image {
            return Err(Error::EmptySubmission);
        }
        self.messages
            .push(Message::new(Role::User, text.to_string(), has_image));
        self.loading = true;
        Ok(())
    }

    /// Appends the consultant's reply and clears the loading flag.
    pub fn finish(&mut self, reply: String) {
        self.messages.push(Message::new(Role::Assistant, reply, false));
        self.loading = false;
    }
}

/// A message sent to the consultant conversation
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// Question or instruction, possibly empty when an image is attached
    pub text: String,
    /// Plan image for visual analysis
    pub image: Option<PlanImage>,
}

/// Conversations keyed by channel id.
#[derive(Debug, Default)]
pub struct ConsultantSessions {
    conversations: Mutex<HashMap<u64, Conversation>>,
}

impl ConsultantSessions {
    /// No conversations yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends a submission and returns the consultant's reply.
    ///
    /// With an image the plan is analysed, using [`CONSULTANT_VISION_PROMPT`]
    /// when no text is given. Otherwise the text is answered without project
    /// context. The lock is not held while the advisor works, and the reply is
    /// not recorded if the channel was reset in the meantime.
    ///
    /// # Errors
    /// [`Error::ConsultantBusy`] or [`Error::EmptySubmission`] from
    /// [`Conversation::begin`]. Advisor failures are turned into replies.
    pub async fn submit(
        &self,
        advisor: &dyn Advisor,
        channel_id: u64,
        submission: Submission,
    ) -> Result<String> {
        {
            let mut conversations = self.conversations.lock().await;
            conversations
                .entry(channel_id)
                .or_default()
                .begin(&submission.text, submission.image.is_some())?;
        }

        let reply = match &submission.image {
            Some(image) => {
                let prompt =
                    prompt_or_default(Some(submission.text.as_str()), CONSULTANT_VISION_PROMPT);
                analyze_plan_image(advisor, image, prompt).await
            }
            None => get_construction_advice(advisor, &submission.text, None).await,
        };

        // A reset while the advisor was working leaves nothing to finish.
        if let Some(conversation) = self.conversations.lock().await.get_mut(&channel_id) {
            conversation.finish(reply.clone());
        }
        Ok(reply)
    }

    /// Copy of a channel's conversation; a fresh one if the channel has none.
    pub async fn history(&self, channel_id: u64) -> Conversation {
        self.conversations
            .lock()
            .await
            .get(&channel_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Forgets a channel's conversation.
    pub async fn reset(&self, channel_id: u64) {
        self.conversations.lock().await.remove(&channel_id);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use async_trait::async_trait;

    /// Records what it was asked and answers with a fixed outcome.
    struct StubAdvisor {
        reply: Option<String>,
        last_instruction: std::sync::Mutex<Option<String>>,
        last_prompt: std::sync::Mutex<Option<String>>,
    }

    impl StubAdvisor {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                last_instruction: std::sync::Mutex::new(None),
                last_prompt: std::sync::Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                last_instruction: std::sync::Mutex::new(None),
                last_prompt: std::sync::Mutex::new(None),
            }
        }

        fn outcome(&self) -> Result<String> {
            self.reply.clone().ok_or_else(|| Error::Ai {
                message: "connection refused".to_string(),
            })
        }
    }

    #[async_trait]
    impl Advisor for StubAdvisor {
        async fn complete_text(&self, system_instruction: &str, _query: &str) -> Result<String> {
            *self.last_instruction.lock().unwrap() = Some(system_instruction.to_string());
            self.outcome()
        }

        async fn complete_vision(&self, _image: &PlanImage, prompt: &str) -> Result<String> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.outcome()
        }
    }

    #[tokio::test]
    async fn test_failed_advice_returns_fixed_reply() {
        let advisor = StubAdvisor::failing();
        let reply = get_construction_advice(&advisor, "Qual o BDI?", None).await;
        assert_eq!(reply, ADVICE_ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_empty_advice_returns_fixed_reply() {
        let advisor = StubAdvisor::replying("  ");
        let reply = get_construction_advice(&advisor, "Qual o BDI?", None).await;
        assert_eq!(reply, ADVICE_EMPTY_REPLY);
    }

    #[tokio::test]
    async fn test_advice_embeds_context() {
        let advisor = StubAdvisor::replying("Use BDI de 25%.");
        let reply = get_construction_advice(&advisor, "Qual o BDI?", Some("Projeto: X.")).await;
        assert_eq!(reply, "Use BDI de 25%.");

        let instruction = advisor.last_instruction.lock().unwrap().clone().unwrap();
        assert!(instruction.ends_with("Contexto atual do projeto: Projeto: X."));
        assert!(instruction.contains("Português do Brasil"));
    }

    #[test]
    fn test_missing_context_placeholder() {
        assert!(system_instruction(None).ends_with(NO_CONTEXT));
        assert!(system_instruction(Some("")).ends_with(NO_CONTEXT));
    }

    #[tokio::test]
    async fn test_vision_fallbacks_and_prompt() {
        let image = PlanImage::jpeg(vec![1, 2, 3]);

        let failing = StubAdvisor::failing();
        assert_eq!(
            analyze_plan_image(&failing, &image, BUDGET_VISION_PROMPT).await,
            VISION_ERROR_REPLY
        );

        let empty = StubAdvisor::replying("");
        assert_eq!(
            analyze_plan_image(&empty, &image, BUDGET_VISION_PROMPT).await,
            VISION_EMPTY_REPLY
        );

        let prompt = failing.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.starts_with("Atue como um especialista em Levantamento de Quantitativos (QTO)."));
        assert!(prompt.ends_with(BUDGET_VISION_PROMPT));
    }

    #[tokio::test]
    async fn test_budget_context() -> Result<()> {
        let (db, project, budget) = setup_with_project().await?;
        let first = add_test_item(&db, budget.id, 2.0, 100.0).await?;
        let second = add_test_item(&db, budget.id, 1.0, 50.5).await?;

        let sheet = crate::core::budget::load_sheet(&db, budget.id).await?;
        let context = budget_context(&project, &sheet);
        assert_eq!(
            context,
            format!(
                "Projeto: {}. Orçamento Total: R$ 250.50. Itens: {}, {}.",
                project.name, first.description, second.description
            )
        );
        Ok(())
    }

    #[test]
    fn test_conversation_flow() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].content, WELCOME_MESSAGE);

        assert!(matches!(
            conversation.begin("   ", false),
            Err(Error::EmptySubmission)
        ));

        conversation.begin("Olá", false).unwrap();
        assert!(conversation.is_loading());
        assert!(matches!(
            conversation.begin("De novo", false),
            Err(Error::ConsultantBusy)
        ));

        conversation.finish("Resposta".to_string());
        assert!(!conversation.is_loading());
        assert_eq!(conversation.messages().len(), 3);
        assert_eq!(conversation.messages()[2].role, Role::Assistant);

        // an image alone is a valid submission
        conversation.begin("", true).unwrap();
    }

    #[tokio::test]
    async fn test_sessions_are_per_channel() -> Result<()> {
        let sessions = ConsultantSessions::new();
        let advisor = StubAdvisor::replying("Resposta técnica");

        let reply = sessions
            .submit(
                &advisor,
                1,
                Submission {
                    text: "Como calcular BDI?".to_string(),
                    image: None,
                },
            )
            .await?;
        assert_eq!(reply, "Resposta técnica");

        let first = sessions.history(1).await;
        assert_eq!(first.messages().len(), 3);
        assert!(!first.is_loading());
        assert_eq!(sessions.history(2).await.messages().len(), 1);

        sessions.reset(1).await;
        assert_eq!(sessions.history(1).await.messages().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_image_submission_uses_default_prompt() -> Result<()> {
        let sessions = ConsultantSessions::new();
        let advisor = StubAdvisor::replying("Paredes e portas");

        sessions
            .submit(
                &advisor,
                7,
                Submission {
                    text: String::new(),
                    image: Some(PlanImage::jpeg(vec![9])),
                },
            )
            .await?;

        let prompt = advisor.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.ends_with(CONSULTANT_VISION_PROMPT));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_submission_is_rejected() {
        let sessions = ConsultantSessions::new();
        let advisor = StubAdvisor::replying("x");
        let result = sessions.submit(&advisor, 3, Submission::default()).await;
        assert!(matches!(result, Err(Error::EmptySubmission)));
        assert!(!sessions.history(3).await.is_loading());
    }

    /// Resets the channel's conversation while it is answering.
    struct ResettingAdvisor {
        sessions: std::sync::Arc<ConsultantSessions>,
        channel_id: u64,
    }

    #[async_trait]
    impl Advisor for ResettingAdvisor {
        async fn complete_text(&self, _system_instruction: &str, _query: &str) -> Result<String> {
            self.sessions.reset(self.channel_id).await;
            Ok("Resposta tardia".to_string())
        }

        async fn complete_vision(&self, _image: &PlanImage, _prompt: &str) -> Result<String> {
            self.sessions.reset(self.channel_id).await;
            Ok("Resposta tardia".to_string())
        }
    }

    #[tokio::test]
    async fn test_reset_during_reply_keeps_fresh_conversation() -> Result<()> {
        let sessions = std::sync::Arc::new(ConsultantSessions::new());
        let advisor = ResettingAdvisor {
            sessions: std::sync::Arc::clone(&sessions),
            channel_id: 7,
        };

        let reply = sessions
            .submit(
                &advisor,
                7,
                Submission {
                    text: "Qual o traço do contrapiso?".to_string(),
                    image: None,
                },
            )
            .await?;
        assert_eq!(reply, "Resposta tardia");

        let history = sessions.history(7).await;
        assert_eq!(history.messages().len(), 1);
        assert_eq!(history.messages()[0].content, WELCOME_MESSAGE);
        assert!(!history.is_loading());
        Ok(())
    }
}
