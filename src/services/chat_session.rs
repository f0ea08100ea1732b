use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::{AppError, AssistantError, StoreError};
use crate::models::{
    ChatRequest, ChatRole, ChatTurn, ContextSnapshot, HistoryTurn, PortfolioSnapshotEntry,
    SessionReply, TurnOutcome,
};
use crate::services::assistant_gateway::{AssistantGateway, ONBOARDING_REPLY};
use crate::services::conversation_assembler::trailing_window;
use crate::store::ConversationStore;

pub const SIGN_IN_PROMPT: &str = "Please sign in to chat with the AI assistant about your portfolio.";
pub const TRY_AGAIN_NOTICE: &str = "Failed to get AI response. Please try again.";

/// Persists turns in the order they were enqueued, one at a time, off the request path.
/// Failures are logged and dropped; nothing is retried.
struct TurnWriter {
    tx: mpsc::UnboundedSender<ChatTurn>,
}

impl TurnWriter {
    fn spawn(store: Arc<dyn ConversationStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ChatTurn>();

        tokio::spawn(async move {
            while let Some(turn) = rx.recv().await {
                let (id, role) = (turn.id, turn.role);
                if let Err(e) = store.append_turn(turn).await {
                    warn!("Failed to persist {} turn {}: {}", role, id, e);
                }
            }
        });

        Self { tx }
    }

    fn enqueue(&self, turn: ChatTurn) {
        if let Err(e) = self.tx.send(turn) {
            warn!("Chat turn writer stopped, dropping turn {}", e.0.id);
        }
    }
}

/// One viewer's conversation with the assistant.
///
/// The visible transcript is updated before persistence is attempted, so the
/// conversation store trails it and may miss turns under failure.
pub struct ChatSession {
    viewer: Option<Uuid>,
    transcript: Vec<ChatTurn>,
    gateway: Arc<AssistantGateway>,
    writer: TurnWriter,
}

impl ChatSession {
    pub fn new(viewer: Option<Uuid>, gateway: Arc<AssistantGateway>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            viewer,
            transcript: Vec::new(),
            gateway,
            writer: TurnWriter::spawn(store),
        }
    }

    /// Continue the stored conversation of `user_id`. Only the turns that
    /// fit the history window are loaded.
    pub async fn restore(
        user_id: Uuid,
        gateway: Arc<AssistantGateway>,
        store: Arc<dyn ConversationStore>,
    ) -> Result<Self, StoreError> {
        let transcript = store.list_recent_turns(user_id, gateway.history_window()).await?;
        info!("Restored chat session for {} ({} turns)", user_id, transcript.len());

        let mut session = Self::new(Some(user_id), gateway, store);
        session.transcript = transcript;
        Ok(session)
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub async fn send(
        &mut self,
        message: &str,
        portfolio: &[PortfolioSnapshotEntry],
        tracked_coins: &[String],
    ) -> Result<SessionReply, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }

        let Some(user_id) = self.viewer else {
            return Ok(SessionReply {
                outcome: TurnOutcome::SignInRequired,
                message: SIGN_IN_PROMPT.to_string(),
            });
        };

        if portfolio.is_empty() {
            return Ok(SessionReply {
                outcome: TurnOutcome::OnboardingRequired,
                message: ONBOARDING_REPLY.to_string(),
            });
        }

        let context = ContextSnapshot {
            portfolio_entries: portfolio.len(),
            tracked_coins: tracked_coins.len(),
        };

        // Window is taken before the new turn is appended
        let chat_history: Vec<HistoryTurn> = trailing_window(&self.transcript, self.gateway.history_window())
            .iter()
            .map(HistoryTurn::from)
            .collect();

        let user_turn = ChatTurn::new(user_id, ChatRole::User, message, context);
        self.transcript.push(user_turn.clone());
        self.writer.enqueue(user_turn);

        let request = ChatRequest {
            message: message.to_string(),
            portfolio: portfolio.to_vec(),
            selected_coins: tracked_coins.to_vec(),
            chat_history,
        };

        let reply = self.gateway.reply(&request).await.map_err(|e| {
            error!("Assistant turn failed for {}: {}", user_id, e);
            match e {
                AssistantError::Upstream { status, .. } => AppError::Assistant(AssistantError::Upstream {
                    status,
                    detail: TRY_AGAIN_NOTICE.to_string(),
                }),
                other => AppError::Assistant(other),
            }
        })?;

        let assistant_turn = ChatTurn::new(user_id, ChatRole::Assistant, reply.clone(), context);
        self.transcript.push(assistant_turn.clone());
        self.writer.enqueue(assistant_turn);

        Ok(SessionReply {
            outcome: TurnOutcome::Replied,
            message: reply,
        })
    }
}
