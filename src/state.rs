use std::sync::Arc;

use crate::services::assistant_gateway::AssistantGateway;
use crate::store::{ConversationStore, PortfolioStore};

#[derive(Clone)]
pub struct AppState {
    pub portfolio_store: Arc<dyn PortfolioStore>,
    pub conversation_store: Arc<dyn ConversationStore>,
    pub gateway: Arc<AssistantGateway>,
    pub jwt_secret: Option<String>,
}
