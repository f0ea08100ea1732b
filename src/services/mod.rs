pub mod prompt_composer;
pub mod conversation_assembler;
pub mod assistant_gateway;
pub mod chat_session;
pub mod portfolio_service;
pub mod tracked_coin_service;
pub mod market_service;
