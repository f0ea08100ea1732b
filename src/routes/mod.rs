pub(crate) mod health;
pub(crate) mod portfolio;
pub(crate) mod tracked_coins;
pub(crate) mod coins;
pub(crate) mod market;
pub(crate) mod chat;
pub(crate) mod assistant;
pub(crate) mod setup;
