use crate::external::model_provider::Content;
use crate::models::{ChatRole, HistoryTurn};

/// The most recent `window` turns, oldest first. Older turns are dropped silently.
pub fn trailing_window<T>(history: &[T], window: usize) -> &[T] {
    let start = history.len().saturating_sub(window);
    &history[start..]
}

/// Order prior turns and the new user message the way the model API expects.
///
/// Each message carries exactly one text part; the new message is always last.
pub fn assemble_contents(history: &[HistoryTurn], new_message: &str, window: usize) -> Vec<Content> {
    let recent = trailing_window(history, window);

    let mut contents: Vec<Content> = recent
        .iter()
        .map(|turn| Content::text(turn.role.model_role(), turn.content.as_str()))
        .collect();
    contents.push(Content::text(ChatRole::User.model_role(), new_message));

    contents
}
