//! Message processing: runs the TEA update loop and dispatches actions

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::services::LessonService;
use crate::state::AppState;

/// Process a message through the TEA update function.
///
/// Follow-up messages are processed in the same call; actions are spawned
/// and report back through `msg_tx`.
pub fn process_message<S>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    service: &Arc<S>,
) where
    S: LessonService + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            tracing::debug!("Dispatching {:?}", action);
            handle_action(
                action,
                msg_tx.clone(),
                Arc::clone(service),
                state.settings.client.request_timeout(),
            );
        }

        msg = result.message;
    }
}
