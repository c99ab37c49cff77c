//! Action handlers: UpdateAction dispatch and background task spawning

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use vizlearn_core::prelude::*;

use crate::handler::UpdateAction;
use crate::message::Message;
use crate::services::LessonService;
use crate::state::RequestKind;

/// Execute an action by spawning a background task.
///
/// Every collaborator call is bounded by `request_timeout`; the outcome comes
/// back to the update loop as a `Message` on `msg_tx`.
pub fn handle_action<S>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    service: Arc<S>,
    request_timeout: Duration,
) -> tokio::task::JoinHandle<()>
where
    S: LessonService + Send + Sync + 'static,
{
    match action {
        UpdateAction::GenerateLesson { topic, age } => tokio::spawn(async move {
            let outcome =
                with_timeout(request_timeout, service.generate_lesson(&topic, age)).await;
            send(&msg_tx, lesson_message(RequestKind::Generate, outcome)).await;
        }),

        UpdateAction::FetchLesson { filename } => tokio::spawn(async move {
            let outcome = with_timeout(request_timeout, service.fetch_lesson(&filename)).await;
            send(&msg_tx, lesson_message(RequestKind::Load, outcome)).await;
        }),

        UpdateAction::FetchLessonSummaries => tokio::spawn(async move {
            let lessons =
                match tokio::time::timeout(request_timeout, service.fetch_lesson_summaries()).await
                {
                    Ok(lessons) => lessons,
                    Err(_) => {
                        warn!("Lesson listing timed out after {:?}", request_timeout);
                        Vec::new()
                    }
                };
            send(&msg_tx, Message::LessonsListed { lessons }).await;
        }),
    }
}

/// Bound `future`, turning an elapsed deadline into `Error::Timeout`
pub async fn with_timeout<T>(
    limit: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            secs: limit.as_secs(),
        }),
    }
}

fn lesson_message(request: RequestKind, outcome: Result<vizlearn_core::LessonData>) -> Message {
    match outcome {
        Ok(lesson) => Message::LessonReady {
            request,
            lesson: Arc::new(lesson),
        },
        Err(e) => {
            if e.is_recoverable() {
                warn!("{:?} request failed: {}", request, e);
            } else {
                error!("{:?} request failed: {}", request, e);
            }
            Message::LessonFailed {
                request,
                error: e.to_string(),
            }
        }
    }
}

async fn send(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        debug!("Message channel closed; dropping collaborator result");
    }
}
