use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::domain::models::message::{Message, NewMessage};
use crate::domain::ports::MessageRepository;
use crate::error::AppError;

const MAX_ATTEMPTS: u32 = 100;
const BACKOFF_MS: u64 = 10;

/// Appends a chat message, retrying logical-clock collisions.
///
/// The repository assigns the next per-event seq inside its insert statement,
/// so a collision only happens when two writers race the same event. The
/// bounded retry loop is the fallback for stores without a stronger primitive;
/// exhausting it is fatal to the request.
pub async fn append_with_retry(
    repo: &Arc<dyn MessageRepository>,
    message: NewMessage,
) -> Result<Message, AppError> {
    let mut attempts = 0u32;
    loop {
        match repo.append(&message).await {
            Ok(saved) => return Ok(saved),
            Err(e) if e.is_unique_violation() => {
                attempts += 1;
                if attempts >= MAX_ATTEMPTS {
                    return Err(AppError::InternalWithMsg(format!(
                        "Message clock contention on event {} not resolved after {} attempts",
                        message.event_id, attempts
                    )));
                }
                warn!(
                    "Message seq collision on event {} (attempt {}), retrying",
                    message.event_id, attempts
                );
                sleep(Duration::from_millis(BACKOFF_MS)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
