//! Feedback submission to an external form-collection endpoint.
//!
//! Orthogonal to the pipeline: shares no state with it and must never block
//! a summarization run.

use crate::error::{Result, YtsumError};
use tracing::debug;

/// Default form-collection endpoint.
pub const DEFAULT_FEEDBACK_URL: &str = "https://formspree.io/f/mrblrrgb";

/// POST a name/email/message form. Success is exactly HTTP 200; any other
/// status or a transport error is a failure.
pub async fn send_feedback(endpoint: &str, name: &str, email: &str, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(YtsumError::Feedback("message must not be empty".to_string()));
    }

    let form = [("name", name), ("email", email), ("message", message)];

    let response = reqwest::Client::new()
        .post(endpoint)
        .form(&form)
        .send()
        .await
        .map_err(|e| YtsumError::Feedback(format!("request failed: {e}")))?;

    let status = response.status();
    debug!("Feedback endpoint returned {status}");

    if status.as_u16() != 200 {
        return Err(YtsumError::Feedback(format!(
            "endpoint returned {status}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let result = send_feedback(DEFAULT_FEEDBACK_URL, "a", "a@b.c", "   ").await;
        assert!(matches!(result, Err(YtsumError::Feedback(_))));
    }
}
