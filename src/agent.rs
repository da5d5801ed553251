//! Summarisation requests against the chat-completion provider.
//!
//! One call per summary, no retries: provider failures are mapped onto the
//! crate's error taxonomy and returned to the caller to decide what to do.

pub use crate::summary::SummaryOptions;

use crate::credential::Client;
use crate::error::{Error, Result};
use crate::provider::{ChatMessage, ChatRequest, ProviderError};
use tracing::{debug, warn};

/// Build the chat request for summarising `text` with `options`.
pub fn build_request(model: &str, text: &str, options: &SummaryOptions) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(options.instruction()),
            ChatMessage::user(text),
        ],
    }
}

/// Summarise `text` with the client's provider and key.
///
/// Returns the first completion's text. A completion with no content yields an
/// empty summary; a response with no completions at all is a failure.
pub async fn summarize(client: &Client, text: &str, options: &SummaryOptions) -> Result<String> {
    if text.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    let request = build_request(&client.model, text, options);
    debug!(
        chars = text.chars().count(),
        ?options,
        "sending summarisation request"
    );

    let response = client
        .provider
        .complete(&client.credential, &request)
        .await
        .map_err(map_provider_error)?;

    let choice = response.choices.into_iter().next().ok_or_else(|| {
        warn!("provider returned no completions");
        Error::UnknownFailure { status: None }
    })?;

    Ok(choice.message.content.unwrap_or_default())
}

/// Map a provider failure onto the error taxonomy.
pub fn map_provider_error(error: ProviderError) -> Error {
    warn!(error = %error, "summarisation request failed");
    match error.status() {
        Some(401) => Error::InvalidCredential,
        Some(429) => Error::RateLimited,
        Some(500..=599) => Error::ServiceUnavailable,
        status => Error::UnknownFailure { status },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;
    use crate::summary::{Length, OutputFormat};

    fn status(code: u16) -> ProviderError {
        ProviderError::Status {
            status: code,
            message: "stub".to_string(),
        }
    }

    #[test]
    fn request_has_system_instruction_then_user_text() {
        let options = SummaryOptions::new(Length::Short, OutputFormat::Bullets);
        let request = build_request("gpt-3.5-turbo", "the text", &options);

        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, options.instruction());
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "the text");
    }

    #[test]
    fn maps_statuses_onto_taxonomy() {
        assert!(matches!(map_provider_error(status(401)), Error::InvalidCredential));
        assert!(matches!(map_provider_error(status(429)), Error::RateLimited));
        assert!(matches!(map_provider_error(status(500)), Error::ServiceUnavailable));
        assert!(matches!(map_provider_error(status(503)), Error::ServiceUnavailable));
        assert!(matches!(
            map_provider_error(status(400)),
            Error::UnknownFailure { status: Some(400) }
        ));
        assert!(matches!(
            map_provider_error(ProviderError::Transport("reset".into())),
            Error::UnknownFailure { status: None }
        ));
    }
}
