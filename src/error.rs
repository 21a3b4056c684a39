use thiserror::Error;

/// Every failure the bot can hit. Only `Config` is fatal; the rest are
/// contained per poll cycle and surfaced as a chat message.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API returned {code} ({reason}): {body}")]
    HttpStatus {
        code: u16,
        reason: String,
        body: String,
    },

    #[error("failed to decode API response: {0}")]
    Decode(String),

    #[error("API response is empty")]
    EmptyResponse,

    #[error("API response is not a mapping")]
    NotAMapping,

    #[error("API response has no `{0}` key")]
    MissingKey(&'static str),

    #[error("`homeworks` is not a sequence")]
    NotASequence,

    #[error("homework record has no `{0}` field")]
    MissingField(&'static str),

    #[error("unknown homework status `{0}`")]
    UnknownStatus(String),

    #[error("failed to deliver message: {0}")]
    Delivery(String),
}
