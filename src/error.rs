use thiserror::Error;

/// Failures at the model-call boundary.
///
/// Segmentation and reconciliation never fail; every variant here originates
/// from configuring or calling the verdict provider.
#[derive(Debug, Error)]
pub enum ScreeningError {
    /// No credential available for the provider
    #[error("OPENAI_API_KEY is not set; export it before running an analysis")]
    MissingCredentials,

    /// The provider answered with a non-success status
    #[error("model API error: {status} - {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The request could not be sent or the envelope could not be read
    #[error("failed to reach the model API: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider envelope carried no text output
    #[error("model response contained no text output")]
    EmptyResponse,

    /// The model text did not match the analysis schema
    #[error("failed to parse model response as analysis JSON: {source}\n---raw---\n{raw}")]
    MalformedResponse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ScreeningError {
    /// Raw model output attached to a malformed-response error
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ScreeningError::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_response_keeps_raw_text() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ScreeningError::MalformedResponse {
            raw: "{not json".to_string(),
            source,
        };

        assert_eq!(err.raw_response(), Some("{not json"));
        assert!(err.to_string().contains("---raw---\n{not json"));
    }

    #[test]
    fn test_missing_credentials_message() {
        let err = ScreeningError::MissingCredentials;
        assert!(err.raw_response().is_none());
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
