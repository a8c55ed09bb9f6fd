use serde::{Deserialize, Serialize};

/// Body of `POST /login`. Absent fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub code: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&crate::SessionError> for ErrorResponse {
    fn from(err: &crate::SessionError) -> Self {
        // Key and configuration details stay in the logs.
        let error = match err {
            crate::SessionError::Encode(crate::EncodeError::TooLarge { .. }) => {
                "session too large"
            }
            _ => "session could not be saved",
        };
        Self {
            error: error.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EncodeError, SessionError};

    #[test]
    fn test_login_form_defaults_missing_fields() {
        let form: LoginForm = serde_json::from_str(r#"{"code":"abc"}"#).unwrap();
        assert_eq!(form.code, "abc");
        assert_eq!(form.username, "");
    }

    #[test]
    fn test_error_response_hides_details() {
        let err = SessionError::Configuration("signing key leaked here".to_owned());
        assert_eq!(ErrorResponse::from(&err).error, "session could not be saved");

        let err = SessionError::Encode(EncodeError::TooLarge {
            length: 5000,
            limit: 4096,
        });
        assert_eq!(ErrorResponse::from(&err).error, "session too large");
    }
}
