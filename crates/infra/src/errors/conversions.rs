//! Conversions from external infrastructure errors into domain errors.

use airvantage_domain::AirVantageError;
use oauth2::basic::BasicErrorResponse;
use oauth2::{HttpClientError, RequestTokenError};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AirVantageError);

impl From<InfraError> for AirVantageError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AirVantageError> for InfraError {
    fn from(value: AirVantageError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAirVantageError {
    fn into_airvantage(self) -> AirVantageError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AirVantageError */
/* -------------------------------------------------------------------------- */

impl IntoAirVantageError for HttpError {
    fn into_airvantage(self) -> AirVantageError {
        if self.is_builder() {
            return AirVantageError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_timeout() {
            return AirVantageError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AirVantageError::Network("HTTP connection failure".into());
        }

        AirVantageError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_airvantage())
    }
}

/* -------------------------------------------------------------------------- */
/* oauth2 token errors → AirVantageError */
/* -------------------------------------------------------------------------- */

type TokenError = RequestTokenError<HttpClientError<HttpError>, BasicErrorResponse>;

impl IntoAirVantageError for TokenError {
    fn into_airvantage(self) -> AirVantageError {
        match self {
            RequestTokenError::ServerResponse(response) => {
                let mut message = format!("token endpoint rejected the grant: {}", response.error());
                if let Some(description) = response.error_description() {
                    message.push_str(": ");
                    message.push_str(description);
                }
                AirVantageError::Auth(message)
            }
            RequestTokenError::Request(err) => {
                AirVantageError::Network(format!("token request failed: {err}"))
            }
            RequestTokenError::Parse(err, _body) => {
                AirVantageError::Auth(format!("invalid token response: {err}"))
            }
            RequestTokenError::Other(message) => AirVantageError::Auth(message),
        }
    }
}

impl From<TokenError> for InfraError {
    fn from(value: TokenError) -> Self {
        InfraError(value.into_airvantage())
    }
}

impl From<oauth2::url::ParseError> for InfraError {
    fn from(value: oauth2::url::ParseError) -> Self {
        InfraError(AirVantageError::Config(format!("invalid OAuth endpoint: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
