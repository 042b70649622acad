use http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::Claims;
use crate::envelope::JsonError;
use crate::request::Request;

/// Decides whether a token request carries acceptable credentials.
///
/// On success it returns the claims to embed in the token; on failure, the
/// envelope to send back as-is. The validator reads the request body itself,
/// so it chooses the credential format.
///
/// Any `Fn(&Request) -> Result<Claims, JsonError>` is a validator:
///
/// ```rust,ignore
/// let validator = |req: &Request| -> Result<Claims, JsonError> {
///     let key = req.header("x-api-key").ok_or_else(|| {
///         JsonError::new(StatusCode::FORBIDDEN, "Authentication failed.")
///     })?;
///     Ok(Claims::new().subject(lookup_owner(key)?))
/// };
/// ```
pub trait CredentialValidator: Send + Sync + 'static {
    fn validate(&self, req: &Request) -> Result<Claims, JsonError>;
}

impl<F> CredentialValidator for F
where
    F: Fn(&Request) -> Result<Claims, JsonError> + Send + Sync + 'static,
{
    fn validate(&self, req: &Request) -> Result<Claims, JsonError> {
        self(req)
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Credentials {
    username: String,
    password: String,
}

/// Accepts exactly `{"username": "username", "password": "password"}`.
///
/// For tests and demos. Real deployments supply their own validator.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultValidator;

impl DefaultValidator {
    const USERNAME: &'static str = "username";
    const PASSWORD: &'static str = "password";
}

impl CredentialValidator for DefaultValidator {
    fn validate(&self, req: &Request) -> Result<Claims, JsonError> {
        let credentials: Credentials = serde_json::from_slice(req.body())
            .map_err(|_| JsonError::new(StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable entity."))?;

        if credentials.username != Self::USERNAME || credentials.password != Self::PASSWORD {
            return Err(JsonError::new(StatusCode::FORBIDDEN, "Authentication failed."));
        }

        Ok(Claims::new()
            .subject(credentials.username.clone())
            .payload(json!({"username": credentials.username, "type": "user"}))
            .ext("access", "level 1"))
    }
}
