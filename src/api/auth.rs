//! Access token loading
//!
//! The token comes from `PROMINENCE_TOKEN` when set, otherwise from the
//! token file written by the login flow. The file may hold the raw token or
//! the JSON document returned by the identity provider.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct TokenDocument {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    exp: Option<i64>,
}

/// Find the access token and reject it if it has already expired.
pub fn load_token(env_token: Option<&str>, token_file: Option<&Path>, now: i64) -> Result<String> {
    let token = match env_token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => {
            debug!("Using token from environment");
            token.to_string()
        }
        None => match token_file {
            Some(path) if path.exists() => read_token_file(path)?,
            _ => return Err(Error::Authentication("no token found".to_string())),
        },
    };

    if let Some(exp) = expiry(&token) {
        if exp < now {
            return Err(Error::TokenExpired);
        }
    }

    Ok(token)
}

/// Read a token file, refusing files readable by other users.
pub fn read_token_file(path: &Path) -> Result<String> {
    check_permissions(path)?;

    let text = fs::read_to_string(path)?;
    let text = text.trim();
    if !text.starts_with('{') {
        return Ok(text.to_string());
    }

    let document: TokenDocument = serde_json::from_str(text)
        .map_err(|e| Error::Token(format!("unable to read {}: {}", path.display(), e)))?;
    document
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Token(format!("no access token in {}", path.display())))
}

#[cfg(unix)]
fn check_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)?.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        return Err(Error::Token(format!(
            "token file {} has permissions {:o}, should be 0600",
            path.display(),
            mode
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// The `exp` claim of a JWT, if the token is one.
pub fn expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<JwtClaims>(&bytes).ok()?.exp
}
