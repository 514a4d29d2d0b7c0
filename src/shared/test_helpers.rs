#[cfg(test)]
use base64::prelude::*;

/// Authorization header value for HTTP basic auth
#[cfg(test)]
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{}:{}", username, password))
    )
}
