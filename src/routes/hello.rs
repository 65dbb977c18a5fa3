//! Welcome endpoint.

use crate::config::WELCOME_MESSAGE;

/// Welcome handler.
///
/// Reads nothing from the request and always answers 200 with the same
/// plaintext body. Authorization is decided by the tenant gate before this runs.
pub async fn hello() -> &'static str {
    WELCOME_MESSAGE
}
