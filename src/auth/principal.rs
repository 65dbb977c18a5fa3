//! Client principal forwarded by the hosting platform.
//!
//! After the platform's identity module validates a caller's token it strips
//! the `Authorization` header and forwards the identity as headers:
//! - `X-MS-CLIENT-PRINCIPAL-ID`: object id of the signed-in user
//! - `X-MS-CLIENT-PRINCIPAL-NAME`: display or user principal name
//! - `X-MS-CLIENT-PRINCIPAL-IDP`: identity provider (`aad`)
//! - `X-MS-CLIENT-PRINCIPAL`: base64 JSON with the full claim set
//! - `X-MS-CLIENT-PRINCIPAL-TENANT-ID`: tenant id, when not read from claims

use base64::{engine::general_purpose::STANDARD, Engine};
use http::HeaderMap;
use serde::Deserialize;

pub const HEADER_PRINCIPAL: &str = "x-ms-client-principal";
pub const HEADER_PRINCIPAL_ID: &str = "x-ms-client-principal-id";
pub const HEADER_PRINCIPAL_NAME: &str = "x-ms-client-principal-name";
pub const HEADER_PRINCIPAL_IDP: &str = "x-ms-client-principal-idp";
pub const HEADER_PRINCIPAL_TENANT_ID: &str = "x-ms-client-principal-tenant-id";

/// Claim types that carry the tenant id, in lookup order
const TENANT_CLAIM_TYPES: [&str; 2] = [
    "http://schemas.microsoft.com/identity/claims/tenantid",
    "tid",
];

/// An authenticated caller as seen by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPrincipal {
    /// Unique id from the identity provider
    pub id: String,
    pub name: Option<String>,
    /// Which provider authenticated this user
    pub identity_provider: Option<String>,
    /// Directory the user belongs to
    pub tenant_id: Option<String>,
}

/// Decoded `X-MS-CLIENT-PRINCIPAL` payload
#[derive(Debug, Deserialize)]
struct PrincipalClaims {
    #[serde(default)]
    claims: Vec<Claim>,
}

#[derive(Debug, Deserialize)]
struct Claim {
    typ: String,
    val: String,
}

impl ClientPrincipal {
    /// Build the principal from forwarded headers.
    ///
    /// Returns `None` when no principal id was forwarded, i.e. the caller
    /// never authenticated.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let id = header_str(headers, HEADER_PRINCIPAL_ID)?;

        let tenant_id = header_str(headers, HEADER_PRINCIPAL)
            .and_then(|encoded| tenant_from_claims(&encoded))
            .or_else(|| header_str(headers, HEADER_PRINCIPAL_TENANT_ID));

        Some(Self {
            id,
            name: header_str(headers, HEADER_PRINCIPAL_NAME),
            identity_provider: header_str(headers, HEADER_PRINCIPAL_IDP),
            tenant_id,
        })
    }

    /// Name for logs, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Check if this principal belongs to `tenant_id`
    pub fn is_member_of(&self, tenant_id: &str) -> bool {
        self.tenant_id
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(tenant_id))
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Extract the tenant claim from a base64 principal blob.
///
/// A blob that does not decode is treated as having no tenant claim.
fn tenant_from_claims(encoded: &str) -> Option<String> {
    let bytes = match STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "Client principal is not valid base64");
            return None;
        }
    };
    let payload: PrincipalClaims = match serde_json::from_slice(&bytes) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "Client principal is not valid JSON");
            return None;
        }
    };

    TENANT_CLAIM_TYPES.iter().find_map(|typ| {
        payload
            .claims
            .iter()
            .find(|c| c.typ == *typ)
            .map(|c| c.val.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn encode_claims(claims: &[(&str, &str)]) -> String {
        let claims: Vec<_> = claims
            .iter()
            .map(|(typ, val)| serde_json::json!({ "typ": typ, "val": val }))
            .collect();
        let payload = serde_json::json!({ "auth_typ": "aad", "claims": claims });
        STANDARD.encode(payload.to_string())
    }

    #[test]
    fn test_no_principal_id() {
        let map = headers(&[(HEADER_PRINCIPAL_TENANT_ID, "tenant-a")]);
        assert!(ClientPrincipal::from_headers(&map).is_none());
    }

    #[test]
    fn test_blank_principal_id() {
        let map = headers(&[(HEADER_PRINCIPAL_ID, "   ")]);
        assert!(ClientPrincipal::from_headers(&map).is_none());
    }

    #[test]
    fn test_plain_headers() {
        let map = headers(&[
            (HEADER_PRINCIPAL_ID, "user-1"),
            (HEADER_PRINCIPAL_NAME, "alice@contoso.com"),
            (HEADER_PRINCIPAL_IDP, "aad"),
            (HEADER_PRINCIPAL_TENANT_ID, "tenant-a"),
        ]);
        let principal = ClientPrincipal::from_headers(&map).unwrap();

        assert_eq!(principal.id, "user-1");
        assert_eq!(principal.display_name(), "alice@contoso.com");
        assert_eq!(principal.identity_provider.as_deref(), Some("aad"));
        assert_eq!(principal.tenant_id.as_deref(), Some("tenant-a"));
    }

    #[test]
    fn test_tenant_from_claims_blob() {
        let blob = encode_claims(&[
            ("name", "Alice"),
            ("http://schemas.microsoft.com/identity/claims/tenantid", "tenant-b"),
        ]);
        let map = headers(&[
            (HEADER_PRINCIPAL_ID, "user-1"),
            (HEADER_PRINCIPAL, &blob),
            (HEADER_PRINCIPAL_TENANT_ID, "tenant-a"),
        ]);
        let principal = ClientPrincipal::from_headers(&map).unwrap();
        assert_eq!(principal.tenant_id.as_deref(), Some("tenant-b"));
    }

    #[test]
    fn test_short_tid_claim() {
        let blob = encode_claims(&[("tid", "tenant-c")]);
        assert_eq!(tenant_from_claims(&blob).as_deref(), Some("tenant-c"));
    }

    #[test]
    fn test_malformed_blob_falls_back_to_header() {
        let map = headers(&[
            (HEADER_PRINCIPAL_ID, "user-1"),
            (HEADER_PRINCIPAL, "%%% not base64 %%%"),
            (HEADER_PRINCIPAL_TENANT_ID, "tenant-a"),
        ]);
        let principal = ClientPrincipal::from_headers(&map).unwrap();
        assert_eq!(principal.tenant_id.as_deref(), Some("tenant-a"));
    }

    #[test]
    fn test_blob_without_tenant_claim() {
        let blob = encode_claims(&[("name", "Alice")]);
        assert!(tenant_from_claims(&blob).is_none());
    }

    #[test]
    fn test_membership_ignores_case() {
        let principal = ClientPrincipal {
            id: "user-1".to_string(),
            name: None,
            identity_provider: None,
            tenant_id: Some("ABCDEF01-0000-0000-0000-000000000000".to_string()),
        };
        assert!(principal.is_member_of("abcdef01-0000-0000-0000-000000000000"));
        assert!(!principal.is_member_of("other"));
        assert_eq!(principal.display_name(), "user-1");
    }
}
