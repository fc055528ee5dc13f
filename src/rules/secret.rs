//! Secret rules.

use tracing::warn;

use crate::document::Document;
use crate::options::CleanOptions;

use super::generic;

pub const SERVICE_ACCOUNT_TOKEN_TYPE: &str = "kubernetes.io/service-account-token";

/// Secrets only get generic cleaning. Service account token secrets are
/// reported but never removed.
pub fn clean_secret(doc: &mut Document, opts: &CleanOptions) {
    if is_service_account_token(doc) {
        warn!(
            secret = %doc,
            "keeping service account token secret; the target cluster generates its own"
        );
    }
    generic::clean_generic(doc, opts);
}

pub fn is_service_account_token(doc: &Document) -> bool {
    doc.secret_type() == Some(SERVICE_ACCOUNT_TOKEN_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_yaml;

    fn secret(yaml: &str) -> Document {
        Document::from_value(from_yaml(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_service_account_token_detection() {
        let token = secret(
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: default-token-x\n\
             type: kubernetes.io/service-account-token",
        );
        assert!(is_service_account_token(&token));

        let opaque = secret("apiVersion: v1\nkind: Secret\nmetadata:\n  name: creds\ntype: Opaque");
        assert!(!is_service_account_token(&opaque));

        let untyped = secret("apiVersion: v1\nkind: Secret\nmetadata:\n  name: creds");
        assert!(!is_service_account_token(&untyped));
    }

    #[test]
    fn test_token_secret_cleaned_not_dropped() {
        let mut token = secret(
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: t\n  uid: u\n\
             type: kubernetes.io/service-account-token\ndata:\n  token: YQ==",
        );
        clean_secret(&mut token, &CleanOptions::default());
        assert!(is_service_account_token(&token));
        assert!(token.metadata().is_some_and(|m| !m.has("uid")));
        assert!(token.root().has("data"));
    }
}
