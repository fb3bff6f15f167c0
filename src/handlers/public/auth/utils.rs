use std::collections::HashMap;

use crate::auth::PasswordHasher;
use crate::error::ApiError;

/// Hash a password on the blocking pool; argon2 is CPU-bound.
pub async fn hash_password(hasher: &PasswordHasher, plaintext: String) -> Result<String, ApiError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?
        .map_err(ApiError::from)
}

/// Verify a password off the async runtime. Task failures count as a mismatch.
pub async fn verify_password(hasher: &PasswordHasher, plaintext: String, digest: String) -> bool {
    let hasher = hasher.clone();
    match tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest)).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!("Password verification task failed: {}", e);
            false
        }
    }
}

/// Validate signup fields, collecting every problem at once.
pub fn validate_signup_fields(email: &str, username: &str, password: &str) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if let Err(msg) = validate_email_format(email) {
        field_errors.insert("email".to_string(), msg.to_string());
    }
    if username.trim().is_empty() {
        field_errors.insert("username".to_string(), "Username cannot be empty".to_string());
    }
    if password.is_empty() {
        field_errors.insert("password".to_string(), "Password cannot be empty".to_string());
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity("Invalid signup request", field_errors))
    }
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain.
pub fn validate_email_format(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err("Email cannot be empty");
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Email cannot contain whitespace");
    }

    let (local, domain) = email.split_once('@').ok_or("Email must contain '@'")?;
    if local.is_empty() || domain.contains('@') {
        return Err("Email is not a valid address");
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Email domain is not valid");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email_format("a@x.com").is_ok());
        assert!(validate_email_format("delegate.france@mun.example.org").is_ok());

        assert!(validate_email_format("").is_err());
        assert!(validate_email_format("no-at-sign").is_err());
        assert!(validate_email_format("@x.com").is_err());
        assert!(validate_email_format("a@b@x.com").is_err());
        assert!(validate_email_format("a@localhost").is_err());
        assert!(validate_email_format("a @x.com").is_err());
    }

    #[test]
    fn test_signup_fields_collects_all_errors() {
        match validate_signup_fields("bad", " ", "") {
            Err(ApiError::UnprocessableEntity { field_errors, .. }) => {
                assert_eq!(field_errors.len(), 3);
                assert!(field_errors.contains_key("email"));
                assert!(field_errors.contains_key("username"));
                assert!(field_errors.contains_key("password"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(validate_signup_fields("a@x.com", "alice", "pw").is_ok());
    }

    #[tokio::test]
    async fn test_hash_and_verify_off_runtime() {
        let hasher = PasswordHasher::new();
        let digest = hash_password(&hasher, "s3cret".to_string()).await.unwrap();

        assert!(verify_password(&hasher, "s3cret".to_string(), digest.clone()).await);
        assert!(!verify_password(&hasher, "wrong".to_string(), digest).await);
    }
}
