use tracing::warn;

/// Check a supplied admin password against the configured one.
///
/// A configured value that looks like a bcrypt hash (`$2a$`, `$2b$`, ...)
/// is verified as such; anything else is compared as plain text.
pub fn verify_admin_password(configured: &str, supplied: &str) -> bool {
    if configured.starts_with("$2") {
        return match bcrypt::verify(supplied, configured) {
            Ok(ok) => ok,
            Err(e) => {
                warn!("Configured admin password hash is invalid: {}", e);
                false
            }
        };
    }
    configured == supplied
}
