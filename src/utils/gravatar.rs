use md5::{Digest, Md5};

/// Derives the Gravatar URL for an email address.
///
/// The address is trimmed and lowercased before hashing, per the Gravatar
/// contract. Size 200px, pg rating, "mystery man" default image.
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Md5::digest(normalized.as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_uses_lowercased_trimmed_md5() {
        // md5("someone@example.com")
        assert_eq!(
            gravatar_url("  Someone@Example.COM "),
            "https://www.gravatar.com/avatar/16d113840f999444259f73bac9ab8b10?s=200&r=pg&d=mm"
        );
    }

    #[test]
    fn same_email_is_stable() {
        assert_eq!(gravatar_url("dev@dev.io"), gravatar_url("dev@dev.io"));
    }
}
