pub const REDACTED: &str = "[REDACTED]";

/// Replaces every occurrence of each non-empty secret in `text` with
/// `[REDACTED]`, however short it is. Longer secrets are replaced first so a
/// secret containing another one is masked whole.
pub fn redact_secrets(text: &str, secrets: &[&str]) -> String {
    let mut ordered: Vec<&str> = secrets
        .iter()
        .copied()
        .filter(|s| !s.is_empty())
        .collect();
    ordered.sort_by_key(|s| std::cmp::Reverse(s.len()));

    let mut out = text.to_string();
    for secret in ordered {
        if out.contains(secret) {
            out = out.replace(secret, REDACTED);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_every_occurrence() {
        let out = redact_secrets("token s3cr3t and again s3cr3t", &["s3cr3t"]);
        assert_eq!(out, "token [REDACTED] and again [REDACTED]");
    }

    #[test]
    fn masks_longer_secrets_first() {
        let url = "https://dest.example/hook/s3cr3t";
        let out = redact_secrets("failed calling https://dest.example/hook/s3cr3t", &["s3cr3t", url]);
        assert_eq!(out, "failed calling [REDACTED]");
    }

    #[test]
    fn ignores_empty_secrets() {
        assert_eq!(redact_secrets("abc", &[""]), "abc");
    }

    #[test]
    fn masks_short_secrets_too() {
        assert_eq!(
            redact_secrets("invalid token k9Z", &["k9Z"]),
            "invalid token [REDACTED]"
        );
    }
}
