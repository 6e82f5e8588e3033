use anyhow::{bail, Result};

const MIN_SECRET_BYTES: usize = 32;

/// Startup configuration read from the environment. Missing values abort
/// startup rather than degrading silently.
pub(crate) struct Config {
    pub openai_api_key: String,
    pub session_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;

        let session_secret = std::env::var("MEDICHAT_SESSION_SECRET").map_err(|_| {
            anyhow::anyhow!(
                "MEDICHAT_SESSION_SECRET not set; set an explicit secret instead of \
                 relying on an ephemeral one"
            )
        })?;
        Self::validate_secret(&session_secret)?;

        Ok(Self {
            openai_api_key,
            session_secret,
        })
    }

    fn validate_secret(secret: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_BYTES {
            bail!("MEDICHAT_SESSION_SECRET must be at least {MIN_SECRET_BYTES} bytes");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        assert!(Config::validate_secret("too-short").is_err());
        assert!(Config::validate_secret(&"x".repeat(MIN_SECRET_BYTES)).is_ok());
    }
}
