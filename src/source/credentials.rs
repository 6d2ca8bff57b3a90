use std::{fs, path::Path};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("failed to read credentials file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("credentials file is missing line {line} ({field})")]
    MissingField { line: usize, field: &'static str },
}

impl ApiCredentials {
    pub fn load(path: &Path) -> Result<Self, CredentialsError> {
        let text = fs::read_to_string(path).map_err(|source| CredentialsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses three `key=value` lines in the order id, secret, agent. Only the
    /// value after the first `=` matters; key names are not checked.
    pub fn parse(text: &str) -> Result<Self, CredentialsError> {
        let mut lines = text.lines();
        let mut next_value = |line: usize, field: &'static str| {
            lines
                .next()
                .and_then(|raw| raw.split_once('='))
                .map(|(_, value)| value.trim_end().to_string())
                .ok_or(CredentialsError::MissingField { line, field })
        };
        Ok(Self {
            client_id: next_value(1, "client_id")?,
            client_secret: next_value(2, "client_secret")?,
            user_agent: next_value(3, "user_agent")?,
        })
    }
}
