use clap::Args;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://preceptor-eval.db?mode=rwc";
pub const DEFAULT_STORAGE_KEY: &str = "preceptor_eval_data";
pub const DEFAULT_DRIVE_FILE: &str = "preceptor_evaluations.json";

/// Runtime settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// SQLite database holding the evaluation document
    #[arg(long, global = true, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Key of the slot the document is stored under
    #[arg(long, global = true, env = "PRECEPTOR_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// OAuth bearer token for Google Drive sync
    #[arg(long, global = true, env = "GOOGLE_DRIVE_TOKEN", hide_env_values = true)]
    pub drive_token: Option<String>,

    /// File name used on Google Drive
    #[arg(long, global = true, env = "GOOGLE_DRIVE_FILE", default_value = DEFAULT_DRIVE_FILE)]
    pub drive_file: String,
}

impl Config {
    pub fn drive_token(&self) -> anyhow::Result<&str> {
        self.drive_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("a Google Drive token is required (--drive-token or GOOGLE_DRIVE_TOKEN)")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn explicit_flags_win() {
        let harness = Harness::try_parse_from([
            "preceptor-eval",
            "--database-url",
            "sqlite::memory:",
            "--storage-key",
            "rotation_2026",
            "--drive-file",
            "backup.json",
        ])
        .unwrap();

        assert_eq!(harness.config.database_url, "sqlite::memory:");
        assert_eq!(harness.config.storage_key, "rotation_2026");
        assert_eq!(harness.config.drive_file, "backup.json");
    }

    #[test]
    fn blank_drive_token_is_rejected() {
        let config = Config {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            drive_token: Some(String::new()),
            drive_file: DEFAULT_DRIVE_FILE.to_string(),
        };
        assert!(config.drive_token().is_err());

        let config = Config {
            drive_token: Some(" \t ".to_string()),
            ..config
        };
        assert!(config.drive_token().is_err());

        let config = Config {
            drive_token: Some("ya29.token".to_string()),
            ..config
        };
        assert_eq!(config.drive_token().unwrap(), "ya29.token");
    }
}
