use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "passbook.toml";
/// Prefix for environment overrides, e.g. `PASSBOOK_DATABASE_PATH`.
pub const ENV_PREFIX: &str = "PASSBOOK_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite file backing the account store.
    pub database_path: PathBuf,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("passbook.db"),
            loglevel: "warn".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `passbook.toml`, then `PASSBOOK_*` variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load()?;
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.database_path, PathBuf::from("passbook.db"));
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                database_path = "from-file.db"
                loglevel = "info"
                "#,
            )?;
            let cfg = Config::load()?;
            assert_eq!(cfg.database_path, PathBuf::from("from-file.db"));
            assert_eq!(cfg.loglevel, "info");

            jail.set_env("PASSBOOK_DATABASE_PATH", "from-env.db");
            let cfg = Config::load()?;
            assert_eq!(cfg.database_path, PathBuf::from("from-env.db"));
            assert_eq!(cfg.loglevel, "info");
            Ok(())
        });
    }
}
