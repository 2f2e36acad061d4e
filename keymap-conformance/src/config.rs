use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

pub const CONFIG_FILE: &str = "keymap.toml";
pub const ENV_PREFIX: &str = "KEYMAP_";

/// A [`Map`](keymap::Map) backing the runner can put under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backing {
    Hash,
    Tree,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Seeds the op generator; equal seeds replay equal sessions.
    pub seed: u64,
    /// Sessions per backing.
    pub cases: u32,
    pub max_ops: usize,
    /// Number of distinct keys ops draw from.
    pub key_space: u8,
    pub backings: Vec<Backing>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            cases: 256,
            max_ops: 64,
            key_space: 8,
            backings: vec![Backing::Hash, Backing::Tree],
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `keymap.toml` if present, then `KEYMAP_*` variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), figment::Error> {
        if self.key_space == 0 {
            Err("config error: key_space must be at least 1".to_string())?;
        }
        if self.backings.is_empty() {
            Err("config error: backings must name at least one of hash, tree".to_string())?;
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            Err(format!(
                "config error: unexpected value for log_level: expected one of trace, debug, info, warn, error got {}",
                self.log_level
            ))?;
        }

        Ok(())
    }

    pub fn level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

pub fn load_config() -> Result<Config, figment::Error> {
    Config::from_figment(&Config::figment())
}

#[cfg(test)]
mod test {
    use super::*;

    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_| {
            assert_eq!(Config::default(), load_config()?);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                seed = 7
                cases = 10
                backings = ["tree"]
                "#,
            )?;
            jail.set_env("KEYMAP_SEED", 42);
            jail.set_env("KEYMAP_LOG_LEVEL", "debug");

            let cfg = load_config()?;
            assert_eq!(42, cfg.seed);
            assert_eq!(10, cfg.cases);
            assert_eq!(vec![Backing::Tree], cfg.backings);
            assert_eq!(Config::default().max_ops, cfg.max_ops);
            assert_eq!(tracing::Level::DEBUG, cfg.level());
            Ok(())
        });
    }

    #[test]
    fn rejects_empty_key_space() {
        Jail::expect_with(|jail| {
            jail.set_env("KEYMAP_KEY_SPACE", 0);

            let err = load_config().unwrap_err();
            assert!(err.to_string().contains("key_space"), "{}", err);
            Ok(())
        });
    }

    #[test]
    fn rejects_unknown_backing_and_level() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, r#"backings = ["list"]"#)?;
            assert!(load_config().is_err());

            jail.create_file(CONFIG_FILE, r#"log_level = "loud""#)?;
            let err = load_config().unwrap_err();
            assert!(err.to_string().contains("log_level"), "{}", err);
            Ok(())
        });
    }
}
