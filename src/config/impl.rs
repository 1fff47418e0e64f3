use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 常用环境变量 → 配置键，优先级最高
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("OBJECT_STORE_ROOT", "object_store.root"),
];

impl AppConfig {
    /// 加载配置：config.toml → config.{APP_ENV}.toml → CLASSROOM_* → ENV_OVERRIDES
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{app_env}")).required(false))
            // 嵌套键使用双下划线，如 CLASSROOM_OBJECT_STORE__MAX_SIZE
            .add_source(
                Environment::with_prefix("CLASSROOM")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        Self::from_config(builder.build()?)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.normalize();
        app_config.validate()?;
        Ok(app_config)
    }

    fn normalize(&mut self) {
        // 0 表示按 CPU 核数，受 max_workers 限制
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers).max(1);
        }
        for ext in &mut self.object_store.allowed_types {
            *ext = ext.trim().to_ascii_lowercase();
            if !ext.starts_with('.') {
                ext.insert(0, '.');
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Message(msg.to_string()));

        if self.jwt.secret.is_empty() {
            return invalid("jwt.secret must be set (config file or JWT_SECRET)");
        }
        if self.object_store.max_size == 0 {
            return invalid("object_store.max_size must be greater than 0");
        }
        if self.object_store.allowed_types.is_empty() {
            return invalid("object_store.allowed_types must not be empty");
        }
        if self.rate_limit.auth_max_requests == 0 || self.rate_limit.auth_window_secs == 0 {
            return invalid("rate_limit values must be greater than 0");
        }
        Ok(())
    }

    /// 获取全局配置实例，未初始化时按默认来源加载
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用，重复初始化返回错误
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 空字符串表示不使用 Unix 套接字
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const SAMPLE: &str = include_str!("../../config.toml");

    fn parse(overrides: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let mut builder = Config::builder().add_source(File::from_str(SAMPLE, FileFormat::Toml));
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        AppConfig::from_config(builder.build()?)
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = parse(&[]).unwrap();
        assert!(config.server.workers >= 1);
        assert!(config.server.workers <= config.server.max_workers);
        assert!(config.object_store.allowed_types.contains(&".pdf".to_string()));
        assert!(config.is_development());
        assert!(!config.rate_limit.trust_proxy_headers);
    }

    #[test]
    fn test_allowed_types_normalized() {
        let mut config = parse(&[]).unwrap();
        config.object_store.allowed_types = vec![" PDF".to_string(), ".Png".to_string()];
        config.normalize();
        assert_eq!(config.object_store.allowed_types, vec![".pdf", ".png"]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse(&[("jwt.secret", "")]).is_err());
        assert!(parse(&[("object_store.max_size", "0")]).is_err());
        assert!(parse(&[("rate_limit.auth_window_secs", "0")]).is_err());
    }
}
