use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 对外输出 (HTTP 响应、CSV) 的小数位数, 引擎内部不舍入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub scale: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            output: OutputConfig { scale: 6 },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 加载顺序: 默认值 -> rateio.toml (可选) -> RATEIO__* 环境变量
    ///
    /// 例如 `RATEIO__SERVER__PORT=9000`。
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("rateio")
    }

    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("output.scale", defaults.output.scale)?
            .set_default("log.level", defaults.log.level)?
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("RATEIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_from("does-not-exist-rateio").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.output.scale, 6);
    }
}
