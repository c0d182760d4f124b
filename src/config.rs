#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: "127.0.0.1".to_string(),
            port: 6379,
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_args(args: &[String]) -> Self {
        let mut config = Config::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--port" => {
                    if i + 1 < args.len() {
                        if let Ok(p) = args[i + 1].parse() {
                            config.port = p;
                        }
                        i += 1;
                    }
                }
                "--bind" => {
                    if i + 1 < args.len() {
                        config.bind = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--loglevel" => {
                    if i + 1 < args.len() {
                        config.loglevel = args[i + 1].clone();
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        config
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Default tracing level, falling back to INFO for unrecognized names.
    pub fn log_level(&self) -> tracing::Level {
        self.loglevel.parse().unwrap_or(tracing::Level::INFO)
    }
}
