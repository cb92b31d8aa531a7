use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents where the dashboard sends its statistics requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// The public provider endpoints.
    #[default]
    Production,
    /// Every provider served from one local base URL, e.g. a mock server.
    Local { base_url: String },
}

impl Environment {
    /// Reads the environment from `TRADE_PULSE_ENVIRONMENT` and `TRADE_PULSE_LOCAL_URL`.
    pub fn from_env() -> Self {
        let name = std::env::var("TRADE_PULSE_ENVIRONMENT").unwrap_or_default();
        match name.parse::<Environment>() {
            Ok(Environment::Local { .. }) => Environment::Local {
                base_url: std::env::var("TRADE_PULSE_LOCAL_URL")
                    .unwrap_or_else(|_| "http://localhost:8787".to_string()),
            },
            Ok(env) => env,
            Err(()) => Environment::default(),
        }
    }

    /// Resolves the URL for a source. `public_url` is used as-is in production;
    /// locally the source name becomes a path under the base URL.
    pub fn source_url(&self, source_name: &str, public_url: &str) -> String {
        match self {
            Environment::Production => public_url.to_string(),
            Environment::Local { base_url } => format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                source_name.trim_start_matches('/')
            ),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "local" => Ok(Environment::Local {
                base_url: "http://localhost:8787".to_string(),
            }),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "Production"),
            Environment::Local { .. } => write!(f, "Local"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "Environment::{}", self),
            Environment::Local { base_url } => {
                write!(f, "Environment::{}, URL: {}", self, base_url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_environment_names() {
        assert_eq!(
            "Production".parse::<Environment>(),
            Ok(Environment::Production)
        );
        assert!(matches!(
            "local".parse::<Environment>(),
            Ok(Environment::Local { .. })
        ));
        assert_eq!("staging".parse::<Environment>(), Err(()));
    }

    #[test]
    // Local environments route every source to a path under the base URL.
    fn test_local_source_url() {
        let env = Environment::Local {
            base_url: "http://127.0.0.1:9000/".to_string(),
        };
        assert_eq!(
            env.source_url("trade", "https://api.worldbank.org/v2/x"),
            "http://127.0.0.1:9000/trade"
        );
        assert_eq!(
            Environment::Production.source_url("trade", "https://api.worldbank.org/v2/x"),
            "https://api.worldbank.org/v2/x"
        );
    }
}
