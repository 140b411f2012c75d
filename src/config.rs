use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.dynect.net/REST";

#[derive(Clone)]
pub struct Config {
    pub customer: String,
    pub username: String,
    pub password: String,
    pub zone: String,
    pub fqdn: String,
    pub api_url: String,
    pub retry_interval: Duration,
    pub force: bool,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            customer: env::var("DYNECT_CUSTOMER")?,
            username: env::var("DYNECT_USERNAME")?,
            password: env::var("DYNECT_PASSWORD")?,
            zone: env::var("DYNECT_ZONE")?,
            fqdn: env::var("DYNECT_FQDN")?,
            api_url: env::var("DYNECT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            retry_interval: Duration::from_secs(
                env::var("RETRY_INTERVAL")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .unwrap_or(1),
            ),
            force: false,
            debug: false,
        })
    }

    /// Folds command line flags into the config. Unknown arguments are ignored.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        for arg in args {
            match arg.as_str() {
                "--force" => self.force = true,
                "--debug" => self.debug = true,
                _ => {}
            }
        }
        self
    }
}

pub(crate) mod mock {
    use super::*;

    impl Default for Config {
        fn default() -> Self {
            Config {
                customer: String::from("acme"),
                username: String::from("api-user"),
                password: String::from("hunter2"),
                zone: String::from("example.com"),
                fqdn: String::from("host.example.com"),
                api_url: String::from(DEFAULT_API_URL),
                retry_interval: Duration::from_secs(1),
                force: false,
                debug: false,
            }
        }
    }
}
