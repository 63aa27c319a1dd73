//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_DEV_FILTER: &str = "reconcile_core=debug,reconcile_engine=debug,reconcile_cli=debug";
const DEFAULT_PROD_FILTER: &str = "reconcile_core=info,reconcile_engine=info,reconcile_cli=info";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output on stderr
    Development,
    /// JSON structured output on stderr
    Production,
    /// Subscriber without output; tests install capture separately
    Test,
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!(
                "unknown log profile '{}' (expected development, production or test)",
                other
            )),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call has an effect. `RUST_LOG` overrides the profile's
/// default filter.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Registry without layers
///
/// # Example
///
/// ```
/// use reconcile_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DEV_FILTER)),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_PROD_FILTER)),
                )
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
