use std::{env, time::Duration};

use checkout_engine::{pricing::PricingRules, CheckoutPolicy};
use log::*;
use shop_common::{helpers::parse_boolean_flag, Cents, Secret};

use crate::errors::ServerError;

const DEFAULT_MTS_HOST: &str = "127.0.0.1";
const DEFAULT_MTS_PORT: u16 = 8470;
const DEFAULT_CHECKOUT_DEADLINE: Duration = Duration::from_secs(5);
const DEFAULT_CURRENCY: &str = "LKR";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Where the gateway redirects the customer's browser after a payment attempt. These are
    /// cosmetic; order state only ever changes via the server-to-server notification.
    pub return_url: String,
    pub cancel_url: String,
    /// The publicly reachable URL the gateway posts payment notifications to.
    pub notify_url: String,
    pub payhere: PayHereConfig,
    pub pricing: PricingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MTS_HOST.to_string(),
            port: DEFAULT_MTS_PORT,
            database_url: String::default(),
            return_url: String::default(),
            cancel_url: String::default(),
            notify_url: String::default(),
            payhere: PayHereConfig::default(),
            pricing: PricingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    /// Loads the server configuration. Most settings have sensible defaults, but the gateway
    /// credentials do not: without them no signature can be computed or verified, so a missing
    /// credential is a hard startup error rather than a latent one.
    pub fn try_from_env() -> Result<Self, ServerError> {
        let host = env::var("MTS_HOST").ok().unwrap_or_else(|| DEFAULT_MTS_HOST.into());
        let port = env::var("MTS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MTS_PORT. {e} Using the default, {DEFAULT_MTS_PORT}, instead."
                    );
                    DEFAULT_MTS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MTS_PORT);
        let database_url = env::var("MTS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ MTS_DATABASE_URL is not set. Please set it to the URL for the store database.");
            String::default()
        });
        let return_url = env::var("MTS_RETURN_URL").ok().unwrap_or_default();
        let cancel_url = env::var("MTS_CANCEL_URL").ok().unwrap_or_default();
        let notify_url = env::var("MTS_NOTIFY_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ MTS_NOTIFY_URL is not set. The gateway will not be able to deliver payment notifications.");
            String::default()
        });
        let payhere = PayHereConfig::try_from_env()?;
        let pricing = PricingConfig::from_env_or_defaults();
        Ok(Self { host, port, database_url, return_url, cancel_url, notify_url, payhere, pricing })
    }
}

//-------------------------------------------------  PayHereConfig  ---------------------------------------------------
/// Credentials for the PayHere gateway. The merchant secret never appears in any payload or log
/// line; it only ever enters the MD5 signature digests.
#[derive(Clone, Debug, Default)]
pub struct PayHereConfig {
    pub merchant_id: String,
    pub merchant_secret: Secret<String>,
}

impl PayHereConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let merchant_id = env::var("PAYHERE_MERCHANT_ID")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [PAYHERE_MERCHANT_ID]")))?;
        let merchant_secret = env::var("PAYHERE_MERCHANT_SECRET")
            .map(Secret::new)
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [PAYHERE_MERCHANT_SECRET]")))?;
        Ok(Self { merchant_id, merchant_secret })
    }
}

//-------------------------------------------------  PricingConfig  ---------------------------------------------------
/// Store pricing knobs, combined into the engine's [`CheckoutPolicy`].
#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub tax_percent: i64,
    pub shipping_fee: Cents,
    pub free_shipping_threshold: Cents,
    pub tolerance: Cents,
    pub currency: String,
    pub clear_cart_on_checkout: bool,
    pub checkout_deadline: Duration,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let rules = PricingRules::default();
        Self {
            tax_percent: rules.tax_percent,
            shipping_fee: rules.shipping_fee,
            free_shipping_threshold: rules.free_shipping_threshold,
            tolerance: rules.tolerance,
            currency: DEFAULT_CURRENCY.to_string(),
            clear_cart_on_checkout: true,
            checkout_deadline: DEFAULT_CHECKOUT_DEADLINE,
        }
    }
}

impl PricingConfig {
    pub fn from_env_or_defaults() -> Self {
        let defaults = Self::default();
        let tax_percent = read_i64("MTS_TAX_PERCENT", defaults.tax_percent);
        let shipping_fee = Cents::from(read_i64("MTS_SHIPPING_FEE_CENTS", defaults.shipping_fee.value()));
        let free_shipping_threshold =
            Cents::from(read_i64("MTS_FREE_SHIPPING_THRESHOLD_CENTS", defaults.free_shipping_threshold.value()));
        let tolerance = Cents::from(read_i64("MTS_PRICE_TOLERANCE_CENTS", defaults.tolerance.value()));
        let currency = env::var("MTS_CURRENCY").ok().unwrap_or(defaults.currency);
        let clear_cart_on_checkout = parse_boolean_flag(env::var("MTS_CLEAR_CART_ON_CHECKOUT").ok(), true);
        let checkout_deadline = Duration::from_millis(
            read_i64("MTS_CHECKOUT_DEADLINE_MS", DEFAULT_CHECKOUT_DEADLINE.as_millis() as i64).unsigned_abs(),
        );
        Self {
            tax_percent,
            shipping_fee,
            free_shipping_threshold,
            tolerance,
            currency,
            clear_cart_on_checkout,
            checkout_deadline,
        }
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            rules: PricingRules {
                tax_percent: self.tax_percent,
                shipping_fee: self.shipping_fee,
                free_shipping_threshold: self.free_shipping_threshold,
                tolerance: self.tolerance,
            },
            currency: self.currency.clone(),
            clear_cart: self.clear_cart_on_checkout,
            deadline: self.checkout_deadline,
        }
    }
}

fn read_i64(var: &str, default: i64) -> i64 {
    env::var(var)
        .map_err(|_| ())
        .and_then(|s| {
            s.parse::<i64>().map_err(|e| warn!("🪛️ Invalid configuration value for {var}: {s}. {e}"))
        })
        .unwrap_or(default)
}
