//! SMS alert: a compact order summary and the Twilio delivery boundary.

use chrono::NaiveDate;
use std::fmt::Write;
use std::time::Duration;
use tracing::{error, info, warn};

use momentum_core::domain::{OrderBook, Regime};

use crate::report::{multiplier, qty, whole_money};

/// Delivery of a finished message body. Implementations report success and
/// never retry.
pub trait SmsSender {
    fn send(&self, body: &str) -> bool;
}

/// Build the SMS body for one run.
pub fn format_sms(orders: &OrderBook, regime: &Regime, date: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "◈ {} {} ({})\n",
        date.format("%m/%d"),
        regime.regime,
        multiplier(regime.regime_multiplier)
    );

    if !orders.sell_orders.is_empty() {
        out.push_str("EXIT:\n");
        for o in &orders.sell_orders {
            let _ = writeln!(out, "SELL {} {}sh @${:.2}", o.ticker, qty(o.shares), o.price);
            let _ = writeln!(out, "→ {}", first_sentence(&o.reason));
        }
        out.push('\n');
    }

    if !orders.manage_orders.is_empty() {
        out.push_str("ADJUST:\n");
        for o in &orders.manage_orders {
            let _ = writeln!(out, "{} {}", o.ticker, o.action);
            if o.stop_loss != 0.0 {
                let _ = writeln!(out, "Stop→${:.2}", o.stop_loss);
            }
        }
        out.push('\n');
    }

    if !orders.buy_orders.is_empty() {
        let _ = writeln!(out, "BUY ({:.0}% of acct):", orders.buy_pct());
        for o in &orders.buy_orders {
            let _ = writeln!(
                out,
                "{} {:.0}% ${} ({}sh)",
                o.ticker,
                o.portfolio_pct,
                whole_money(o.dollar_amount),
                qty(o.shares)
            );
            let _ = writeln!(
                out,
                "  SL:${:.2} T:${:.2} {}",
                o.stop_loss, o.target, o.risk_reward
            );
        }
    } else if orders.sell_orders.is_empty() && orders.manage_orders.is_empty() {
        out.push_str("No trades today. Stay patient.");
    }

    out.trim().to_string()
}

/// Reasons read "STOP HIT: $95.00 ≤ $96.00. P&L: -5.0%"; only the part before
/// the first sentence break goes out by text.
fn first_sentence(reason: &str) -> &str {
    reason.split_once(". ").map_or(reason, |(head, _)| head)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

impl TwilioCredentials {
    /// `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_FROM_NUMBER` and
    /// `ALERT_PHONE_NUMBER`; `None` unless all four are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            account_sid: var("TWILIO_ACCOUNT_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            from: var("TWILIO_FROM_NUMBER")?,
            to: var("ALERT_PHONE_NUMBER")?,
        })
    }
}

pub struct TwilioSender {
    credentials: Option<TwilioCredentials>,
    base_url: String,
}

impl TwilioSender {
    pub fn new(credentials: Option<TwilioCredentials>) -> Self {
        Self {
            credentials,
            base_url: "https://api.twilio.com".to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(TwilioCredentials::from_env())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{account_sid}/Messages.json",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl SmsSender for TwilioSender {
    fn send(&self, body: &str) -> bool {
        let Some(creds) = &self.credentials else {
            warn!("Twilio not configured; set TWILIO_* and ALERT_PHONE_NUMBER in the environment or .env");
            return false;
        };

        let client = match reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "SMS failed: could not build HTTP client");
                return false;
            }
        };

        let result = client
            .post(self.messages_url(&creds.account_sid))
            .basic_auth(&creds.account_sid, Some(&creds.auth_token))
            .form(&[
                ("To", creds.to.as_str()),
                ("From", creds.from.as_str()),
                ("Body", body),
            ])
            .send();

        match result {
            Ok(resp) if resp.status().is_success() => {
                info!(status = resp.status().as_u16(), "SMS sent");
                true
            }
            Ok(resp) => {
                error!(status = resp.status().as_u16(), "SMS failed");
                false
            }
            Err(e) => {
                error!(error = %e, "SMS failed");
                false
            }
        }
    }
}
