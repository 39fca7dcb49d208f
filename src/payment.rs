// Mock payment flow used at checkout
// No money moves; the gateway only simulates processing time and hands back a receipt

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Payment declined: {0}")]
    Declined(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_number: String,
    pub card_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl PaymentDetails {
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

// Never print the full card number or the CVV
impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = format!("**** {}", self.last_four());
        f.debug_struct("PaymentDetails")
            .field("card_number", &masked)
            .field("card_name", &self.card_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub reference: String,
    pub amount: f64,
    pub last_four: String,
    pub paid_at: DateTime<Utc>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn charge(
        &self,
        amount: f64,
        details: &PaymentDetails,
    ) -> Result<PaymentReceipt, PaymentError>;
}

pub struct MockPaymentGateway {
    latency: Duration,
}

impl MockPaymentGateway {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(
        &self,
        amount: f64,
        details: &PaymentDetails,
    ) -> Result<PaymentReceipt, PaymentError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(PaymentReceipt {
            reference: format!("PAY{:08}", rand::random::<u32>() % 100_000_000),
            amount,
            last_four: details.last_four(),
            paid_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> PaymentDetails {
        PaymentDetails {
            card_number: "4242 4242 4242 4242".to_string(),
            card_name: "Ram Thapa".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_gateway_always_succeeds() {
        let gateway = MockPaymentGateway::new(Duration::ZERO);

        let receipt = gateway.charge(4000.0, &details()).await.unwrap();
        assert_eq!(receipt.amount, 4000.0);
        assert_eq!(receipt.last_four, "4242");
        assert!(receipt.reference.starts_with("PAY"));
        assert_eq!(receipt.reference.len(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_gateway_waits_for_latency() {
        let gateway = MockPaymentGateway::default();
        let card = details();

        let started = tokio::time::Instant::now();
        gateway.charge(10.0, &card).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }

    #[test]
    fn test_debug_masks_card() {
        let rendered = format!("{:?}", details());
        assert!(rendered.contains("**** 4242"));
        assert!(!rendered.contains("4242 4242 4242 4242"));
        assert!(!rendered.contains("123"));
    }

    #[test]
    fn test_last_four_of_short_number() {
        let mut short = details();
        short.card_number = "12".to_string();
        assert_eq!(short.last_four(), "12");
    }
}
