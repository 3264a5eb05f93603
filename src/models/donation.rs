//! In-person donation records.

use serde::{Deserialize, Serialize};

/// A freshly recorded donation.
///
/// The API only returns the id; the full record shows up later as a
/// [`DonationTransaction`](super::DonationTransaction) on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Donation {
    /// Donation id
    pub id: String,
}

/// Request body for recording an in-person donation (cash, check, ...).
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewDonation {
    /// Amount in cents
    pub amount_cents: i64,
    /// Donor name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Donor email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Hide the donor's identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<bool>,
    /// Whether a tax receipt applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_deductible: Option<bool>,
    /// Whether the donor covered the processing fee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_covered: Option<bool>,
}

impl NewDonation {
    /// Create a donation of `amount_cents` with no donor details.
    pub fn new(amount_cents: i64) -> Self {
        Self {
            amount_cents,
            ..Default::default()
        }
    }

    /// Set the donor's name and email.
    pub fn donor(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.email = Some(email.into());
        self
    }

    /// Mark the donation as anonymous.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = Some(true);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_donation_body() {
        let body = serde_json::to_value(NewDonation::new(2_500).donor("Ada", "ada@example.com"))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"amount_cents": 2500, "name": "Ada", "email": "ada@example.com"})
        );
    }
}
