use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Money;
use crate::error::{ClubError, Result};

/// What a member has put toward one payment event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentEntry {
    Exempt,
    Amount(Money),
}

/// Resolved payment state of one member for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Exempt,
    Paid,
    Partial(Money),
    Unpaid,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Exempt => write!(f, "EXEMPT"),
            PaymentStatus::Paid => write!(f, "PAID"),
            PaymentStatus::Partial(amount) => write!(f, "{}", amount),
            PaymentStatus::Unpaid => write!(f, "0"),
        }
    }
}

/// A named dues collection with a fixed total owed per member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub name: String,
    pub total: Money,
    #[serde(default)]
    pub payers: BTreeMap<String, PaymentEntry>,
}

impl PaymentEvent {
    pub fn new(name: impl Into<String>, total: Money) -> Self {
        Self {
            name: name.into(),
            total,
            payers: BTreeMap::new(),
        }
    }

    /// Add a partial payment and return the member's new running total.
    ///
    /// Fails without touching the ledger if the member is exempt.
    pub fn pay_partial(&mut self, member_name: &str, amount: Money) -> Result<Money> {
        let updated = match self.payers.get(member_name) {
            None => amount,
            Some(PaymentEntry::Amount(existing)) => existing
                .checked_add(amount)
                .ok_or_else(|| ClubError::InvalidAmount(amount.to_string()))?,
            Some(PaymentEntry::Exempt) => {
                return Err(ClubError::InvalidAmount(format!(
                    "{} is exempt from {}",
                    member_name, self.name
                )));
            }
        };
        self.payers
            .insert(member_name.to_string(), PaymentEntry::Amount(updated));
        Ok(updated)
    }

    /// Mark a member as paid in full, replacing any earlier entry.
    pub fn pay_full(&mut self, member_name: &str) {
        self.payers
            .insert(member_name.to_string(), PaymentEntry::Amount(self.total));
    }

    pub fn exempt(&mut self, member_name: &str) {
        self.payers
            .insert(member_name.to_string(), PaymentEntry::Exempt);
    }

    pub fn status_of(&self, member_name: &str) -> PaymentStatus {
        match self.payers.get(member_name) {
            None => PaymentStatus::Unpaid,
            Some(PaymentEntry::Exempt) => PaymentStatus::Exempt,
            Some(PaymentEntry::Amount(paid)) if *paid >= self.total => PaymentStatus::Paid,
            Some(PaymentEntry::Amount(paid)) => PaymentStatus::Partial(*paid),
        }
    }

    /// Sum of everything paid so far.
    pub fn collected(&self) -> Money {
        self.payers
            .values()
            .filter_map(|entry| match entry {
                PaymentEntry::Amount(m) => Some(*m),
                PaymentEntry::Exempt => None,
            })
            .sum()
    }

    /// Members whose entry covers the total.
    pub fn paid_count(&self) -> usize {
        self.payers
            .keys()
            .filter(|name| self.status_of(name) == PaymentStatus::Paid)
            .count()
    }
}
