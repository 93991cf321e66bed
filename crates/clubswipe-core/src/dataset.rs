//! The complete set of club records and every mutation the shell can make.
//!
//! Each operation resolves and validates everything it needs before writing,
//! so an `Err` always means the dataset is untouched.

use tracing::{debug, info};

use crate::error::{ClubError, Result};
use crate::models::{AttendanceCategory, Member, Money, PaymentEvent, Rehearsal};
use crate::registry::MemberRegistry;

/// How the user identified a member: a card swipe or a typed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKey<'a> {
    Card(&'a str),
    Name(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    registry: MemberRegistry,
    rehearsals: Vec<Rehearsal>,
    payments: Vec<PaymentEvent>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        registry: MemberRegistry,
        rehearsals: Vec<Rehearsal>,
        payments: Vec<PaymentEvent>,
    ) -> Self {
        Self {
            registry,
            rehearsals,
            payments,
        }
    }

    pub fn registry(&self) -> &MemberRegistry {
        &self.registry
    }

    pub fn rehearsals(&self) -> &[Rehearsal] {
        &self.rehearsals
    }

    pub fn payments(&self) -> &[PaymentEvent] {
        &self.payments
    }

    // ===== Members =====

    pub fn register_member(&mut self, card_id: &str, name: &str, section: &str) -> Result<Member> {
        self.registry.register(card_id, name, section).cloned()
    }

    pub fn resolve(&self, key: MemberKey<'_>) -> Result<&Member> {
        match key {
            MemberKey::Card(card) => self.registry.resolve_by_card(card),
            MemberKey::Name(name) => self.registry.resolve_by_name(name),
        }
    }

    // ===== Rehearsals =====

    /// Create a rehearsal and return its position.
    pub fn create_rehearsal(&mut self, name: &str) -> Result<usize> {
        if self.rehearsal_index(name).is_some() {
            return Err(ClubError::DuplicateName(name.to_string()));
        }
        self.rehearsals.push(Rehearsal::new(name));
        info!(rehearsal = %name, "Created rehearsal");
        Ok(self.rehearsals.len() - 1)
    }

    pub fn rehearsal_index(&self, name: &str) -> Option<usize> {
        self.rehearsals.iter().position(|r| r.name == name)
    }

    pub fn rehearsal(&self, name: &str) -> Result<&Rehearsal> {
        self.rehearsals
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| ClubError::NotFound(name.to_string()))
    }

    fn rehearsal_mut(&mut self, name: &str) -> Result<&mut Rehearsal> {
        self.rehearsals
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| ClubError::NotFound(name.to_string()))
    }

    pub fn mark_attendance(
        &mut self,
        rehearsal: &str,
        key: MemberKey<'_>,
        category: AttendanceCategory,
    ) -> Result<Member> {
        let member = self.resolve(key)?.clone();
        self.rehearsal_mut(rehearsal)?
            .mark_attendance(&member.name, category);
        debug!(rehearsal = %rehearsal, member = %member.name, %category, "Marked attendance");
        Ok(member)
    }

    pub fn mark_exempt(&mut self, rehearsal: &str, key: MemberKey<'_>) -> Result<Member> {
        let member = self.resolve(key)?.clone();
        self.rehearsal_mut(rehearsal)?.mark_exempt(&member.name);
        debug!(rehearsal = %rehearsal, member = %member.name, "Excused from rehearsal");
        Ok(member)
    }

    // ===== Payments =====

    /// Create a payment event and return its position.
    pub fn create_payment(&mut self, name: &str, total: Money) -> Result<usize> {
        if self.payment_index(name).is_some() {
            return Err(ClubError::DuplicateName(name.to_string()));
        }
        self.payments.push(PaymentEvent::new(name, total));
        info!(payment = %name, %total, "Created payment");
        Ok(self.payments.len() - 1)
    }

    pub fn payment_index(&self, name: &str) -> Option<usize> {
        self.payments.iter().position(|p| p.name == name)
    }

    pub fn payment(&self, name: &str) -> Result<&PaymentEvent> {
        self.payments
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ClubError::NotFound(name.to_string()))
    }

    fn payment_mut(&mut self, name: &str) -> Result<&mut PaymentEvent> {
        self.payments
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ClubError::NotFound(name.to_string()))
    }

    /// Record a partial payment; returns the member and their running total.
    pub fn pay_partial(
        &mut self,
        payment: &str,
        key: MemberKey<'_>,
        amount: Money,
    ) -> Result<(Member, Money)> {
        let member = self.resolve(key)?.clone();
        let running = self.payment_mut(payment)?.pay_partial(&member.name, amount)?;
        debug!(payment = %payment, member = %member.name, %amount, %running, "Partial payment");
        Ok((member, running))
    }

    pub fn pay_full(&mut self, payment: &str, key: MemberKey<'_>) -> Result<Member> {
        let member = self.resolve(key)?.clone();
        self.payment_mut(payment)?.pay_full(&member.name);
        debug!(payment = %payment, member = %member.name, "Paid in full");
        Ok(member)
    }

    pub fn exempt_payment(&mut self, payment: &str, key: MemberKey<'_>) -> Result<Member> {
        let member = self.resolve(key)?.clone();
        self.payment_mut(payment)?.exempt(&member.name);
        debug!(payment = %payment, member = %member.name, "Exempt from payment");
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, PaymentStatus};

    fn sample() -> Dataset {
        let mut ds = Dataset::new();
        ds.register_member("C1", "Alice", "T1").unwrap();
        ds.register_member("C2", "Bob", "Bass").unwrap();
        ds
    }

    #[test]
    fn test_duplicate_rehearsal_leaves_sequence_unchanged() {
        let mut ds = sample();
        assert_eq!(ds.create_rehearsal("R1").unwrap(), 0);
        let before = ds.rehearsals().to_vec();

        let err = ds.create_rehearsal("R1").unwrap_err();
        assert_eq!(err, ClubError::DuplicateName("R1".to_string()));
        assert_eq!(ds.rehearsals(), before.as_slice());
    }

    #[test]
    fn test_duplicate_payment_leaves_sequence_unchanged() {
        let mut ds = sample();
        ds.create_payment("Dues", Money::from_dollars(50)).unwrap();
        let before = ds.clone();

        let err = ds.create_payment("Dues", Money::from_dollars(10)).unwrap_err();
        assert_eq!(err, ClubError::DuplicateName("Dues".to_string()));
        assert_eq!(ds, before);
        assert_eq!(ds.payment("Dues").unwrap().total, Money::from_dollars(50));
    }

    #[test]
    fn test_mark_attendance_by_card_and_name() {
        let mut ds = sample();
        ds.create_rehearsal("R1").unwrap();

        let alice = ds
            .mark_attendance("R1", MemberKey::Card("C1"), AttendanceCategory::Present)
            .unwrap();
        assert_eq!(alice.name, "Alice");
        ds.mark_attendance("R1", MemberKey::Name("Bob"), AttendanceCategory::Late)
            .unwrap();

        let r = ds.rehearsal("R1").unwrap();
        assert_eq!(r.status_of("Alice"), AttendanceStatus::Present);
        assert_eq!(r.status_of("Bob"), AttendanceStatus::Late);
    }

    #[test]
    fn test_unknown_card_leaves_dataset_unchanged() {
        let mut ds = sample();
        ds.create_rehearsal("R1").unwrap();
        let before = ds.clone();

        let err = ds
            .mark_attendance("R1", MemberKey::Card("nope"), AttendanceCategory::Present)
            .unwrap_err();
        assert_eq!(err, ClubError::NotFound("nope".to_string()));
        assert_eq!(ds, before);
    }

    #[test]
    fn test_unknown_rehearsal_is_not_found() {
        let mut ds = sample();
        let err = ds.mark_exempt("R9", MemberKey::Name("Alice")).unwrap_err();
        assert_eq!(err, ClubError::NotFound("R9".to_string()));
    }

    #[test]
    fn test_payment_flow() {
        let mut ds = sample();
        ds.create_payment("Dues", Money::from_dollars(50)).unwrap();

        let (_, running) = ds
            .pay_partial("Dues", MemberKey::Name("Alice"), Money::from_dollars(20))
            .unwrap();
        assert_eq!(running, Money::from_dollars(20));
        let (_, running) = ds
            .pay_partial("Dues", MemberKey::Name("Alice"), Money::from_dollars(30))
            .unwrap();
        assert_eq!(running, Money::from_dollars(50));
        assert_eq!(ds.payment("Dues").unwrap().status_of("Alice"), PaymentStatus::Paid);

        ds.pay_full("Dues", MemberKey::Card("C2")).unwrap();
        assert_eq!(ds.payment("Dues").unwrap().status_of("Bob"), PaymentStatus::Paid);

        ds.exempt_payment("Dues", MemberKey::Name("Bob")).unwrap();
        assert_eq!(ds.payment("Dues").unwrap().status_of("Bob"), PaymentStatus::Exempt);
    }

    #[test]
    fn test_partial_on_exempt_leaves_dataset_unchanged() {
        let mut ds = sample();
        ds.create_payment("Dues", Money::from_dollars(50)).unwrap();
        ds.exempt_payment("Dues", MemberKey::Name("Alice")).unwrap();
        let before = ds.clone();

        let err = ds
            .pay_partial("Dues", MemberKey::Name("Alice"), Money::from_dollars(5))
            .unwrap_err();
        assert!(matches!(err, ClubError::InvalidAmount(_)));
        assert_eq!(ds, before);
    }
}
