//! Service charge resolution.
//!
//! This module provides the [`ChargeResolver`], which looks up the service
//! charge for an employee from the charge-rate table keyed by responsible
//! party and position.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::models::{ChargeBasis, ChargeMode, ChargeRule};

/// Defaults substituted for blank charge columns and for unmatched parties.
///
/// Recurring billing defaults to a proportionate percentage; one-time and
/// new-joiner billing default to a fixed flat amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeDefaults {
    /// Basis used when a rule's charge type is blank.
    pub charge_basis: ChargeBasis,
    /// Mode used when a rule's application mode is blank, and for unmatched parties.
    pub application_mode: ChargeMode,
}

impl ChargeDefaults {
    /// Defaults for recurring, attendance-based billing.
    pub fn recurring() -> Self {
        Self {
            charge_basis: ChargeBasis::Percent,
            application_mode: ChargeMode::Proportionate,
        }
    }

    /// Defaults for one-time and new-joiner billing.
    pub fn one_time() -> Self {
        Self {
            charge_basis: ChargeBasis::Flat,
            application_mode: ChargeMode::Fixed,
        }
    }
}

/// A charge resolved for one employee, before any proration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCharge {
    /// The charge amount.
    pub amount: Decimal,
    /// Whether the amount stands alone or scales with proration.
    pub mode: ChargeMode,
}

/// A rule with its text columns normalised for matching.
#[derive(Debug, Clone, PartialEq)]
struct NormalizedRule {
    party: String,
    position: String,
    basis: ChargeBasis,
    value: Decimal,
    mode: ChargeMode,
}

/// Parses a charge value cell.
///
/// A trailing or embedded "%" is ignored. Blank and non-numeric cells parse
/// to zero; this never fails.
///
/// ```
/// use billing_engine::calculation::parse_charge_value;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_charge_value("8.5%"), Decimal::new(85, 1));
/// assert_eq!(parse_charge_value(" 1200 "), Decimal::new(1200, 0));
/// assert_eq!(parse_charge_value("n/a"), Decimal::ZERO);
/// ```
pub fn parse_charge_value(raw: &str) -> Decimal {
    let cleaned = raw.replace('%', "");
    let cleaned = cleaned.trim();
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .unwrap_or(Decimal::ZERO)
}

fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Resolves service charges from an immutable charge-rate table.
///
/// The table is normalised once on construction and may then be shared by
/// reference across any number of concurrent calculations.
///
/// # Lookup policy
///
/// 1. No rule for the party: zero charge in the default mode.
/// 2. Exactly one rule for the party: that rule, whatever the position.
/// 3. Several rules for the party: the first whose position matches exactly,
///    otherwise the first rule for the party.
///
/// # Example
///
/// ```
/// use billing_engine::calculation::{ChargeDefaults, ChargeResolver};
/// use billing_engine::models::{ChargeMode, ChargeRule};
/// use rust_decimal::Decimal;
///
/// let resolver = ChargeResolver::new(
///     vec![ChargeRule {
///         responsible_party: " ACME ".to_string(),
///         position: String::new(),
///         charge_type: Some("Percent".to_string()),
///         charge_value: Decimal::new(8, 0),
///         application_mode: Some("Proportionate".to_string()),
///     }],
///     ChargeDefaults::recurring(),
/// );
///
/// let charge = resolver.resolve("acme", Some("Engineer"), Decimal::new(50000, 0)).unwrap();
/// assert_eq!(charge.amount, Decimal::new(4000, 0));
/// assert_eq!(charge.mode, ChargeMode::Proportionate);
/// ```
#[derive(Debug, Clone)]
pub struct ChargeResolver {
    rules: Vec<NormalizedRule>,
    defaults: ChargeDefaults,
}

impl ChargeResolver {
    /// Builds a resolver from table rows, in table order.
    pub fn new(rules: Vec<ChargeRule>, defaults: ChargeDefaults) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| NormalizedRule {
                party: normalize_key(&rule.responsible_party),
                position: normalize_key(&rule.position),
                basis: rule
                    .charge_type
                    .as_deref()
                    .filter(|text| !text.trim().is_empty())
                    .map_or(defaults.charge_basis, ChargeBasis::from_text),
                value: rule.charge_value,
                mode: rule
                    .application_mode
                    .as_deref()
                    .filter(|text| !text.trim().is_empty())
                    .map_or(defaults.application_mode, ChargeMode::from_text),
            })
            .collect();

        Self { rules, defaults }
    }

    /// A resolver with no rules; every lookup yields a zero charge.
    pub fn empty(defaults: ChargeDefaults) -> Self {
        Self::new(Vec::new(), defaults)
    }

    /// The defaults this resolver was built with.
    pub fn defaults(&self) -> ChargeDefaults {
        self.defaults
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn find_rule(&self, party: &str, position: &str) -> Option<&NormalizedRule> {
        let mut party_rules = self.rules.iter().filter(|rule| rule.party == party);
        let first = party_rules.next()?;

        if first.position == position {
            return Some(first);
        }
        Some(
            party_rules
                .find(|rule| rule.position == position)
                .unwrap_or(first),
        )
    }

    /// Resolves the charge for a responsible party and position.
    ///
    /// Percentage charges are computed against `billing`, the unprorated base
    /// billing amount. Returns `None` if a percentage charge overflows.
    pub fn resolve(
        &self,
        party: &str,
        position: Option<&str>,
        billing: Decimal,
    ) -> Option<ResolvedCharge> {
        let party = normalize_key(party);
        let position = normalize_key(position.unwrap_or_default());

        let Some(rule) = self.find_rule(&party, &position) else {
            debug!(party = %party, "No charge rule for responsible party");
            return Some(ResolvedCharge {
                amount: Decimal::ZERO,
                mode: self.defaults.application_mode,
            });
        };

        let amount = match rule.basis {
            ChargeBasis::Percent => {
                billing.checked_mul(rule.value.checked_div(Decimal::ONE_HUNDRED)?)?
            }
            ChargeBasis::Flat => rule.value,
        };

        Some(ResolvedCharge {
            amount,
            mode: rule.mode,
        })
    }
}
