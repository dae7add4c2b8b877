//! Service charge rule models.
//!
//! A [`ChargeRule`] is one row of the charge-rate table. Its text columns are
//! interpreted through [`ChargeBasis`] and [`ChargeMode`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a charge value is turned into an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeBasis {
    /// The value is a percentage of the base billing amount.
    Percent,
    /// The value is an absolute amount.
    Flat,
}

impl ChargeBasis {
    /// Any text containing "percent" (any case) is [`ChargeBasis::Percent`].
    pub fn from_text(text: &str) -> Self {
        if text.to_lowercase().contains("percent") {
            ChargeBasis::Percent
        } else {
            ChargeBasis::Flat
        }
    }
}

/// How a resolved charge relates to the prorated billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeMode {
    /// The charge stands alone, independent of proration.
    Fixed,
    /// The charge is scaled by the same ratio as the base billing.
    Proportionate,
}

impl ChargeMode {
    /// Any text containing "fixed" (any case) is [`ChargeMode::Fixed`].
    pub fn from_text(text: &str) -> Self {
        if text.to_lowercase().contains("fixed") {
            ChargeMode::Fixed
        } else {
            ChargeMode::Proportionate
        }
    }
}

impl std::fmt::Display for ChargeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeMode::Fixed => write!(f, "FIXED"),
            ChargeMode::Proportionate => write!(f, "PROPORTIONATE"),
        }
    }
}

/// One row of the charge-rate table, as loaded.
///
/// Blank charge type or application mode cells are `None`; the resolver
/// substitutes the defaults of the billing mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRule {
    /// The responsible party this rule applies to.
    pub responsible_party: String,
    /// The position this rule applies to; blank matches only a blank position.
    #[serde(default)]
    pub position: String,
    /// Charge type text ("percent", "fixed amount", ...).
    #[serde(default)]
    pub charge_type: Option<String>,
    /// Charge value; a percentage or an amount depending on the charge type.
    #[serde(default)]
    pub charge_value: Decimal,
    /// Application mode text ("fixed", "proportionate", ...).
    #[serde(default)]
    pub application_mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_from_text() {
        assert_eq!(ChargeBasis::from_text("Percent"), ChargeBasis::Percent);
        assert_eq!(ChargeBasis::from_text("percentage"), ChargeBasis::Percent);
        assert_eq!(ChargeBasis::from_text("fixed amount"), ChargeBasis::Flat);
        assert_eq!(ChargeBasis::from_text(""), ChargeBasis::Flat);
    }

    #[test]
    fn test_mode_from_text() {
        assert_eq!(ChargeMode::from_text("FIXED"), ChargeMode::Fixed);
        assert_eq!(ChargeMode::from_text("fixed charge"), ChargeMode::Fixed);
        assert_eq!(ChargeMode::from_text("proportionate"), ChargeMode::Proportionate);
        assert_eq!(ChargeMode::from_text("anything else"), ChargeMode::Proportionate);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ChargeMode::Fixed.to_string(), "FIXED");
        assert_eq!(ChargeMode::Proportionate.to_string(), "PROPORTIONATE");
    }

    #[test]
    fn test_deserialize_rule_with_blank_columns() {
        let json = r#"{ "responsible_party": "Acme", "charge_value": "8.5" }"#;
        let rule: ChargeRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.position, "");
        assert!(rule.charge_type.is_none());
        assert_eq!(rule.charge_value, Decimal::new(85, 1));
    }
}
