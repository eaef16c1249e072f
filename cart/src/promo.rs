//! Promo code table.
//!
//! Codes are matched case-insensitively after trimming. The table is supplied
//! at construction time; [`PromoTable::furnmart`] is the storefront's own set.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a promo reduces the subtotal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoKind {
    /// `value` percent of the subtotal, rounded half up
    Percentage,
    /// A flat `value` off
    Fixed,
}

/// Discount rule attached to a code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoRule {
    /// Percentage or fixed amount
    pub kind: PromoKind,
    /// Percent (0..=100) or currency units
    pub value: u64,
}

impl PromoRule {
    /// Percentage rule
    #[must_use]
    pub const fn percentage(value: u64) -> Self {
        Self {
            kind: PromoKind::Percentage,
            value,
        }
    }

    /// Fixed-amount rule
    #[must_use]
    pub const fn fixed(value: u64) -> Self {
        Self {
            kind: PromoKind::Fixed,
            value,
        }
    }

    /// Raw discount for `subtotal`, before clamping to the subtotal
    #[must_use]
    pub fn discount_for(&self, subtotal: u64) -> u64 {
        match self.kind {
            PromoKind::Percentage => {
                let scaled = u128::from(subtotal) * u128::from(self.value);
                u64::try_from((scaled + 50) / 100).unwrap_or(u64::MAX)
            },
            PromoKind::Fixed => self.value,
        }
    }
}

/// Trims and upper-cases a code as typed by the user
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validated mapping from normalized code to rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, PromoRule>", into = "HashMap<String, PromoRule>")]
pub struct PromoTable {
    rules: HashMap<String, PromoRule>,
}

impl PromoTable {
    /// Builds a table, normalizing every code
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for blank codes, codes that collide after
    /// normalization, or percentages above 100.
    pub fn new<I, S>(rules: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, PromoRule)>,
        S: AsRef<str>,
    {
        let mut table = HashMap::new();
        for (code, rule) in rules {
            let code = normalize_code(code.as_ref());
            if code.is_empty() {
                return Err(ConfigError::EmptyPromoCode);
            }
            if rule.kind == PromoKind::Percentage && rule.value > 100 {
                return Err(ConfigError::PercentageOutOfRange {
                    code,
                    value: rule.value,
                });
            }
            if table.insert(code.clone(), rule).is_some() {
                return Err(ConfigError::DuplicatePromoCode(code));
            }
        }
        Ok(Self { rules: table })
    }

    /// A table with no codes
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// The storefront's promo codes
    #[must_use]
    pub fn furnmart() -> Self {
        let rules = [
            ("SAVE10", PromoRule::percentage(10)),
            ("SAVE100", PromoRule::fixed(100)),
            ("WELCOME", PromoRule::percentage(15)),
            ("FURNMART2025", PromoRule::fixed(200)),
        ];
        Self {
            rules: rules
                .into_iter()
                .map(|(code, rule)| (code.to_string(), rule))
                .collect(),
        }
    }

    /// Looks up a code as typed by the user
    ///
    /// Returns the normalized code with its rule.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<(String, PromoRule)> {
        let code = normalize_code(code);
        self.rules.get(&code).map(|rule| (code, *rule))
    }

    /// Number of codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` when no codes are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PromoTable {
    fn default() -> Self {
        Self::furnmart()
    }
}

impl TryFrom<HashMap<String, PromoRule>> for PromoTable {
    type Error = ConfigError;

    fn try_from(rules: HashMap<String, PromoRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<PromoTable> for HashMap<String, PromoRule> {
    fn from(table: PromoTable) -> Self {
        table.rules
    }
}
