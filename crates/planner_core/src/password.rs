//! First-login password change: policy rules, strength meter, and change validation.

use serde::{Deserialize, Serialize};

use crate::error::PasswordError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRule {
    MinLength(usize),
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl PolicyRule {
    pub fn describe(&self) -> String {
        match self {
            PolicyRule::MinLength(n) => format!("at least {n} characters"),
            PolicyRule::Uppercase => "an uppercase letter".to_string(),
            PolicyRule::Lowercase => "a lowercase letter".to_string(),
            PolicyRule::Digit => "a digit".to_string(),
            PolicyRule::Symbol => "a symbol".to_string(),
        }
    }

    fn is_met(&self, candidate: &str) -> bool {
        match self {
            PolicyRule::MinLength(n) => candidate.chars().count() >= *n,
            PolicyRule::Uppercase => candidate.chars().any(char::is_uppercase),
            PolicyRule::Lowercase => candidate.chars().any(char::is_lowercase),
            PolicyRule::Digit => candidate.chars().any(|c| c.is_ascii_digit()),
            PolicyRule::Symbol => candidate
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Fair,
    Good,
    Strong,
}

const LONG_PASSWORD_BONUS_AT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

impl PasswordPolicy {
    pub fn rules(&self) -> Vec<PolicyRule> {
        let mut rules = vec![PolicyRule::MinLength(self.min_length)];
        if self.require_uppercase {
            rules.push(PolicyRule::Uppercase);
        }
        if self.require_lowercase {
            rules.push(PolicyRule::Lowercase);
        }
        if self.require_digit {
            rules.push(PolicyRule::Digit);
        }
        if self.require_symbol {
            rules.push(PolicyRule::Symbol);
        }
        rules
    }

    pub fn unmet_rules(&self, candidate: &str) -> Vec<PolicyRule> {
        self.rules()
            .into_iter()
            .filter(|rule| !rule.is_met(candidate))
            .collect()
    }

    /// Strength ignores which rules are configured; it scores the five checks plus length.
    pub fn strength(&self, candidate: &str) -> Strength {
        let checks = [
            PolicyRule::MinLength(self.min_length),
            PolicyRule::Uppercase,
            PolicyRule::Lowercase,
            PolicyRule::Digit,
            PolicyRule::Symbol,
        ];
        let mut score = checks.iter().filter(|rule| rule.is_met(candidate)).count();
        if candidate.chars().count() >= LONG_PASSWORD_BONUS_AT {
            score += 1;
        }
        match score {
            0..=2 => Strength::Weak,
            3..=4 => Strength::Fair,
            5 => Strength::Good,
            _ => Strength::Strong,
        }
    }

    pub fn validate_change(
        &self,
        current: &str,
        new: &str,
        confirmation: &str,
    ) -> Result<(), PasswordError> {
        if current.is_empty() {
            return Err(PasswordError::MissingCurrent);
        }
        let unmet = self.unmet_rules(new);
        if !unmet.is_empty() {
            return Err(PasswordError::PolicyViolation(unmet));
        }
        if new != confirmation {
            return Err(PasswordError::Mismatch);
        }
        if new == current {
            return Err(PasswordError::ReusesCurrent);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/password_tests.rs"]
mod tests;
