use std::fmt;

use serde::Serialize;

/// Calories eaten and burned over a day, measured against a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalorieBudget {
    pub budget: i64,
    pub consumed: i64,
    pub burned: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "calories", rename_all = "lowercase")]
pub enum Balance {
    /// Calories still available.
    Deficit(i64),
    /// Calories over the budget.
    Surplus(i64),
    OnBudget,
}

impl CalorieBudget {
    #[must_use]
    pub fn new(budget: i64, consumed: i64, burned: i64) -> Self {
        Self {
            budget,
            consumed,
            burned,
        }
    }

    #[must_use]
    pub fn net(&self) -> i64 {
        self.consumed.saturating_sub(self.burned)
    }

    #[must_use]
    pub fn balance(&self) -> Balance {
        let difference = self.budget.saturating_sub(self.net());
        match difference.signum() {
            1 => Balance::Deficit(difference),
            -1 => Balance::Surplus(difference.saturating_neg()),
            _ => Balance::OnBudget,
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Balance::Deficit(n) => write!(f, "{n} Calories Remaining (Deficit)"),
            Balance::Surplus(n) => write!(f, "{n} Calories Over Budget (Surplus)"),
            Balance::OnBudget => write!(f, "Perfectly on budget!"),
        }
    }
}
