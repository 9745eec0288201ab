//! Subscription plan tiers.

use serde::{Deserialize, Serialize};

/// Subscription plan for a registered user.
///
/// Every user starts on `Trial`; the paid tiers are assigned by the
/// subscription lifecycle, which lives outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Trial,
    #[serde(rename = "mensal")]
    Monthly,
    #[serde(rename = "anual")]
    Annual,
}

impl Plan {
    /// Whether this plan is the time-boxed free tier.
    #[must_use]
    pub const fn is_trial(&self) -> bool {
        matches!(self, Self::Trial)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trial => write!(f, "trial"),
            Self::Monthly => write!(f, "mensal"),
            Self::Annual => write!(f, "anual"),
        }
    }
}

impl std::str::FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(Self::Trial),
            "mensal" => Ok(Self::Monthly),
            "anual" => Ok(Self::Annual),
            _ => Err(format!("invalid plan: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_via_str() {
        for plan in [Plan::Trial, Plan::Monthly, Plan::Annual] {
            let parsed: Plan = plan.to_string().parse().unwrap();
            assert_eq!(parsed, plan);
        }
    }

    #[test]
    fn test_unknown_plan_rejected() {
        assert!("vitalicio".parse::<Plan>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Plan::Trial).unwrap(), "\"trial\"");
        assert_eq!(serde_json::to_string(&Plan::Monthly).unwrap(), "\"mensal\"");
        assert_eq!(serde_json::to_string(&Plan::Annual).unwrap(), "\"anual\"");
    }

    #[test]
    fn test_is_trial() {
        assert!(Plan::Trial.is_trial());
        assert!(!Plan::Monthly.is_trial());
    }
}
