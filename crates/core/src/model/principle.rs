use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed set of leadership principles a structured answer can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadershipPrinciple {
    #[serde(rename = "Customer Obsession")]
    CustomerObsession,
    #[serde(rename = "Ownership")]
    Ownership,
    #[serde(rename = "Invent and Simplify")]
    InventAndSimplify,
    #[serde(rename = "Are Right, A Lot")]
    AreRightALot,
    #[serde(rename = "Learn and Be Curious")]
    LearnAndBeCurious,
    #[serde(rename = "Hire and Develop the Best")]
    HireAndDevelopTheBest,
    #[serde(rename = "Insist on the Highest Standards")]
    InsistOnTheHighestStandards,
    #[serde(rename = "Think Big")]
    ThinkBig,
    #[serde(rename = "Bias for Action")]
    BiasForAction,
    #[serde(rename = "Frugality")]
    Frugality,
    #[serde(rename = "Earn Trust")]
    EarnTrust,
    #[serde(rename = "Dive Deep")]
    DiveDeep,
    #[serde(rename = "Have Backbone; Disagree and Commit")]
    HaveBackbone,
    #[serde(rename = "Deliver Results")]
    DeliverResults,
    #[serde(rename = "Strive to be Earth's Best Employer")]
    BestEmployer,
    #[serde(rename = "Success and Scale Bring Broad Responsibility")]
    BroadResponsibility,
}

impl LeadershipPrinciple {
    /// All principles in canonical display order.
    pub const ALL: [LeadershipPrinciple; 16] = [
        Self::CustomerObsession,
        Self::Ownership,
        Self::InventAndSimplify,
        Self::AreRightALot,
        Self::LearnAndBeCurious,
        Self::HireAndDevelopTheBest,
        Self::InsistOnTheHighestStandards,
        Self::ThinkBig,
        Self::BiasForAction,
        Self::Frugality,
        Self::EarnTrust,
        Self::DiveDeep,
        Self::HaveBackbone,
        Self::DeliverResults,
        Self::BestEmployer,
        Self::BroadResponsibility,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomerObsession => "Customer Obsession",
            Self::Ownership => "Ownership",
            Self::InventAndSimplify => "Invent and Simplify",
            Self::AreRightALot => "Are Right, A Lot",
            Self::LearnAndBeCurious => "Learn and Be Curious",
            Self::HireAndDevelopTheBest => "Hire and Develop the Best",
            Self::InsistOnTheHighestStandards => "Insist on the Highest Standards",
            Self::ThinkBig => "Think Big",
            Self::BiasForAction => "Bias for Action",
            Self::Frugality => "Frugality",
            Self::EarnTrust => "Earn Trust",
            Self::DiveDeep => "Dive Deep",
            Self::HaveBackbone => "Have Backbone; Disagree and Commit",
            Self::DeliverResults => "Deliver Results",
            Self::BestEmployer => "Strive to be Earth's Best Employer",
            Self::BroadResponsibility => "Success and Scale Bring Broad Responsibility",
        }
    }
}

impl fmt::Display for LeadershipPrinciple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown leadership principle: {0}")]
pub struct UnknownPrincipleError(pub String);

impl FromStr for LeadershipPrinciple {
    type Err = UnknownPrincipleError;

    /// Case-insensitive match against the display names. Typographic
    /// apostrophes are accepted in place of `'`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('\u{2019}', "'");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownPrincipleError(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        let p: LeadershipPrinciple = "  dive deep ".parse().unwrap();
        assert_eq!(p, LeadershipPrinciple::DiveDeep);
    }

    #[test]
    fn accepts_typographic_apostrophe() {
        let p: LeadershipPrinciple = "Strive to be Earth\u{2019}s Best Employer".parse().unwrap();
        assert_eq!(p, LeadershipPrinciple::BestEmployer);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "Move Fast".parse::<LeadershipPrinciple>().unwrap_err();
        assert_eq!(err.to_string(), "unknown leadership principle: Move Fast");
    }

    #[test]
    fn display_and_serde_agree() {
        for p in LeadershipPrinciple::ALL {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{p}\""));
        }
    }
}
