//! Complexity and risk scoring
//!
//! Both functions are pure, total and deterministic: weighted counts against
//! fixed breakpoints. They are monotonically non-decreasing in every input.

use serde::Serialize;

use crate::analysis::types::{SecurityNote, TransactionAnalysis};

/// Complexity bucket for a transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Complexity {
    /// Weighted score <= 5
    #[default]
    Simple,
    /// Weighted score <= 15
    Moderate,
    /// Weighted score <= 30
    Complex,
    /// Everything above
    #[serde(rename = "Very Complex")]
    VeryComplex,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "Simple"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Complex => write!(f, "Complex"),
            Self::VeryComplex => write!(f, "Very Complex"),
        }
    }
}

/// Risk bucket for a transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    /// No risk factors
    #[default]
    Low,
    /// 1-2 risk factors
    Medium,
    /// 3+ risk factors
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Compute the complexity bucket for an analysis.
///
/// Cross-chain (FAssets) activity weighs heaviest; multiple ecosystem
/// categories in one transaction add a flat bonus.
#[must_use]
pub fn complexity_score(analysis: &TransactionAnalysis) -> Complexity {
    let mut score = 0usize;

    score += analysis.transfers.len() * 2;
    score += analysis.interactions.len() * 3;
    score += analysis.security_info.len();
    if analysis.action_types.len() > 1 {
        score += 5;
    }

    let flags = &analysis.flare_specific;
    if flags.is_ftso_related {
        score += 5;
    }
    if flags.is_fassets_related {
        score += 8;
    }
    if flags.is_fdc_related {
        score += 6;
    }
    if flags.is_staking_related {
        score += 4;
    }
    if flags.flag_count() > 1 {
        score += 10;
    }
    score += flags.data_feeds_interacted.len() * 2;

    bucket_complexity(score)
}

fn bucket_complexity(score: usize) -> Complexity {
    match score {
        0..=5 => Complexity::Simple,
        6..=15 => Complexity::Moderate,
        16..=30 => Complexity::Complex,
        _ => Complexity::VeryComplex,
    }
}

/// Compute the risk bucket for an analysis.
///
/// Testnet transactions get one factor forgiven; the counter never goes
/// below zero.
#[must_use]
pub fn risk_level(analysis: &TransactionAnalysis) -> RiskLevel {
    let mut factors = 0i32;

    if analysis.interactions.len() > 3 {
        factors += 1;
    }
    if analysis.security_info.iter().any(SecurityNote::is_warning) {
        factors += 2;
    }
    if analysis.transfers.len() > 5 {
        factors += 1;
    }
    if analysis.action_types.len() > 3 {
        factors += 1;
    }

    let flags = &analysis.flare_specific;
    if flags.is_fassets_related {
        factors += 1;
    }
    if analysis.network.testnet {
        factors = (factors - 1).max(0);
    }

    let ecosystem = [
        flags.is_ftso_related,
        flags.is_fassets_related,
        flags.is_fdc_related,
    ]
    .iter()
    .filter(|&&f| f)
    .count();
    if ecosystem > 2 {
        factors += 1;
    }

    let value: f64 = analysis.transaction.value.parse().unwrap_or(0.0);
    if value > 1000.0 {
        factors += 1;
    }
    if value > 10_000.0 {
        factors += 1;
    }

    bucket_risk(factors)
}

fn bucket_risk(factors: i32) -> RiskLevel {
    if factors <= 0 {
        RiskLevel::Low
    } else if factors <= 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{NetworkInfo, TokenInfo, TransactionInfo, Transfer};
    use pretty_assertions::assert_eq;

    fn base_analysis() -> TransactionAnalysis {
        TransactionAnalysis::new(
            NetworkInfo {
                name: "Flare Mainnet".to_string(),
                chain_id: 14,
                currency: "FLR".to_string(),
                block_number: Some(1),
                block_timestamp: "unknown".to_string(),
                features: vec![],
                description: String::new(),
                testnet: false,
            },
            TransactionInfo {
                hash: "0x0".to_string(),
                from: "0x1".to_string(),
                to: Some("0x2".to_string()),
                value: "0.0".to_string(),
                nonce: 0,
                status: "Success".to_string(),
                gas_used: None,
                gas_price: "unknown".to_string(),
                max_fee_per_gas: None,
                max_priority_fee_per_gas: None,
                total_cost: "unknown".to_string(),
                function_selector: None,
            },
        )
    }

    fn dummy_transfer() -> Transfer {
        Transfer {
            token_type: "Native".to_string(),
            token: TokenInfo {
                address: None,
                symbol: "FLR".to_string(),
                decimals: 18,
                name: "Flare".to_string(),
            },
            from: "0x1".to_string(),
            to: "0x2".to_string(),
            value: "1.0".to_string(),
        }
    }

    #[test]
    fn empty_analysis_is_simple_and_low() {
        let a = base_analysis();
        assert_eq!(complexity_score(&a), Complexity::Simple);
        assert_eq!(risk_level(&a), RiskLevel::Low);
    }

    #[test]
    fn complexity_buckets_exact() {
        assert_eq!(bucket_complexity(0), Complexity::Simple);
        assert_eq!(bucket_complexity(5), Complexity::Simple);
        assert_eq!(bucket_complexity(6), Complexity::Moderate);
        assert_eq!(bucket_complexity(15), Complexity::Moderate);
        assert_eq!(bucket_complexity(16), Complexity::Complex);
        assert_eq!(bucket_complexity(30), Complexity::Complex);
        assert_eq!(bucket_complexity(31), Complexity::VeryComplex);
        assert_eq!(bucket_complexity(usize::MAX), Complexity::VeryComplex);
    }

    #[test]
    fn risk_buckets_exact() {
        assert_eq!(bucket_risk(-1), RiskLevel::Low);
        assert_eq!(bucket_risk(0), RiskLevel::Low);
        assert_eq!(bucket_risk(1), RiskLevel::Medium);
        assert_eq!(bucket_risk(2), RiskLevel::Medium);
        assert_eq!(bucket_risk(3), RiskLevel::High);
        assert_eq!(bucket_risk(100), RiskLevel::High);
    }

    #[test]
    fn complexity_monotone_in_transfer_count() {
        let mut previous = Complexity::Simple;
        let mut a = base_analysis();
        for _ in 0..40 {
            a.transfers.push(dummy_transfer());
            let current = complexity_score(&a);
            assert!(current >= previous, "complexity must not decrease");
            previous = current;
        }
        assert_eq!(previous, Complexity::VeryComplex);
    }

    #[test]
    fn complexity_monotone_in_interactions() {
        let mut previous = Complexity::Simple;
        let mut a = base_analysis();
        for i in 0..20 {
            a.interactions.push(format!("0x{i:040x}"));
            let current = complexity_score(&a);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn fassets_weighs_heavier_than_staking() {
        let mut fassets = base_analysis();
        fassets.flare_specific.is_fassets_related = true;
        let mut staking = base_analysis();
        staking.flare_specific.is_staking_related = true;
        assert!(complexity_score(&fassets) >= complexity_score(&staking));
    }

    #[test]
    fn multi_flag_bonus_applies() {
        let mut a = base_analysis();
        a.flare_specific.is_ftso_related = true;
        a.flare_specific.is_fassets_related = true;
        // 5 + 8 + 10 multi-flag bonus = 23 -> Complex
        assert_eq!(complexity_score(&a), Complexity::Complex);
    }

    #[test]
    fn risk_monotone_in_value() {
        let mut a = base_analysis();
        let mut previous = RiskLevel::Low;
        for value in ["0.5", "500", "1500", "20000"] {
            a.transaction.value = value.to_string();
            let current = risk_level(&a);
            assert!(current >= previous, "risk must not decrease with value");
            previous = current;
        }
    }

    #[test]
    fn testnet_reduction_never_underflows() {
        let mut a = base_analysis();
        a.network.testnet = true;
        assert_eq!(risk_level(&a), RiskLevel::Low);

        // One factor on a testnet is forgiven
        a.flare_specific.is_fassets_related = true;
        assert_eq!(risk_level(&a), RiskLevel::Low);
    }

    #[test]
    fn warning_notes_add_two_factors() {
        let mut a = base_analysis();
        a.security_info.push(SecurityNote {
            note_type: "Warning".to_string(),
            message: "unverified".to_string(),
            contract_address: "0xdead".to_string(),
        });
        assert_eq!(risk_level(&a), RiskLevel::Medium);

        a.transfers = (0..6).map(|_| dummy_transfer()).collect();
        assert_eq!(risk_level(&a), RiskLevel::High);
    }

    #[test]
    fn unparseable_value_counts_as_zero() {
        let mut a = base_analysis();
        a.transaction.value = "not-a-number".to_string();
        assert_eq!(risk_level(&a), RiskLevel::Low);
    }

    #[test]
    fn labels_render() {
        assert_eq!(Complexity::VeryComplex.to_string(), "Very Complex");
        assert_eq!(RiskLevel::Medium.to_string(), "Medium");
        assert_eq!(
            serde_json::to_value(Complexity::VeryComplex).unwrap(),
            serde_json::json!("Very Complex")
        );
    }
}
