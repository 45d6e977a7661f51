use proptest::prelude::*;
use vaultcore::{
    classify_entity, compute_vault_score, CompanyProfile, DeepScanSignals, EntityType, ScanInput,
    ScoreLabel, TokenMetrics,
};

type Rule = fn(&ScanInput) -> i32;

fn flag(condition: bool, points: i32) -> i32 {
    if condition {
        points
    } else {
        0
    }
}

// One entry per scoring rule, evaluated independently of the calculator
fn rules() -> [Rule; 14] {
    [
        |i| flag(i.suspicious_transaction_count > 10, -25),
        |i| flag(!i.contract_verified, -20),
        |i| flag(!i.liquidity_locked, -15),
        |i| flag(i.holder_count < 100, -10),
        |i| flag(i.rug_pull_risk > 0.7, -30),
        |i| token_rule(i, |t| t.market_cap.map_or(false, |v| v < 1_000_000.0), -10),
        |i| token_rule(i, |t| t.volume_24h.map_or(false, |v| v < 10_000.0), -5),
        |i| token_rule(i, |t| t.price_change_24h_percent.map_or(false, |v| v < -20.0), -15),
        |i| company_rule(i, |c| c.red_flags.len() > 2, -20),
        |i| company_rule(i, |c| c.green_flags.len() < 3, -10),
        |i| deep_rule(i, |d| d.suspicious_pattern_count > 3, -15),
        |i| deep_rule(i, |d| d.total_value_received > 1_000_000.0, 5),
        |i| deep_rule(i, |d| d.unique_interaction_count > 100, 3),
        |i| deep_rule(i, |d| d.contract_interaction_count > 50, 2),
    ]
}

fn token_rule(i: &ScanInput, cond: fn(&TokenMetrics) -> bool, points: i32) -> i32 {
    match (&i.entity_type, &i.token) {
        (EntityType::Token, Some(t)) => flag(cond(t), points),
        _ => 0,
    }
}

fn company_rule(i: &ScanInput, cond: fn(&CompanyProfile) -> bool, points: i32) -> i32 {
    match (&i.entity_type, &i.company) {
        (EntityType::Company, Some(c)) => flag(cond(c), points),
        _ => 0,
    }
}

fn deep_rule(i: &ScanInput, cond: fn(&DeepScanSignals) -> bool, points: i32) -> i32 {
    i.deep_scan.as_ref().map_or(0, |d| flag(cond(d), points))
}

fn entity_type() -> impl Strategy<Value = EntityType> {
    prop_oneof![
        Just(EntityType::Address),
        Just(EntityType::Token),
        Just(EntityType::Company),
        Just(EntityType::Nft),
        Just(EntityType::Project),
    ]
}

fn token_metrics() -> impl Strategy<Value = TokenMetrics> {
    (
        proptest::option::of(0.0..5_000_000.0f64),
        proptest::option::of(0.0..50_000.0f64),
        proptest::option::of(-100.0..100.0f64),
    )
        .prop_map(|(market_cap, volume_24h, price_change_24h_percent)| TokenMetrics {
            market_cap,
            volume_24h,
            price_change_24h_percent,
        })
}

fn company_profile() -> impl Strategy<Value = CompanyProfile> {
    (
        proptest::collection::vec("[a-z]{1,8}", 0..6),
        proptest::collection::vec("[a-z]{1,8}", 0..6),
    )
        .prop_map(|(red_flags, green_flags)| CompanyProfile {
            red_flags,
            green_flags,
        })
}

fn deep_scan() -> impl Strategy<Value = DeepScanSignals> {
    (0..10u32, 0.0..3_000_000.0f64, 0..300u32, 0..150u32).prop_map(
        |(suspicious_pattern_count, total_value_received, unique, contracts)| DeepScanSignals {
            suspicious_pattern_count,
            total_value_received,
            unique_interaction_count: unique,
            contract_interaction_count: contracts,
        },
    )
}

fn scan_input() -> impl Strategy<Value = ScanInput> {
    (
        entity_type(),
        0..50u32,
        any::<bool>(),
        any::<bool>(),
        0..1_000u64,
        0.0..=1.0f64,
        proptest::option::of(token_metrics()),
        proptest::option::of(company_profile()),
        proptest::option::of(deep_scan()),
    )
        .prop_map(
            |(
                entity_type,
                suspicious_transaction_count,
                contract_verified,
                liquidity_locked,
                holder_count,
                rug_pull_risk,
                token,
                company,
                deep_scan,
            )| ScanInput {
                entity_type,
                suspicious_transaction_count,
                contract_verified,
                liquidity_locked,
                holder_count,
                rug_pull_risk,
                token,
                company,
                deep_scan,
            },
        )
}

proptest! {
    #[test]
    fn score_is_bounded_and_labelled(input in scan_input()) {
        let result = compute_vault_score(&input);
        prop_assert!(result.score <= 100);
        prop_assert_eq!(result.label, ScoreLabel::from_score(result.score));
        prop_assert_eq!(result.score as i32, result.raw_total().clamp(0, 100));
    }

    #[test]
    fn rule_order_does_not_matter(
        input in scan_input(),
        order in Just((0..14).collect::<Vec<usize>>()).prop_shuffle(),
    ) {
        let rules = rules();
        let raw: i32 = 100 + order.iter().map(|&idx| rules[idx](&input)).sum::<i32>();
        let result = compute_vault_score(&input);
        prop_assert_eq!(result.raw_total(), raw);
        prop_assert_eq!(result.score as i32, raw.clamp(0, 100));
    }

    #[test]
    fn crossing_suspicious_threshold_costs_25(input in scan_input(), below in 0..=10u32, above in 11..1_000u32) {
        let quiet = ScanInput { suspicious_transaction_count: below, ..input.clone() };
        let noisy = ScanInput { suspicious_transaction_count: above, ..input };

        let quiet_raw = compute_vault_score(&quiet).raw_total();
        let noisy_result = compute_vault_score(&noisy);
        prop_assert_eq!(noisy_result.raw_total(), quiet_raw - 25);
        prop_assert_eq!(noisy_result.score as i32, (quiet_raw - 25).clamp(0, 100));
    }

    #[test]
    fn classifier_is_total(query in ".{0,64}") {
        let _ = classify_entity(&query);
    }

    #[test]
    fn hex_like_42_chars_is_address(tail in "[0-9a-zA-Z]{40}") {
        let query = format!("0x{}", tail);
        prop_assert_eq!(classify_entity(&query), EntityType::Address);
    }
}
