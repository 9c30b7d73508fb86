mod common;

use common::{RECEIVER, TX_HASH, capture_logs, transaction};
use nimiq_payment_validator::gateway::MockGateway;
use nimiq_payment_validator::{
    Error, PaymentResult, PaymentRule, PaymentState, Transaction, TransactionValidator,
};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn rules() -> Vec<PaymentRule> {
    vec![
        PaymentRule::underpaid(dec!(50000)),
        PaymentRule::overpaid(dec!(50000)),
        PaymentRule::paid(),
    ]
}

/// Whole NIM expressed in luna
fn luna(nim: u64) -> String {
    (nim * 100_000).to_string()
}

fn validator_with(tx: Transaction) -> (Arc<MockGateway>, TransactionValidator) {
    let gateway = Arc::new(MockGateway::new().with_transaction(tx));
    let validator = TransactionValidator::new(gateway.clone(), RECEIVER, rules());
    (gateway, validator)
}

#[tokio::test]
async fn test_invalid_hash_is_an_error_without_lookup() {
    let (gateway, validator) = validator_with(transaction(&luna(500000), 150));

    for hash in ["INVALID_HASH!", "", "0xabc", "abc def"] {
        let err = validator
            .validate_transaction(hash, dec!(500000))
            .await
            .unwrap_err();
        assert!(err.is_invalid_hash());
        assert!(matches!(err, Error::InvalidTransactionHash(ref h) if h == hash));
    }

    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_not_found() {
    let gateway = Arc::new(MockGateway::new());
    let validator = TransactionValidator::new(gateway.clone(), RECEIVER, rules());

    let result = validator
        .validate_transaction(TX_HASH, dec!(500000))
        .await
        .unwrap();

    assert_eq!(result.state, PaymentState::NotFound);
    assert_eq!(result.message(), Some("Transaction not found."));
    assert_eq!(gateway.requested_hashes().await, vec![TX_HASH]);
}

#[tokio::test]
async fn test_recipient_mismatch() {
    let mut tx = transaction(&luna(500000), 150);
    tx.recipient_address = "NQ02 WRONG_RECEIVER".to_string();
    let (_, validator) = validator_with(tx);

    let result = validator
        .validate_transaction(TX_HASH, dec!(500000))
        .await
        .unwrap();

    assert_eq!(result, PaymentResult::recipient_mismatch());
    assert_eq!(
        result.message(),
        Some("Transaction recipient address does not match.")
    );
}

#[tokio::test]
async fn test_paid() {
    let (_, validator) = validator_with(transaction(&luna(500000), 150));

    let result = validator
        .validate_transaction(TX_HASH, dec!(500000))
        .await
        .unwrap();

    assert_eq!(result.state, PaymentState::Paid);
    assert!(result.message.is_none());
}

#[tokio::test]
async fn test_paid_below_confirmation_floor_fails() {
    let (_, validator) = validator_with(transaction(&luna(500000), 119));

    let result = validator
        .validate_transaction(TX_HASH, dec!(500000))
        .await
        .unwrap();

    assert_eq!(result, PaymentResult::failed());
}

#[tokio::test]
async fn test_underpaid_within_threshold() {
    let (_, validator) = validator_with(transaction(&luna(450000), 150));

    let result = validator
        .validate_transaction(TX_HASH, dec!(500000))
        .await
        .unwrap();

    assert_eq!(result.state, PaymentState::Underpaid);
    assert_eq!(
        result.message(),
        Some("Payment amount is less than the required amount.")
    );
}

#[tokio::test]
async fn test_overpaid_within_threshold() {
    let (_, validator) = validator_with(transaction(&luna(550000), 150));

    let result = validator
        .validate_transaction(TX_HASH, dec!(500000))
        .await
        .unwrap();

    assert_eq!(result.state, PaymentState::Overpaid);
    assert_eq!(
        result.message(),
        Some("Payment amount exceeds the required amount.")
    );
}

#[tokio::test]
async fn test_beyond_thresholds_fails() {
    for nim in [350000, 650000, 700000] {
        let (_, validator) = validator_with(transaction(&luna(nim), 150));

        let result = validator
            .validate_transaction(TX_HASH, dec!(500000))
            .await
            .unwrap();

        assert_eq!(result, PaymentResult::failed(), "value {} NIM", nim);
    }
}

#[tokio::test]
async fn test_recipient_checked_before_amount() {
    let mut tx = transaction(&luna(700000), 150);
    tx.recipient_address = "NQ02 WRONG_RECEIVER".to_string();
    let (_, validator) = validator_with(tx);

    let result = validator
        .validate_transaction(TX_HASH, dec!(500000))
        .await
        .unwrap();

    assert_eq!(result, PaymentResult::recipient_mismatch());
}

#[tokio::test]
async fn test_empty_rules_fall_back_to_paid() {
    let gateway = Arc::new(MockGateway::new().with_transaction(transaction(&luna(5), 120)));
    let validator = TransactionValidator::new(gateway, RECEIVER, vec![]);

    assert_eq!(validator.rules(), &[PaymentRule::paid()]);

    let result = validator
        .validate_transaction(TX_HASH, dec!(5))
        .await
        .unwrap();
    assert_eq!(result.state, PaymentState::Paid);

    let result = validator
        .validate_transaction(TX_HASH, dec!(4.5))
        .await
        .unwrap();
    assert_eq!(result, PaymentResult::failed());
}

#[tokio::test]
async fn test_logs_fire_at_decision_points() {
    let (logs, _guard) = capture_logs();

    let mut tx = transaction(&luna(500000), 150);
    tx.recipient_address = "NQ02 WRONG_RECEIVER".to_string();
    let (_, validator) = validator_with(tx);

    let _ = validator.validate_transaction("INVALID_HASH!", dec!(1)).await;
    let _ = validator.validate_transaction("ffff", dec!(1)).await;
    let _ = validator.validate_transaction(TX_HASH, dec!(1)).await;

    let output = logs.contents();
    assert!(output.contains("Invalid transaction hash provided."), "{}", output);
    assert!(output.contains("transaction_hash=INVALID_HASH!"), "{}", output);
    assert!(output.contains("Transaction not found."), "{}", output);
    assert!(output.contains("transaction_hash=ffff"), "{}", output);
    assert!(output.contains("Recipient address mismatch."), "{}", output);
    assert!(output.contains("expected_address=NQ01 RECEIVER"), "{}", output);
    assert!(output.contains("actual_address=NQ02 WRONG_RECEIVER"), "{}", output);
}

#[tokio::test]
async fn test_concurrent_validations_are_independent() {
    let mut second = transaction(&luna(450000), 150);
    second.hash = "0123456789".to_string();

    let gateway = Arc::new(
        MockGateway::new()
            .with_transaction(transaction(&luna(500000), 150))
            .with_transaction(second),
    );
    let validator = TransactionValidator::new(gateway.clone(), RECEIVER, rules());

    let handles: Vec<_> = [TX_HASH, "0123456789", "deadbeef"]
        .into_iter()
        .map(|hash| {
            let validator = validator.clone();
            tokio::spawn(async move {
                validator
                    .validate_transaction(hash, dec!(500000))
                    .await
                    .unwrap()
                    .state
            })
        })
        .collect();

    let mut states = Vec::new();
    for handle in handles {
        states.push(handle.await.unwrap());
    }

    assert_eq!(
        states,
        vec![
            PaymentState::Paid,
            PaymentState::Underpaid,
            PaymentState::NotFound
        ]
    );
    assert_eq!(gateway.call_count(), 3);
}
