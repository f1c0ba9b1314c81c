//! # End-to-end Treasury Transfer Tests (qc-18)
//!
//! Drives the engine through the host callbacks with real secp256k1 signers.
//!
//! ## Test Categories
//!
//! 1. **Scenarios** - accepted transfer, skipped nonce, amount over ceiling
//! 2. **Crack** - determinism and source/target disjointness
//! 3. **Atomicity** - injected write failures leave state untouched
//! 4. **Authorization** - signer threshold and clearance

use std::sync::Arc;

use k256::ecdsa::SigningKey;
use qc_04_state_management::{
    Account, AccountHasher, ApplyResponse, EvmAccount, EvmAccountInfo, InMemoryWrappedStates,
    SecureAccount, StateAddress, StateError, TransactionalState,
};
use qc_10_signature_verification::{address_from_pubkey, sign_payload, EthMultisigVerifier};
use qc_18_secure_accounts::{
    ApplyError, FixedClock, SecureAccountConfig, SecureAccountEngine, SecureAccountRegistry,
    SecureAccountTxHandler, TransferFromSecureAccountTx, TreasuryConfig, VALID_TRANSACTION,
};
use shared_types::{format_address, CycleInfo, MultisigKeys, SecurityLevel, U256};

// =============================================================================
// TEST HELPERS
// =============================================================================

const ONE_ETHER: u128 = 1_000_000_000_000_000_000;
const NOW_MS: u64 = 1_700_000_000_000;

struct Fixture {
    engine: SecureAccountEngine,
    registry: Arc<SecureAccountRegistry>,
    signers: Vec<SigningKey>,
    clock: Arc<FixedClock>,
}

fn foundation() -> SecureAccountConfig {
    SecureAccountConfig {
        name: "Foundation".into(),
        source_funds_address: "0x1111111111111111111111111111111111111111".into(),
        recipient_funds_address: "0x2222222222222222222222222222222222222222".into(),
        secure_account_address: format!("0x{}", "f0".repeat(32)),
        source_funds_balance: (2 * ONE_ETHER).to_string(),
    }
}

fn fixture(required: usize, signer_count: usize, level: SecurityLevel) -> Fixture {
    let signers: Vec<SigningKey> = (0..signer_count)
        .map(|_| SigningKey::random(&mut rand::thread_rng()))
        .collect();
    let multisig_keys: MultisigKeys = signers
        .iter()
        .map(|k| (format_address(&address_from_pubkey(k.verifying_key())), level))
        .collect();
    let config = TreasuryConfig {
        multisig_keys,
        min_multisig_required_for_global_txs: required,
        support_internal_tx_receipt: true,
    };
    let registry = Arc::new(SecureAccountRegistry::new(vec![foundation()]).unwrap());
    let clock = Arc::new(FixedClock::new(NOW_MS));
    let engine = SecureAccountEngine::new(
        registry.clone(),
        Arc::new(EthMultisigVerifier::new()),
        config,
        clock.clone(),
    );
    Fixture {
        engine,
        registry,
        signers,
        clock,
    }
}

impl Fixture {
    fn keys(&self) -> (StateAddress, StateAddress, StateAddress) {
        let entry = self.registry.get("Foundation").unwrap();
        (
            entry.source_key.clone(),
            entry.recipient_key.clone(),
            entry.secure_key.clone(),
        )
    }

    /// Genesis state plus an empty recipient, with the transfer policy opened.
    fn states(&self, next_transfer_amount: U256, next_transfer_time: u64) -> InMemoryWrappedStates {
        let (_, recipient_key, secure_key) = self.keys();
        let genesis = self.engine.genesis(&[CycleInfo { start: 1_600_000_000 }]).unwrap();
        let mut states = InMemoryWrappedStates::new();
        genesis.seed(&mut states).unwrap();

        let mut secure = states
            .get_account(&secure_key)
            .and_then(|a| a.as_secure().cloned())
            .unwrap();
        secure.next_transfer_amount = next_transfer_amount;
        secure.next_transfer_time = next_transfer_time;
        let mut secure = Account::Secure(secure);
        AccountHasher::hash(&mut secure).unwrap();

        states
            .with_account(secure_key, secure)
            .with_account(
                recipient_key,
                Account::Evm(EvmAccount::new(
                    foundation().recipient_funds_address,
                    EvmAccountInfo::default(),
                )),
            )
    }

    fn signed(&self, amount: u128, nonce: i64, signer_count: usize) -> TransferFromSecureAccountTx {
        let mut tx = TransferFromSecureAccountTx::new(amount.to_string(), "Foundation", nonce);
        tx.sign = self.signers[..signer_count]
            .iter()
            .map(|k| sign_payload(&tx.signing_payload(), k).unwrap())
            .collect();
        tx
    }
}

fn balance(states: &InMemoryWrappedStates, key: &str) -> U256 {
    states.get_account(key).unwrap().as_evm().unwrap().account.balance
}

fn secure(states: &InMemoryWrappedStates, key: &str) -> SecureAccount {
    states.get_account(key).unwrap().as_secure().cloned().unwrap()
}

/// State view whose n-th write fails.
struct FailingState {
    inner: InMemoryWrappedStates,
    puts: usize,
    fail_on: usize,
}

impl TransactionalState for FailingState {
    fn get_account(&self, address: &str) -> Option<Account> {
        self.inner.get_account(address)
    }

    fn put_account(&mut self, address: StateAddress, account: Account) -> Result<(), StateError> {
        self.puts += 1;
        if self.puts == self.fail_on {
            return Err(StateError::WriteFailed(format!("injected at write {}", self.puts)));
        }
        self.inner.put_account(address, account)
    }

    fn checkpoint(&mut self) {
        self.inner.checkpoint()
    }

    fn commit(&mut self) -> Result<(), StateError> {
        self.inner.commit()
    }

    fn revert(&mut self) -> Result<(), StateError> {
        self.inner.revert()
    }
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_accepted_transfer_moves_one_ether() {
    let f = fixture(2, 3, SecurityLevel::High);
    let (source_key, recipient_key, secure_key) = f.keys();
    let mut states = f.states(U256::from(ONE_ETHER), NOW_MS);
    let tx = f.signed(ONE_ETHER, 1, 2);

    assert!(f.engine.validate(&tx).success);
    let outcome = f.engine.verify(&tx, &states);
    assert!(outcome.success, "{}", outcome.reason);
    assert_eq!(outcome.reason, VALID_TRANSACTION);

    let mut response = ApplyResponse::new("tx-a", NOW_MS);
    f.engine
        .apply(&tx, "tx-a", NOW_MS, &mut states, &mut response)
        .unwrap();

    assert_eq!(balance(&states, &source_key), U256::from(ONE_ETHER));
    assert_eq!(balance(&states, &recipient_key), U256::from(ONE_ETHER));
    let treasury = secure(&states, &secure_key);
    assert_eq!(treasury.nonce, 1);
    assert_eq!(treasury.timestamp, NOW_MS);
    // ceilings are not replenished by a transfer
    assert_eq!(treasury.next_transfer_amount, U256::from(ONE_ETHER));
    assert_eq!(treasury.next_transfer_time, NOW_MS);

    let written = response.changed(&secure_key).unwrap();
    assert_eq!(written.hash, treasury.hash);
    assert_eq!(
        states.wrapped(&secure_key).unwrap().unwrap().state_id,
        treasury.hash
    );

    let receipt = response.app_receipt_data.unwrap();
    assert_eq!(receipt.tx_id, "tx-a");
    assert_eq!(receipt.data["amount"], "0xde0b6b3a7640000");
    assert_eq!(receipt.data["recipient"], foundation().recipient_funds_address);

    // the same transaction cannot be replayed
    let replay = f.engine.verify(&tx, &states);
    assert!(!replay.success);
    assert_eq!(replay.reason, "Invalid nonce");
}

#[test]
fn test_skipped_nonce_rejected() {
    let f = fixture(1, 1, SecurityLevel::High);
    let states = f.states(U256::from(ONE_ETHER), 0);
    let outcome = f.engine.verify(&f.signed(ONE_ETHER, 2, 1), &states);
    assert!(!outcome.success);
    assert_eq!(outcome.reason, "Invalid nonce");
}

#[test]
fn test_amount_over_ceiling_rejected() {
    let f = fixture(1, 1, SecurityLevel::High);
    let states = f.states(U256::from(ONE_ETHER), 0);
    let outcome = f.engine.verify(&f.signed(ONE_ETHER + 1, 1, 1), &states);
    assert!(!outcome.success);
    assert_eq!(outcome.reason, "Transfer amount exceeds allowed limit");
}

#[test]
fn test_genesis_ceiling_blocks_every_transfer() {
    let f = fixture(1, 1, SecurityLevel::High);
    let mut states = InMemoryWrappedStates::new();
    f.engine.genesis(&[]).unwrap().seed(&mut states).unwrap();
    let (_, recipient_key, _) = f.keys();
    states
        .put_account(
            recipient_key,
            Account::Evm(EvmAccount::new("0x22", EvmAccountInfo::default())),
        )
        .unwrap();

    let outcome = f.engine.verify(&f.signed(1, 1, 1), &states);
    assert_eq!(outcome.reason, "Transfer amount exceeds allowed limit");
}

#[test]
fn test_time_lock_opens_at_boundary() {
    let f = fixture(1, 1, SecurityLevel::High);
    let states = f.states(U256::from(ONE_ETHER), NOW_MS + 1);
    let tx = f.signed(1, 1, 1);

    let outcome = f.engine.verify(&tx, &states);
    assert_eq!(outcome.reason, "Transfer not allowed yet, time restriction");

    f.clock.advance(1);
    assert!(f.engine.verify(&tx, &states).success);
}

#[test]
fn test_whole_balance_can_be_moved_but_no_more() {
    let f = fixture(1, 1, SecurityLevel::High);
    let states = f.states(U256::from(10 * ONE_ETHER), 0);

    assert!(f.engine.verify(&f.signed(2 * ONE_ETHER, 1, 1), &states).success);
    let outcome = f.engine.verify(&f.signed(2 * ONE_ETHER + 1, 1, 1), &states);
    assert_eq!(outcome.reason, "Insufficient balance in source account");
}

// =============================================================================
// CRACK
// =============================================================================

#[test]
fn test_crack_is_deterministic_and_disjoint() {
    let f = fixture(1, 1, SecurityLevel::High);
    let (source_key, recipient_key, secure_key) = f.keys();
    let tx = f.signed(1, 1, 1);

    let first = f.engine.crack(&tx).unwrap();
    let second = f.engine.crack(&tx).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.source_keys, vec![source_key, secure_key]);
    assert_eq!(first.target_keys, vec![recipient_key]);
    assert!(first
        .source_keys
        .iter()
        .all(|k| !first.target_keys.contains(k)));

    // crack does not depend on signatures or amount
    let unsigned = TransferFromSecureAccountTx::new("5", "Foundation", 9);
    assert_eq!(f.engine.crack(&unsigned).unwrap(), first);

    let unknown = TransferFromSecureAccountTx::new("5", "Nobody", 1);
    assert!(f.engine.crack(&unknown).is_err());
}

// =============================================================================
// ATOMICITY
// =============================================================================

#[test]
fn test_failed_write_leaves_state_untouched() {
    let f = fixture(1, 1, SecurityLevel::High);
    let (source_key, recipient_key, secure_key) = f.keys();
    let tx = f.signed(ONE_ETHER, 1, 1);

    for fail_on in 1..=3 {
        let seeded = f.states(U256::from(ONE_ETHER), 0);
        let mut states = FailingState {
            inner: seeded.clone(),
            puts: 0,
            fail_on,
        };
        let mut response = ApplyResponse::new("tx-f", NOW_MS);

        let err = f
            .engine
            .apply(&tx, "tx-f", NOW_MS, &mut states, &mut response)
            .unwrap_err();
        assert!(matches!(err, ApplyError::State(StateError::WriteFailed(_))));

        for key in [&source_key, &recipient_key, &secure_key] {
            assert_eq!(states.inner.get_account(key), seeded.get_account(key));
        }
        assert_eq!(states.inner.depth(), 0);
        assert!(response.account_writes.is_empty());
        assert!(response.app_receipt_data.is_none());
    }
}

#[test]
fn test_apply_without_secure_account_is_fatal() {
    let f = fixture(1, 1, SecurityLevel::High);
    let (_, _, secure_key) = f.keys();
    let mut states = f.states(U256::from(ONE_ETHER), 0);
    let source = states.get_account(&f.keys().0).unwrap();
    states.put_account(secure_key, source).unwrap();

    let err = f
        .engine
        .apply(
            &f.signed(1, 1, 1),
            "tx-x",
            NOW_MS,
            &mut states,
            &mut ApplyResponse::new("tx-x", NOW_MS),
        )
        .unwrap_err();
    assert!(matches!(err, ApplyError::WrongAccountType { .. }));
}

// =============================================================================
// AUTHORIZATION
// =============================================================================

#[test]
fn test_below_threshold_rejected() {
    let f = fixture(3, 3, SecurityLevel::High);
    let states = f.states(U256::from(ONE_ETHER), 0);
    let outcome = f.engine.verify(&f.signed(1, 1, 2), &states);
    assert_eq!(outcome.reason, "Invalid signatures");
    assert!(f.engine.verify(&f.signed(1, 1, 3), &states).success);
}

#[test]
fn test_medium_clearance_never_authorizes() {
    let f = fixture(1, 2, SecurityLevel::Medium);
    let outcome = f.engine.validate(&f.signed(1, 1, 1));
    assert_eq!(outcome.reason, "Invalid signatures");
}

#[test]
fn test_signature_bound_to_nonce() {
    let f = fixture(1, 1, SecurityLevel::High);
    let states = f.states(U256::from(ONE_ETHER), 0);
    let mut tx = f.signed(1, 1, 1);
    tx.nonce = 2;
    let outcome = f.engine.verify(&tx, &states);
    assert_eq!(outcome.reason, "Invalid signatures");
}

#[test]
fn test_zero_amount_rejected_before_signatures() {
    let f = fixture(1, 1, SecurityLevel::High);
    let tx = TransferFromSecureAccountTx::new("0", "Foundation", 1);
    assert_eq!(f.engine.validate(&tx).reason, "Amount is negative or zero");
}

#[test]
fn test_host_json_roundtrip_verifies() {
    let f = fixture(1, 1, SecurityLevel::High);
    let states = f.states(U256::from(ONE_ETHER), 0);
    let tx = f.signed(7, 1, 1);
    let json = serde_json::to_string(&tx).unwrap();
    assert!(json.contains("\"internalTXType\":13"));

    let parsed: TransferFromSecureAccountTx = serde_json::from_str(&json).unwrap();
    assert!(f.engine.verify(&parsed, &states).success);
}
