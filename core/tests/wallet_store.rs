//! SQLite-backed player wallets.

use luxspin_core::{
    config::WheelConfig,
    error::WheelError,
    rng::SeededSource,
    store::{PlayerWallet, WalletStore},
    table::SpinTable,
    wallet::BalanceStore,
};
use std::time::Duration;

fn store() -> WalletStore {
    let store = WalletStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn registration_credits_welcome_bonus() {
    let store = store();
    let id = store
        .register_player("Ana Souza", "Ana@Example.com", "+55 11 99999-0000", 1_000)
        .unwrap();
    let player = store.player(&id).unwrap().expect("player exists");
    assert_eq!(player.balance, 1_000);
    assert_eq!(player.email, "ana@example.com");
    assert_eq!(store.find_by_email("ANA@example.com").unwrap(), Some(player));
}

#[test]
fn duplicate_email_is_rejected() {
    let store = store();
    store.register_player("A", "a@example.com", "", 1_000).unwrap();
    let err = store.register_player("B", "a@example.com", "", 1_000).unwrap_err();
    assert!(matches!(err, WheelError::DuplicateRegistration { .. }));
    assert_eq!(store.player_count().unwrap(), 1);
}

#[test]
fn deposit_and_clamped_debit() {
    let store = store();
    let id = store.register_player("C", "c@example.com", "", 0).unwrap();
    assert_eq!(store.deposit(&id, 5_000).unwrap(), 5_000);

    let mut wallet = PlayerWallet::open(&store, &id).unwrap();
    assert_eq!(wallet.debit(1_200).unwrap(), 1_200);
    assert_eq!(wallet.current_balance().unwrap(), 3_800);
    assert_eq!(wallet.debit(10_000).unwrap(), 3_800);
    assert_eq!(wallet.current_balance().unwrap(), 0);
    wallet.credit(250).unwrap();
    assert_eq!(store.balance(&id).unwrap(), 250);
}

#[test]
fn unknown_player_is_an_error() {
    let store = store();
    assert!(matches!(
        PlayerWallet::open(&store, "nobody"),
        Err(WheelError::PlayerNotFound { .. })
    ));
    assert!(matches!(store.balance("nobody"), Err(WheelError::PlayerNotFound { .. })));
    assert!(store.credit("nobody", 10).is_err());
}

#[test]
fn table_settles_into_player_wallet() {
    let store = store();
    let config = WheelConfig::canonical();
    let id = store
        .register_player("D", "d@example.com", "", config.welcome_bonus)
        .unwrap();
    let mut wallet = PlayerWallet::open(&store, &id).unwrap();
    let mut table = SpinTable::from_config(&config).unwrap();
    let mut rng = SeededSource::new(5, 0);

    let mut now = Duration::ZERO;
    for _ in 0..10 {
        let before = wallet.current_balance().unwrap();
        if before < config.default_stake {
            break;
        }
        let result = table
            .start_spin(config.default_stake, &wallet, &mut rng, now)
            .unwrap();
        now += table.reveal_delay();
        let revealed = table.poll(&mut wallet, now).unwrap().expect("revealed");
        let expected = (before + result.settlement.delta).max(0);
        assert_eq!(revealed.balance_after, expected);
        assert_eq!(store.balance(&id).unwrap(), expected);
    }
}
