//! SQLite persistence for player accounts.
//!
//! RULE: Only store.rs talks to the database.
//! The table and runner go through WalletStore / PlayerWallet and never
//! execute SQL directly.

use crate::{
    error::{WheelError, WheelResult},
    types::{Cents, PlayerId},
    wallet::BalanceStore,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub balance: Cents,
    pub created_at: String,
}

impl PlayerRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            player_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            balance: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

pub struct WalletStore {
    conn: Connection,
}

impl WalletStore {
    /// Open (or create) the wallet database at `path`.
    pub fn open(path: &str) -> WheelResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> WheelResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> WheelResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_wallet.sql"))?;
        Ok(())
    }

    // ── Players ────────────────────────────────────────────────

    /// Register a new player and credit the welcome bonus.
    pub fn register_player(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        welcome_bonus: Cents,
    ) -> WheelResult<PlayerId> {
        let email = email.trim().to_lowercase();
        if self.find_by_email(&email)?.is_some() {
            return Err(WheelError::DuplicateRegistration { email });
        }
        let player_id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO player (player_id, name, email, phone, balance, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![player_id, name.trim(), email, phone.trim(), welcome_bonus.max(0), created_at],
        )?;
        log::info!("registered player {player_id} with welcome bonus {welcome_bonus}");
        Ok(player_id)
    }

    pub fn find_by_email(&self, email: &str) -> WheelResult<Option<PlayerRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT player_id, name, email, phone, balance, created_at
                 FROM player WHERE email = ?1",
                params![email.trim().to_lowercase()],
                PlayerRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn player(&self, player_id: &str) -> WheelResult<Option<PlayerRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT player_id, name, email, phone, balance, created_at
                 FROM player WHERE player_id = ?1",
                params![player_id],
                PlayerRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn player_count(&self) -> WheelResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM player", [], |r| r.get(0))?;
        Ok(n)
    }

    // ── Balances ───────────────────────────────────────────────

    pub fn balance(&self, player_id: &str) -> WheelResult<Cents> {
        self.conn
            .query_row(
                "SELECT balance FROM player WHERE player_id = ?1",
                params![player_id],
                |r| r.get(0),
            )
            .optional()?
            .ok_or_else(|| WheelError::PlayerNotFound { player_id: player_id.to_string() })
    }

    /// Demo top-up. Returns the new balance.
    pub fn deposit(&self, player_id: &str, amount: Cents) -> WheelResult<Cents> {
        self.credit(player_id, amount)?;
        log::info!("deposit of {amount} for player {player_id}");
        self.balance(player_id)
    }

    pub fn credit(&self, player_id: &str, amount: Cents) -> WheelResult<()> {
        let updated = self.conn.execute(
            "UPDATE player SET balance = balance + ?2 WHERE player_id = ?1",
            params![player_id, amount.max(0)],
        )?;
        if updated == 0 {
            return Err(WheelError::PlayerNotFound { player_id: player_id.to_string() });
        }
        Ok(())
    }

    /// Remove up to `amount`, flooring the balance at zero.
    /// Returns the amount actually removed.
    pub fn debit_clamped(&self, player_id: &str, amount: Cents) -> WheelResult<Cents> {
        let tx = self.conn.unchecked_transaction()?;
        let before: Option<Cents> = tx
            .query_row(
                "SELECT balance FROM player WHERE player_id = ?1",
                params![player_id],
                |r| r.get(0),
            )
            .optional()?;
        let before = before
            .ok_or_else(|| WheelError::PlayerNotFound { player_id: player_id.to_string() })?;
        let removed = amount.clamp(0, before);
        tx.execute(
            "UPDATE player SET balance = ?2 WHERE player_id = ?1",
            params![player_id, before - removed],
        )?;
        tx.commit()?;
        Ok(removed)
    }
}

/// One player's balance as a BalanceStore.
pub struct PlayerWallet<'s> {
    store: &'s WalletStore,
    player_id: PlayerId,
}

impl<'s> PlayerWallet<'s> {
    /// Bind a wallet to an existing player.
    pub fn open(store: &'s WalletStore, player_id: &str) -> WheelResult<Self> {
        if store.player(player_id)?.is_none() {
            return Err(WheelError::PlayerNotFound { player_id: player_id.to_string() });
        }
        Ok(Self { store, player_id: player_id.to_string() })
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }
}

impl BalanceStore for PlayerWallet<'_> {
    fn current_balance(&self) -> WheelResult<Cents> {
        self.store.balance(&self.player_id)
    }

    fn debit(&mut self, amount: Cents) -> WheelResult<Cents> {
        self.store.debit_clamped(&self.player_id, amount)
    }

    fn credit(&mut self, amount: Cents) -> WheelResult<()> {
        self.store.credit(&self.player_id, amount)
    }
}
