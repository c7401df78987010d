use thiserror::Error;

use crate::types::{Cents, PlayerId};

#[derive(Error, Debug)]
pub enum WheelError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid odds table for ring '{ring}': {reason}")]
    InvalidOddsTable { ring: String, reason: String },

    #[error("Invalid multiplier label '{label}'")]
    InvalidLabel { label: String },

    #[error("Invalid motion for ring '{ring}': {reason}")]
    InvalidMotion { ring: String, reason: String },

    #[error("Stake must be positive, got {stake}")]
    InvalidStake { stake: Cents },

    #[error("Insufficient balance: stake {stake}, balance {balance}")]
    InsufficientBalance { stake: Cents, balance: Cents },

    #[error("A spin is already in progress")]
    SpinInProgress,

    #[error("Player '{player_id}' not found")]
    PlayerNotFound { player_id: PlayerId },

    #[error("A player is already registered with email '{email}'")]
    DuplicateRegistration { email: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type WheelResult<T> = Result<T, WheelError>;
