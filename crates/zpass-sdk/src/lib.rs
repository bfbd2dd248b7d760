//! Client SDK for zero-knowledge credentials on Aleo-style networks.
//!
//! The SDK orchestrates three seams: a [`ZkEngine`] for all cryptographic
//! work, a network client for explorer access, and a bounded key cache
//! that avoids repeating expensive key synthesis. Heavy engine calls run
//! off the async runtime through [`ProverWorker`].

pub mod account;
pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod program;
pub mod sdk;
pub mod testing;
pub mod verify;

pub use account::Account;
pub use config::{SdkOptions, DEFAULT_HOST};
pub use engine::worker::ProverWorker;
pub use engine::{LocalExecution, TransactionPlan, ZkEngine};
pub use error::{Result, SdkError};
pub use sdk::{verify_on_chain, ZPassSdk};
pub use verify::{verify_off_chain_with, verify_on_chain_with};
