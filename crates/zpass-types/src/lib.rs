//! Shared data types for the zPass SDK workspace.
//!
//! This crate holds the plain-data surface exchanged between the SDK, the
//! network client, and engine implementations: the network tag, request and
//! response structs, and the ledger transaction JSON model.

pub mod network;
pub mod requests;
pub mod transaction;

pub use network::NetworkId;
pub use requests::{
    HashAlgorithm, KeyPair, OffChainExecution, OfflineQuery, OnChainOptions, OnChainVerification,
    ProveOffChainOptions, SignCredentialOptions, SignedCredential, VerifyOffChainOptions, VerifyOnChainOptions,
};
pub use transaction::{AuthorizedTransaction, Execution, OutputJson, TransactionResponse, Transition};
