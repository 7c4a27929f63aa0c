//! CipherKind donation client
//!
//! User-facing flows over the encryption service and the contract gateway:
//!
//! - [`DonationFlow`] - three-step wizard that encrypts and submits a donation
//! - [`CampaignView`] - one campaign with its total decrypted when allowed
//! - [`CampaignBoard`] - every campaign plus platform counters
//! - [`CampaignComposer`] - campaign creation with an encrypted target
//!
//! Every flow takes a [`Session`] holding the shared service handles.

pub mod amount;
pub mod board;
pub mod campaign;
pub mod composer;
pub mod donation;
pub mod errors;
pub mod notify;
pub mod session;
pub mod wallet;

#[cfg(test)]
mod test_support;

pub use amount::{format_cents, Amount, PLACEHOLDER};
pub use board::{BoardState, CampaignBoard, EMPTY_MESSAGE};
pub use campaign::{progress_percent, CampaignSnapshot, CampaignView, DEFAULT_TARGET_CENTS};
pub use composer::{CampaignComposer, SEED_CAMPAIGNS};
pub use donation::{DonationFlow, DonationStep};
pub use errors::{ClientError, ClientResult, ValidationError};
pub use notify::{Notice, NoticeLevel, Notices};
pub use session::Session;
pub use wallet::{Wallet, WalletSession};
