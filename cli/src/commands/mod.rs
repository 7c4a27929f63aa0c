//! CLI Commands

mod campaigns;
mod context;
mod create;
mod devnet;
mod donate;
mod init;
mod seed;
mod status;

pub use campaigns::CampaignsCommand;
pub use create::CreateCommand;
pub use devnet::DevnetCommand;
pub use donate::DonateCommand;
pub use init::InitCommand;
pub use seed::SeedCommand;
pub use status::StatusCommand;
