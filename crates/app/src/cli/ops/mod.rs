pub mod init;
pub mod mint;
pub mod transfer;
pub mod version;

pub use init::Init;
pub use mint::Mint;
pub use transfer::Transfer;
pub use version::Version;
