/**
 * Contract binding and receipt model.
 *  Reads minted token ids out of ERC-721
 *  transfer logs.
 */
pub mod contract;
/**
 * Shapes exchanged with the external
 *  encryption service, and the service trait.
 */
pub mod encryption;
/**
 * Input collector: the typed state behind
 *  the mint form.
 */
pub mod form;
/**
 * Token metadata document assembled
 *  from the two Qube halves.
 */
pub mod metadata;
/**
 * The minting pipeline itself.
 */
pub mod mint;
/**
 * Content identifiers and the pinning
 *  network trait.
 */
pub mod pinning;
/**
 * MetaQube / BlakQube records and the
 *  selected file.
 */
pub mod qube;
/**
 * Token transfers between chains.
 *  Not supported yet.
 */
pub mod transfer;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::contract::{ContractError, QubeContract, Receipt, TokenId};
    pub use crate::encryption::{
        EncryptDataRequest, EncryptDataResponse, EncryptedBlakQube, EncryptedFile,
        EncryptionError, EncryptionService,
    };
    pub use crate::form::QubeForm;
    pub use crate::metadata::QubeMetadata;
    pub use crate::mint::{MintError, MintOutcome, MintRequest, MintStage, Minter};
    pub use crate::pinning::{ContentId, PinError, Pinner};
    pub use crate::qube::{BlakQube, ContentType, MetaQube, QubeFile};
    pub use crate::transfer::{Chain, TransferError, TransferRequest};
    pub use crate::version::build_info;
}
