use crate::contract::TokenId;
use crate::mint::{MintOutcome, MintRequest, Minter};
use crate::qube::{BlakQube, FieldError, MetaQube, QubeFile};

/// Input collector for a single Qube.
///
/// Holds what the user has entered so far plus the status of the last mint:
/// whether one is in flight, the error to show, and the minted token id.
#[derive(Debug, Clone, Default)]
pub struct QubeForm {
    file: Option<QubeFile>,
    meta_qube: MetaQube,
    blak_qube: BlakQube,
    is_loading: bool,
    error: Option<String>,
    token_id: Option<TokenId>,
}

impl QubeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the file to mint and attach its preview to the BlakQube
    pub fn select_file(&mut self, file: QubeFile) {
        self.blak_qube.blob_preview = Some(file.preview());
        self.file = Some(file);
    }

    pub fn set_meta_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        self.meta_qube.set_field(name, value)
    }

    pub fn set_blak_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        self.blak_qube.set_field(name, value)
    }

    pub fn file(&self) -> Option<&QubeFile> {
        self.file.as_ref()
    }

    pub fn meta_qube(&self) -> &MetaQube {
        &self.meta_qube
    }

    pub fn blak_qube(&self) -> &BlakQube {
        &self.blak_qube
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn token_id(&self) -> Option<&TokenId> {
        self.token_id.as_ref()
    }

    /// Mirrors the enabled state of the mint button
    pub fn can_mint(&self) -> bool {
        !self.is_loading && self.file.is_some()
    }

    /// Run a mint with the current input.
    ///
    /// Ignored while another mint is marked in flight. Failures are recorded
    /// in [`QubeForm::error`] rather than returned. The loading flag is
    /// cleared however the attempt ends, including when the future is dropped.
    pub async fn mint(&mut self, minter: &Minter) -> Option<MintOutcome> {
        if self.is_loading {
            tracing::debug!("mint already in flight, ignoring");
            return None;
        }
        if self.file.is_none() {
            self.error = Some(crate::mint::MintError::NoFileSelected.to_string());
            return None;
        }

        self.error = None;

        let request = MintRequest {
            file: self.file.clone(),
            meta_qube: self.meta_qube.clone(),
            blak_qube: self.blak_qube.clone(),
        };
        let result = {
            let _loading = Loading::start(&mut self.is_loading);
            minter.mint(request).await
        };

        match result {
            Ok(outcome) => {
                self.token_id = outcome.token_id().cloned();
                Some(outcome)
            }
            Err(e) => {
                tracing::error!(stage = %e.stage(), "Error minting NFT: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

/// Holds the loading flag up until dropped
struct Loading<'a>(&'a mut bool);

impl<'a> Loading<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
