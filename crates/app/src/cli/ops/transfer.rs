use clap::Args;

use common::transfer::{Chain, TransferError, TransferRequest};

#[derive(Args, Debug, Clone)]
pub struct Transfer {
    /// Source chain (Amoy or Avalanche)
    #[arg(long, default_value = "Amoy")]
    pub from: Chain,

    /// Destination chain (Amoy or Avalanche)
    #[arg(long, default_value = "Avalanche")]
    pub to: Chain,

    /// Token to move
    #[arg(long)]
    pub token_id: String,

    /// Destination address (defaults to the current owner)
    #[arg(long)]
    pub dest: Option<String>,

    /// Exchange --from and --to
    #[arg(long)]
    pub swap: bool,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Transfer {
    type Error = TransferError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut request = TransferRequest {
            from: self.from,
            to: self.to,
            token_id: self.token_id.clone(),
            destination: self.dest.clone(),
        };
        if self.swap {
            request.swap();
        }

        request.execute()?;
        Ok(format!(
            "Transferred token {} from {} to {}",
            request.token_id, request.from, request.to
        ))
    }
}
