//! Wallet integration for deposit signing.
//!
//! The donor CLI never holds keys. [`WalletCommandSigner`] hands the
//! invocation to a user-configured external signing helper, the CLI analogue
//! of a wallet popup: the helper shows the request to the user, signs on
//! approval, and prints the base64 transaction envelope to stdout.

use std::process::Command;

use crate::chain::DepositSigner;
use crate::errors::ChainError;

/// Signs deposits by running `<command> deposit <contract_id> <donor> <stroops>`.
pub struct WalletCommandSigner {
    command: String,
}

impl WalletCommandSigner {
    pub fn new(command: String) -> Self {
        Self { command }
    }
}

impl DepositSigner for WalletCommandSigner {
    fn sign_deposit(
        &self,
        contract_id: &str,
        donor: &str,
        amount: i128,
    ) -> Result<String, ChainError> {
        let output = Command::new(&self.command)
            .arg("deposit")
            .arg(contract_id)
            .arg(donor)
            .arg(amount.to_string())
            .output()
            .map_err(|e| ChainError::Signing(format!("wallet command failed to start: {e}")))?;

        if !output.status.success() {
            return Err(ChainError::Signing(format!(
                "wallet command exited with {}",
                output.status
            )));
        }

        let envelope = String::from_utf8(output.stdout)
            .map_err(|_| ChainError::Signing("wallet output was not UTF-8".to_string()))?
            .trim()
            .to_string();

        if envelope.is_empty() {
            return Err(ChainError::Signing(
                "wallet returned an empty envelope".to_string(),
            ));
        }
        Ok(envelope)
    }
}

/// Placeholder used when no wallet command is configured; read-only
/// subcommands never touch it, and a donation attempt fails up front with a
/// clear message instead of a missing-binary error.
pub struct UnconfiguredSigner;

impl DepositSigner for UnconfiguredSigner {
    fn sign_deposit(&self, _: &str, _: &str, _: i128) -> Result<String, ChainError> {
        Err(ChainError::Signing(
            "no wallet configured; set WALLET_SIGN_CMD".to_string(),
        ))
    }
}
