//! Static network and market configuration.
//!
//! The market is deployed once and identified by fixed addresses, so the whole
//! configuration is a `const`. The only runtime input is the signing key, read
//! from the environment by [`signer_from_env`].

use std::{env, str::FromStr};

use alloy::{
    primitives::{Address, TxHash, U256, address, b256},
    signers::local::PrivateKeySigner,
};
use url::Url;

use crate::{
    error::{Error, Result},
    giwa::morpho::{MarketId, contracts::MarketParams},
};

/// Environment variable holding the hex encoded signing key.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Chain, contract addresses and market parameters of a deployment.
#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Human readable chain name
    pub name: &'static str,
    /// Default HTTP RPC endpoint
    pub rpc_url: &'static str,
    /// Block explorer base URL
    pub explorer_url: &'static str,
    /// Morpho contract
    pub morpho: Address,
    /// Loan token (UPETH)
    pub loan_token: Address,
    /// Collateral token (UPKRW)
    pub collateral_token: Address,
    /// Price oracle
    pub oracle: Address,
    /// Interest rate model
    pub irm: Address,
    /// Liquidation loan-to-value, WAD scaled
    pub lltv: U256,
    /// keccak256 of the ABI encoded market params
    pub market_id: MarketId,
}

/// UPKRW/UPETH market on Giwa Sepolia.
pub const GIWA_SEPOLIA: NetworkConfig = NetworkConfig {
    chain_id: 91342,
    name: "Giwa Sepolia",
    rpc_url: "https://sepolia-rpc.giwa.io",
    explorer_url: "https://sepolia-explorer.giwa.io",
    morpho: address!("0xf31D0A92Ab90096a5d895666B5dEDA3639d185B2"),
    loan_token: address!("0xc05bAe1723bd929306B0ab8125062Efc111fb338"),
    collateral_token: address!("0x159C54accF62C14C117474B67D2E3De8215F5A72"),
    oracle: address!("0x258d90F00eEd27c69514A934379Aa41Cc03ea875"),
    irm: address!("0xA99676204e008B511dA8662F9bE99e2bfA5afd63"),
    // 92%
    lltv: U256::from_limbs([920_000_000_000_000_000, 0, 0, 0]),
    market_id: b256!("0x5fdc9fa54b964034b39b1b36ec4b8b009bbf1448cdc951cbb05f647c42d9149f"),
};

impl NetworkConfig {
    /// Market parameters passed to every Morpho write.
    #[must_use]
    pub fn market_params(&self) -> MarketParams {
        MarketParams {
            loanToken: self.loan_token,
            collateralToken: self.collateral_token,
            oracle: self.oracle,
            irm: self.irm,
            lltv: self.lltv,
        }
    }

    /// Parsed RPC endpoint.
    pub fn rpc_url(&self) -> Result<Url> {
        Ok(Url::parse(self.rpc_url)?)
    }

    /// Explorer link for a transaction.
    pub fn tx_url(&self, tx_hash: TxHash) -> Result<Url> {
        Ok(Url::parse(self.explorer_url)?.join(&format!("tx/{tx_hash}"))?)
    }
}

/// Loads the signer from the `PRIVATE_KEY` environment variable.
///
/// Fails with [`Error::Config`] before anything touches the network when the
/// variable is unset or not a valid key.
pub fn signer_from_env() -> Result<PrivateKeySigner> {
    match env::var(PRIVATE_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => signer_from_key(&key),
        _ => Err(Error::Config(format!(
            "{PRIVATE_KEY_ENV} environment variable not set"
        ))),
    }
}

/// Parses a hex encoded private key.
///
/// The key itself never ends up in the error message.
pub fn signer_from_key(key: &str) -> Result<PrivateKeySigner> {
    PrivateKeySigner::from_str(key.trim())
        .map_err(|_| Error::Config("private key is not a valid secp256k1 key".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_id_matches_params() {
        let params = GIWA_SEPOLIA.market_params();
        assert_eq!(params.id(), GIWA_SEPOLIA.market_id);
    }

    #[test]
    fn test_market_params() {
        let params = GIWA_SEPOLIA.market_params();
        assert_eq!(params.loanToken, GIWA_SEPOLIA.loan_token);
        assert_eq!(params.collateralToken, GIWA_SEPOLIA.collateral_token);
        assert_eq!(params.lltv, U256::from(920_000_000_000_000_000u64));
    }

    #[test]
    fn test_tx_url() {
        let url = GIWA_SEPOLIA.tx_url(TxHash::ZERO).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sepolia-explorer.giwa.io/tx/0x0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(GIWA_SEPOLIA.rpc_url().unwrap().host_str(), Some("sepolia-rpc.giwa.io"));
    }

    #[test]
    fn test_signer_from_key() {
        let signer =
            signer_from_key("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80\n")
                .unwrap();
        assert_eq!(
            signer.address(),
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );

        let err = signer_from_key("0xBORROWER_ADDRESS_HERE").unwrap_err();
        assert!(err.is_config());
        assert!(!err.to_string().contains("BORROWER"));
    }
}
