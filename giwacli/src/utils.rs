//! Signer and client helpers shared by the commands.

use std::env::home_dir;
use std::path::PathBuf;

use anyhow::Context;
use giwasdk::{
    PrivateKeySigner, config,
    giwa::{DynProvider, morpho},
};

use crate::{RpcArgs, SignerArgs};

/// Get the default keystore directory path (~/.foundry/keystores).
pub fn keystore_dir() -> anyhow::Result<PathBuf> {
    let home = home_dir().ok_or_else(|| anyhow::anyhow!("Unable to locate home directory"))?;
    Ok(home.join(".foundry").join("keystores"))
}

/// Finds and loads the signer.
///
/// Attempts to load a signer in the following priority order:
/// 1. Private key (`--private-key` or `PRIVATE_KEY`)
/// 2. Foundry keystore (`--keystore`), prompting for the password if needed
///
/// # Errors
///
/// Returns an error if:
/// - Private key is invalid
/// - Keystore file not found or password incorrect
/// - No private key or keystore provided
pub fn find_signer(cmd: &SignerArgs) -> anyhow::Result<PrivateKeySigner> {
    if let Some(key) = cmd.private_key.as_ref() {
        Ok(config::signer_from_key(key)?)
    } else if let Some(filename) = cmd.keystore.as_ref() {
        let keypath = keystore_dir()?.join(filename);
        anyhow::ensure!(keypath.exists(), "keystore {filename} doesn't exist");
        let password = match cmd.password.clone() {
            Some(password) => password,
            None => rpassword::prompt_password(format!("{} password: ", keypath.display()))
                .context("keystores require a password!")?,
        };
        PrivateKeySigner::decrypt_keystore(keypath, password).context("decrypt_keystore")
    } else {
        Err(anyhow::anyhow!(
            "This operation requires a private key ({}) or keystore",
            config::PRIVATE_KEY_ENV
        ))
    }
}

/// Read-only client.
pub async fn read_client(rpc: &RpcArgs) -> anyhow::Result<morpho::Client<DynProvider>> {
    Ok(morpho::Client::sepolia_with_url(&rpc.rpc_url).await?)
}

/// Client that signs with the configured signer.
pub async fn signing_client(cmd: &SignerArgs) -> anyhow::Result<morpho::Client<DynProvider>> {
    let signer = find_signer(cmd)?;
    println!("Wallet address: {}", signer.address());
    Ok(morpho::Client::sepolia_with_signer_and_url(&cmd.rpc_url, signer).await?)
}
