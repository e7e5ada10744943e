//! Giwa Sepolia interaction.
//!
//! Providers for the Giwa Sepolia RPC and the contracts of the lending market.

pub mod morpho;

use alloy::{
    network::{Ethereum, IntoWallet},
    providers::ProviderBuilder,
    sol,
    transports::TransportError,
};

use crate::config::GIWA_SEPOLIA;

/// Default Giwa Sepolia RPC.
pub const DEFAULT_RPC_URL: &str = GIWA_SEPOLIA.rpc_url;

/// Custom provider trait rename
pub trait Provider: alloy::providers::Provider<Ethereum> + Send + Clone + 'static {}
/// Type alias for the dynamic provider.
pub type DynProvider = alloy::providers::DynProvider<Ethereum>;

impl<T> Provider for T where T: alloy::providers::Provider<Ethereum> + Send + Clone + 'static {}

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// Creates a Provider for Giwa Sepolia
#[inline(always)]
pub async fn sepolia() -> Result<impl Provider, TransportError> {
    sepolia_with_url(DEFAULT_RPC_URL).await
}

/// Creates a Provider for Giwa Sepolia that signs with `signer`
#[inline(always)]
pub async fn sepolia_with_signer<S>(signer: S) -> Result<impl Provider, TransportError>
where
    S: IntoWallet<Ethereum>,
    <S as IntoWallet<Ethereum>>::NetworkWallet: Clone + 'static,
{
    sepolia_with_signer_and_url(DEFAULT_RPC_URL, signer).await
}

/// Creates a Provider with a custom url
#[inline(always)]
pub async fn sepolia_with_url(url: &str) -> Result<impl Provider, TransportError> {
    let p = ProviderBuilder::new().connect(url).await?;
    Ok(p)
}

/// Creates a Provider with a custom url and signer
#[inline(always)]
pub async fn sepolia_with_signer_and_url<S>(
    url: &str,
    signer: S,
) -> Result<impl Provider, TransportError>
where
    S: IntoWallet<Ethereum>,
    <S as IntoWallet<Ethereum>>::NetworkWallet: Clone + 'static,
{
    let provider = ProviderBuilder::new().wallet(signer).connect(url).await?;
    Ok(provider)
}
