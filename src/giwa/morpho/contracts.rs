use alloy::sol;

sol! {
    type Id is bytes32;

    #[derive(Debug)]
    struct Market {
        uint128 totalSupplyAssets;
        uint128 totalSupplyShares;
        uint128 totalBorrowAssets;
        uint128 totalBorrowShares;
        uint128 lastUpdate;
        uint128 fee;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MarketParams {
        address loanToken;
        address collateralToken;
        address oracle;
        address irm;
        uint256 lltv;
    }

    #[sol(rpc)]
    interface IMorpho {
        // ========= views =========
        function market(Id market) external view returns (Market);
        function idToMarketParams(Id market) external view returns (MarketParams);
        function position(Id id, address user)
            external
            view
            returns (uint256 supplyShares, uint128 borrowShares, uint128 collateral);

        // ========= writes =========
        function supply(
            MarketParams memory marketParams,
            uint256 assets,
            uint256 shares,
            address onBehalf,
            bytes memory data
        ) external returns (uint256 assetsSupplied, uint256 sharesSupplied);
        function supplyCollateral(
            MarketParams memory marketParams,
            uint256 assets,
            address onBehalf,
            bytes memory data
        ) external;
        function borrow(
            MarketParams memory marketParams,
            uint256 assets,
            uint256 shares,
            address onBehalf,
            address receiver
        ) external returns (uint256 assetsBorrowed, uint256 sharesBorrowed);
        function repay(
            MarketParams memory marketParams,
            uint256 assets,
            uint256 shares,
            address onBehalf,
            bytes memory data
        ) external returns (uint256 assetsRepaid, uint256 sharesRepaid);
        function customLiquidate(
            MarketParams memory marketParams,
            address borrower,
            uint256 seizedAssets,
            uint256 repaidShares,
            bytes memory data
        ) external returns (uint256 seized, uint256 repaid);
    }

    /// Oracle of the UPKRW/UPETH market.
    #[sol(rpc)]
    interface IOracle {
        /// Collateral units per loan unit, scaled by 1e36.
        function price() external view returns (uint256);
        /// Kimchi premium, scaled by 1e18.
        function kimchiPremium() external view returns (uint256);
        /// Custom metric, scaled by 1e18.
        function customMetric() external view returns (uint256);
    }
}
