use async_trait::async_trait;
use jamii_types::Address;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    BalanceRecord, CoinRecord, Page, RetryableRpc, RpcClient, RpcError, SuiObjectResponse,
    TransactionBlockResponse, TransactionBlockResponseOptions, MAX_PAGE_SIZE,
};

/// Read access to the chain.
///
/// [`RpcClient`] implements this against a fullnode; tests substitute an in-memory reader.
#[async_trait]
pub trait ChainReader: Send + Sync + 'static {
    /// One page of the objects of `struct_type` owned by `owner`, with type and content.
    async fn get_owned_objects(
        &self,
        owner: &Address,
        struct_type: &str,
        cursor: Option<Value>,
    ) -> Result<Page<SuiObjectResponse>, RpcError>;

    /// One page of the coins of `coin_type` owned by `owner`.
    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &str,
        cursor: Option<Value>,
    ) -> Result<Page<CoinRecord>, RpcError>;

    /// The total balance of `coin_type` held by `owner`.
    async fn get_balance(&self, owner: &Address, coin_type: &str)
        -> Result<BalanceRecord, RpcError>;

    /// A transaction block by digest. Not retried: callers waiting for confirmation poll this.
    async fn get_transaction_block(
        &self,
        digest: &str,
        options: TransactionBlockResponseOptions,
    ) -> Result<TransactionBlockResponse, RpcError>;
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn get_owned_objects(
        &self,
        owner: &Address,
        struct_type: &str,
        cursor: Option<Value>,
    ) -> Result<Page<SuiObjectResponse>, RpcError> {
        let params = json!([
            owner,
            {
                "filter": { "StructType": struct_type },
                "options": { "showType": true, "showContent": true }
            },
            cursor,
            MAX_PAGE_SIZE,
        ]);
        let page: Page<SuiObjectResponse> = self
            .with_retry(
                || async { self.call("suix_getOwnedObjects", params.clone()).await },
                "get owned objects",
            )
            .await?;
        debug!(%owner, struct_type, count = page.data.len(), "fetched owned objects");
        Ok(page)
    }

    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &str,
        cursor: Option<Value>,
    ) -> Result<Page<CoinRecord>, RpcError> {
        let params = json!([owner, coin_type, cursor, MAX_PAGE_SIZE]);
        let page: Page<CoinRecord> = self
            .with_retry(
                || async { self.call("suix_getCoins", params.clone()).await },
                "get coins",
            )
            .await?;
        debug!(%owner, coin_type, count = page.data.len(), "fetched coins");
        Ok(page)
    }

    async fn get_balance(
        &self,
        owner: &Address,
        coin_type: &str,
    ) -> Result<BalanceRecord, RpcError> {
        let params = json!([owner, coin_type]);
        let balance: BalanceRecord = self
            .with_retry(
                || async { self.call("suix_getBalance", params.clone()).await },
                "get balance",
            )
            .await?;
        debug!(%owner, coin_type, total = balance.total_balance, "fetched balance");
        Ok(balance)
    }

    async fn get_transaction_block(
        &self,
        digest: &str,
        options: TransactionBlockResponseOptions,
    ) -> Result<TransactionBlockResponse, RpcError> {
        self.call("sui_getTransactionBlock", json!([digest, options])).await
    }
}
