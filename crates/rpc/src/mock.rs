//! An in-memory [`ChainReader`] for tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use jamii_types::{Address, SUI_COIN_TYPE};
use serde_json::{json, Value};

use crate::{
    BalanceRecord, ChainReader, CoinRecord, Page, RpcError, SuiObjectResponse,
    TransactionBlockResponse, TransactionBlockResponseOptions,
};

/// Builds an object response holding a Move object with `fields`.
///
/// # Panics
///
/// Panics if `id` is not a valid object id.
#[must_use]
pub fn move_object(id: &str, struct_type: &str, fields: Value) -> SuiObjectResponse {
    serde_json::from_value(json!({
        "data": {
            "objectId": id,
            "type": struct_type,
            "content": {
                "dataType": "moveObject",
                "type": struct_type,
                "hasPublicTransfer": true,
                "fields": fields
            }
        }
    }))
    .expect("valid object response")
}

/// An in-memory chain reader.
#[derive(Debug)]
pub struct MockReader {
    page_size: usize,
    failing: AtomicBool,
    objects: Mutex<HashMap<(Address, String), Vec<SuiObjectResponse>>>,
    coins: Mutex<HashMap<Address, Vec<CoinRecord>>>,
    transactions: Mutex<HashMap<String, (u32, TransactionBlockResponse)>>,
}

impl Default for MockReader {
    fn default() -> Self {
        Self {
            page_size: 50,
            failing: AtomicBool::new(false),
            objects: Mutex::default(),
            coins: Mutex::default(),
            transactions: Mutex::default(),
        }
    }
}

impl MockReader {
    /// Serve paginated responses with `page_size` items per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make every subsequent query fail with a permanent error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Store an object owned by `owner` under `struct_type`.
    pub fn insert_object(&self, owner: Address, struct_type: &str, object: SuiObjectResponse) {
        self.objects
            .lock()
            .unwrap()
            .entry((owner, struct_type.to_string()))
            .or_default()
            .push(object);
    }

    /// Store a SUI coin with `balance` MIST owned by `owner`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a valid object id.
    pub fn insert_coin(&self, owner: Address, id: &str, balance: u64) {
        let record = CoinRecord {
            coin_type: SUI_COIN_TYPE.to_string(),
            coin_object_id: id.parse().expect("valid coin id"),
            version: 1,
            digest: format!("digest-{id}"),
            balance,
        };
        self.coins.lock().unwrap().entry(owner).or_default().push(record);
    }

    /// Make `digest` known to the node after `pending_polls` lookups have reported it missing.
    pub fn insert_transaction(&self, response: TransactionBlockResponse, pending_polls: u32) {
        let digest = response.digest.clone();
        self.transactions.lock().unwrap().insert(digest, (pending_polls, response));
    }

    fn check_failing(&self) -> Result<(), RpcError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RpcError::Rpc { code: -32000, message: "mock fullnode failure".into() });
        }
        Ok(())
    }

    fn paginate<T: Clone>(&self, items: &[T], cursor: Option<Value>) -> Page<T> {
        let start = cursor.and_then(|c| c.as_u64()).unwrap_or(0) as usize;
        let end = (start + self.page_size).min(items.len());
        let data = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
        let has_next_page = end < items.len();
        Page { data, next_cursor: has_next_page.then(|| json!(end)), has_next_page }
    }
}

#[async_trait]
impl ChainReader for MockReader {
    async fn get_owned_objects(
        &self,
        owner: &Address,
        struct_type: &str,
        cursor: Option<Value>,
    ) -> Result<Page<SuiObjectResponse>, RpcError> {
        self.check_failing()?;
        let objects = self.objects.lock().unwrap();
        let items = objects.get(&(*owner, struct_type.to_string())).cloned().unwrap_or_default();
        Ok(self.paginate(&items, cursor))
    }

    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &str,
        cursor: Option<Value>,
    ) -> Result<Page<CoinRecord>, RpcError> {
        self.check_failing()?;
        let coins = self.coins.lock().unwrap();
        let items: Vec<CoinRecord> = coins
            .get(owner)
            .map(|coins| coins.iter().filter(|c| c.coin_type == coin_type).cloned().collect())
            .unwrap_or_default();
        Ok(self.paginate(&items, cursor))
    }

    async fn get_balance(
        &self,
        owner: &Address,
        coin_type: &str,
    ) -> Result<BalanceRecord, RpcError> {
        self.check_failing()?;
        let coins = self.coins.lock().unwrap();
        let matching: Vec<&CoinRecord> = coins
            .get(owner)
            .map(|coins| coins.iter().filter(|c| c.coin_type == coin_type).collect())
            .unwrap_or_default();
        Ok(BalanceRecord {
            coin_type: coin_type.to_string(),
            coin_object_count: matching.len() as u64,
            total_balance: matching.iter().map(|c| c.balance).sum(),
        })
    }

    async fn get_transaction_block(
        &self,
        digest: &str,
        _options: TransactionBlockResponseOptions,
    ) -> Result<TransactionBlockResponse, RpcError> {
        self.check_failing()?;
        let mut transactions = self.transactions.lock().unwrap();
        match transactions.get_mut(digest) {
            Some((0, response)) => Ok(response.clone()),
            Some((pending, _)) => {
                *pending -= 1;
                Err(not_found(digest))
            }
            None => Err(not_found(digest)),
        }
    }
}

fn not_found(digest: &str) -> RpcError {
    RpcError::Rpc {
        code: -32602,
        message: format!("Could not find the referenced transaction [TransactionDigest({digest})]"),
    }
}
