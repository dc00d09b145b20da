use anyhow::Result;
use url::Url;

/// The base URL for viewing transaction blocks on the explorer.
pub const EXPLORER_TXBLOCK_BASE_URL: &str = "https://suiexplorer.com/txblock";

/// Returns the explorer link for a transaction digest on `network` (e.g. `testnet`).
pub fn explorer_url(base: &str, digest: &str, network: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| anyhow::anyhow!("explorer base url cannot be a base: {base}"))?
        .pop_if_empty()
        .push(digest);
    url.query_pairs_mut().append_pair("network", network);
    Ok(url)
}
