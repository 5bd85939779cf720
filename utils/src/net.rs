//! Safe display helpers for network endpoints.

/// Mask the API key portion of an RPC URL for logging.
///
/// Handles the common provider shapes: `/v2/KEY`, `/v3/KEY`, `apikey=KEY`
/// and `key=KEY`. Unknown shapes pass through truncated.
pub fn mask_rpc_url(url: &str) -> String {
    let mut masked = url.to_string();

    for marker in ["/v2/", "/v3/"] {
        if let Some(pos) = masked.find(marker) {
            let key_start = pos + marker.len();
            let key_end = masked[key_start..]
                .find(['/', '?', '&'])
                .map(|i| key_start + i)
                .unwrap_or(masked.len());
            if key_end - key_start >= 8 {
                masked.replace_range(key_start..key_end, "***");
            }
        }
    }

    for marker in ["apikey=", "key="] {
        if let Some(pos) = masked.to_lowercase().find(marker) {
            let key_start = pos + marker.len();
            let key_end = masked[key_start..]
                .find('&')
                .map(|i| key_start + i)
                .unwrap_or(masked.len());
            if key_end - key_start >= 8 {
                masked.replace_range(key_start..key_end, "***");
            }
        }
    }

    if masked.len() > 60 {
        format!("{}...", &masked[..60])
    } else {
        masked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_provider_path_key() {
        let url = "https://eth-sepolia.g.alchemy.com/v2/abcdef1234567890";
        assert_eq!(
            mask_rpc_url(url),
            "https://eth-sepolia.g.alchemy.com/v2/***"
        );
    }

    #[test]
    fn masks_query_key() {
        let url = "https://rpc.example.org/?apikey=abcdef1234567890";
        assert_eq!(mask_rpc_url(url), "https://rpc.example.org/?apikey=***");
    }

    #[test]
    fn short_keys_left_alone() {
        let url = "https://rpc.example.org/v2/short";
        assert_eq!(mask_rpc_url(url), url);
    }

    #[test]
    fn plain_urls_pass_through() {
        let url = "http://127.0.0.1:8545";
        assert_eq!(mask_rpc_url(url), url);
    }
}
