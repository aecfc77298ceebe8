use std::path::PathBuf;

use alloy::json_abi::JsonAbi;
use doge_staking_api::prelude::*;

/// Location of the contract ABI document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiSource {
    Path(PathBuf),
    Url(String),
}

impl AbiSource {
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

impl Default for AbiSource {
    fn default() -> Self {
        Self::Path(PathBuf::from(DEFAULT_ABI_PATH))
    }
}

/// Reads and validates the ABI. Every failure is reported as `AbiLoad`.
pub async fn load_abi(source: &AbiSource) -> Result<JsonAbi, StakingError> {
    let body = match source {
        AbiSource::Path(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|_| StakingError::AbiLoad)?,
        AbiSource::Url(url) => fetch(url).await.map_err(|_| StakingError::AbiLoad)?,
    };
    parse_abi(&body)
}

async fn fetch(url: &str) -> Result<String, reqwest::Error> {
    reqwest::Client::new()
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn bundled() -> AbiSource {
        AbiSource::Path(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../abi.json")))
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            AbiSource::parse("https://example.org/abi.json"),
            AbiSource::Url("https://example.org/abi.json".to_string())
        );
        assert_eq!(
            AbiSource::parse("public/abi.json"),
            AbiSource::Path(PathBuf::from("public/abi.json"))
        );
        assert_eq!(AbiSource::default(), AbiSource::parse("abi.json"));
    }

    #[tokio::test]
    async fn test_load_bundled_abi() {
        let abi = load_abi(&bundled()).await.unwrap();
        assert!(abi.function("calculateReward").is_some());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = AbiSource::Path(PathBuf::from("/nonexistent/abi.json"));
        assert_eq!(load_abi(&source).await.unwrap_err(), StakingError::AbiLoad);
    }

    #[tokio::test]
    async fn test_unreachable_url() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = AbiSource::parse(&format!("http://{addr}/abi.json"));
        assert_eq!(load_abi(&source).await.unwrap_err(), StakingError::AbiLoad);
    }

    #[tokio::test]
    async fn test_error_status_with_valid_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = include_str!("../../abi.json");
        let response = format!(
            "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        let source = AbiSource::parse(&format!("http://{addr}/abi.json"));
        assert_eq!(load_abi(&source).await.unwrap_err(), StakingError::AbiLoad);
    }
}
