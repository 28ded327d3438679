// glyph-solid/src/fetch.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Retrieval of remote font bytes.
//!
//! A `FontCache` talks to the network only through the `Fetch` trait, so tests and embedders can
//! substitute their own transport.

use std::future::Future;

use crate::error::FetchError;

/// A completed response. Non-success statuses are still `Ok` here.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched {
    pub status: u16,
    /// The `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Fetched {
    /// Returns true for 2xx statuses.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can retrieve the bytes behind a URL.
pub trait Fetch {
    /// Issues a GET for `url`.
    ///
    /// Only failures to obtain any response at all are errors.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Fetched, FetchError>> + Send;
}

#[cfg(feature = "http")]
pub use self::http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use log::debug;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::Client;
    use std::time::Duration;

    use super::{Fetch, Fetched};
    use crate::error::FetchError;

    /// Fetches fonts over HTTP(S) with `reqwest`.
    #[derive(Clone, Debug)]
    pub struct HttpFetcher {
        client: Client,
    }

    impl HttpFetcher {
        /// How long a request may take before it is abandoned.
        pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

        pub fn new() -> Result<HttpFetcher, FetchError> {
            HttpFetcher::with_timeout(HttpFetcher::DEFAULT_TIMEOUT)
        }

        pub fn with_timeout(timeout: Duration) -> Result<HttpFetcher, FetchError> {
            let client = Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|error| FetchError::Client(error.to_string()))?;
            Ok(HttpFetcher { client })
        }
    }

    impl Fetch for HttpFetcher {
        async fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
            let network = |error: reqwest::Error| FetchError::Network {
                url: url.to_owned(),
                reason: error.to_string(),
            };

            debug!("GET {}", url);
            let response = self.client.get(url).send().await.map_err(network)?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let bytes = response.bytes().await.map_err(network)?;
            debug!("{} answered {} with {} bytes", url, status, bytes.len());

            Ok(Fetched {
                status,
                content_type,
                bytes: bytes.to_vec(),
            })
        }
    }
}
