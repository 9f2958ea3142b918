use super::cache::TileCache;
use super::source::TileSource;
use crate::core::geo::TileCoord;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::sync::mpsc::Sender;
use std::thread;

/// Shared blocking HTTP client with a custom User-Agent so that public tile
/// servers (e.g. OpenStreetMap) don't reject the request. Building the client
/// once avoids the cost of TLS and connection pool setup for every tile.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("geoscope/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build reqwest blocking client")
});

/// Fetches tiles on detached threads and delivers the resulting bytes over an
/// `mpsc` channel, so completions arrive as discrete messages on whatever
/// thread drains the receiver. Completed downloads land in the shared cache
/// before delivery; repeat requests are answered from it without touching the
/// network.
pub struct TileLoader {
    tx: Sender<(TileCoord, Vec<u8>)>,
    cache: TileCache,
    max_attempts: usize,
}

impl TileLoader {
    /// Create a new tile loader given a sender to report completed downloads
    /// and a cache shared with the host.
    pub fn new(tx: Sender<(TileCoord, Vec<u8>)>, cache: TileCache) -> Self {
        Self {
            tx,
            cache,
            max_attempts: 2,
        }
    }

    /// Requests a tile. Cache hits are delivered immediately on the calling
    /// thread; misses are fetched on a detached thread and delivered when the
    /// download finishes (successfully fetched tiles only).
    pub fn request(&self, source: &dyn TileSource, coord: TileCoord) {
        if let Some(data) = self.cache.get(&coord) {
            let _ = self.tx.send((coord, data.as_ref().clone()));
            return;
        }

        let url = source.url(coord);
        let tx = self.tx.clone();
        let cache = self.cache.clone();
        let max_attempts = self.max_attempts;

        thread::spawn(move || {
            for attempt in 1..=max_attempts {
                log::debug!("fetch tile {:?} attempt {}", coord, attempt);
                let result: Result<Vec<u8>> = (|| {
                    let resp = HTTP_CLIENT.get(&url).send()?;
                    if !resp.status().is_success() {
                        return Err(Error::TileFetch(format!("HTTP {}", resp.status())));
                    }
                    let bytes = resp.bytes()?;
                    Ok(bytes.to_vec())
                })();

                match result {
                    Ok(data) => {
                        log::debug!("downloaded tile {:?} ({} bytes)", coord, data.len());
                        cache.insert(coord, data.clone());
                        let _ = tx.send((coord, data));
                        return;
                    }
                    Err(e) => {
                        log::warn!(
                            "tile {:?} download failed on attempt {}: {}",
                            coord,
                            attempt,
                            e
                        );
                        if attempt == max_attempts {
                            log::error!("giving up on tile {:?}", coord);
                        } else {
                            thread::sleep(std::time::Duration::from_millis(100));
                        }
                    }
                }
            }
        });
    }
}
