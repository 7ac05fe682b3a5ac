use blake3::Hasher;
use koncept_parser::{parse_sales_csv, TextEncoding};
use tracing::info;

use crate::clients::ClientMap;
use crate::error::{KonceptError, Result};
use crate::normalize::{normalize_sales, SalesFrame};

/// A sales file that parsed and normalized cleanly.
#[derive(Debug, Clone)]
pub struct LoadedSales {
    pub source: String,
    /// blake3 hex digest of the uploaded bytes.
    pub revision: String,
    pub encoding: TextEncoding,
    pub frame: SalesFrame,
}

/// Parses and normalizes one upload without touching any session.
pub fn ingest_sales(source: &str, contents: &[u8], clients: &ClientMap) -> Result<LoadedSales> {
    let revision = compute_hash(contents);
    let raw = parse_sales_csv(contents)?;
    let frame = normalize_sales(&raw.df, clients)?;

    info!(
        source,
        revision = %revision,
        encoding = %raw.encoding,
        rows = frame.height(),
        "sales file loaded"
    );

    Ok(LoadedSales {
        source: source.to_string(),
        revision,
        encoding: raw.encoding,
        frame,
    })
}

/// The one sales table a user is working with.
#[derive(Debug, Clone, Default)]
pub struct Session {
    clients: ClientMap,
    loaded: Option<LoadedSales>,
}

impl Session {
    pub fn new(clients: ClientMap) -> Self {
        Self {
            clients,
            loaded: None,
        }
    }

    pub fn clients(&self) -> &ClientMap {
        &self.clients
    }

    /// Replaces the loaded table. A failed upload leaves the previous table in place.
    pub fn upload(&mut self, source: &str, contents: &[u8]) -> Result<&LoadedSales> {
        let loaded = ingest_sales(source, contents, &self.clients)?;
        Ok(self.loaded.insert(loaded))
    }

    pub fn loaded(&self) -> Option<&LoadedSales> {
        self.loaded.as_ref()
    }

    pub fn revision(&self) -> Option<&str> {
        self.loaded.as_ref().map(|loaded| loaded.revision.as_str())
    }

    pub fn sales(&self) -> Result<&SalesFrame> {
        self.loaded
            .as_ref()
            .map(|loaded| &loaded.frame)
            .ok_or(KonceptError::NoData)
    }

    pub fn clear(&mut self) {
        self.loaded = None;
    }
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}
