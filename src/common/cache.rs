// src/common/cache.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::models::asset::Asset;

/// Cache de leitura dos bens por ID.
/// Qualquer escrita em bens invalida o cache inteiro (inclusive as feitas
/// pelos fluxos de manutenção e baixa).
///
/// Cada invalidação avança a geração. Um leitor anota a geração antes de abrir
/// a unidade de trabalho e só publica o registro lido se nenhuma escrita tiver
/// sido confirmada nesse intervalo.
#[derive(Clone)]
pub struct AssetCache {
    inner: Cache<Uuid, Asset>,
    generation: Arc<AtomicU64>,
}

impl AssetCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self {
            inner,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<Asset> {
        self.inner.get(id)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Publica `asset` se a geração ainda for `seen`.
    pub fn put_if_current(&self, asset: &Asset, seen: u64) {
        if self.generation() != seen {
            return;
        }
        self.inner.insert(asset.id, asset.clone());
        // Uma invalidação entre a checagem e o insert não enxergou esta entrada
        if self.generation() != seen {
            self.inner.invalidate(&asset.id);
        }
    }

    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.invalidate_all();
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("entries", &self.inner.entry_count())
            .field("generation", &self.generation())
            .finish()
    }
}
