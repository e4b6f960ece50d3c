//! Per-weekday memoization of resolved grids.
//!
//! Writes invalidate the affected weekday; roster, catalog and time grid
//! edits clear everything since they feed every weekday's resolution.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::{ScheduleGrid, Weekday};

/// In-memory cache of resolved schedule grids.
#[derive(Default)]
pub struct GridCache {
    inner: RwLock<HashMap<Weekday, ScheduleGrid>>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached grid for a weekday, if still valid.
    pub async fn get(&self, weekday: Weekday) -> Option<ScheduleGrid> {
        self.inner.read().await.get(&weekday).cloned()
    }

    /// Store a freshly resolved grid.
    pub async fn put(&self, weekday: Weekday, grid: ScheduleGrid) {
        self.inner.write().await.insert(weekday, grid);
    }

    /// Drop the cached grid for one weekday.
    pub async fn invalidate(&self, weekday: Weekday) {
        if self.inner.write().await.remove(&weekday).is_some() {
            tracing::debug!("Invalidated cached grid for {}", weekday);
        }
    }

    /// Drop every cached grid.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_grid(weekday: Weekday) -> ScheduleGrid {
        ScheduleGrid {
            weekday,
            professionals: Vec::new(),
            rows: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_put_get_invalidate() {
        let cache = GridCache::new();
        assert!(cache.get(Weekday::Segunda).await.is_none());

        cache.put(Weekday::Segunda, empty_grid(Weekday::Segunda)).await;
        cache.put(Weekday::Terca, empty_grid(Weekday::Terca)).await;
        assert!(cache.get(Weekday::Segunda).await.is_some());

        cache.invalidate(Weekday::Segunda).await;
        assert!(cache.get(Weekday::Segunda).await.is_none());
        // Other weekdays are untouched
        assert!(cache.get(Weekday::Terca).await.is_some());

        cache.clear().await;
        assert!(cache.get(Weekday::Terca).await.is_none());
    }
}
