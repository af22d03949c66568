//! In-memory items service with simulated network latency

use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tracing::debug;

use super::model::{
    CreateDataItem, DataItem, ItemPage, ItemStatus, ListQuery, PageMeta, Role, SortOrder,
    UpdateDataItem,
};
use crate::error::{AppError, Result};
use crate::storage::config::ItemsConfig;

/// Per-operation simulated latency
#[derive(Debug, Clone, Copy, Default)]
pub struct Latency {
    pub list: Duration,
    pub get: Duration,
    pub write: Duration,
}

impl From<&ItemsConfig> for Latency {
    fn from(config: &ItemsConfig) -> Self {
        Self {
            list: Duration::from_millis(config.list_latency_ms),
            get: Duration::from_millis(config.get_latency_ms),
            write: Duration::from_millis(config.write_latency_ms),
        }
    }
}

pub struct ItemService {
    items: Mutex<Vec<DataItem>>,
    latency: Latency,
}

impl ItemService {
    /// Service over the ten sample records
    pub fn seeded(latency: Latency) -> Self {
        Self::with_items(sample_items(), latency)
    }

    pub fn with_items(items: Vec<DataItem>, latency: Latency) -> Self {
        Self {
            items: Mutex::new(items),
            latency,
        }
    }

    async fn delay(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<DataItem>>> {
        self.items
            .lock()
            .map_err(|_| AppError::storage("items lock poisoned"))
    }

    /// Filter, sort and paginate
    pub async fn get_items(&self, query: &ListQuery) -> Result<ItemPage> {
        query.validate()?;
        Self::delay(self.latency.list).await;

        let mut filtered: Vec<DataItem> = {
            let items = self.lock()?;
            let needle = query.search.as_deref().map(str::to_lowercase);
            items
                .iter()
                .filter(|item| match &needle {
                    Some(n) => {
                        item.name.to_lowercase().contains(n)
                            || item.email.to_lowercase().contains(n)
                    }
                    None => true,
                })
                .filter(|item| query.status.map_or(true, |s| item.status == s))
                .filter(|item| query.role.map_or(true, |r| item.role == r))
                .cloned()
                .collect()
        };

        filtered.sort_by(|a, b| {
            let ord = query.sort.compare(a, b);
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total_items = filtered.len();
        let total_pages = total_items.div_ceil(query.page_size);
        let items: Vec<DataItem> = filtered
            .into_iter()
            .skip((query.page - 1).saturating_mul(query.page_size))
            .take(query.page_size)
            .collect();

        debug!(
            page = query.page,
            returned = items.len(),
            total = total_items,
            "items listed"
        );

        Ok(ItemPage {
            items,
            meta: PageMeta {
                page: query.page,
                page_size: query.page_size,
                total_items,
                total_pages,
            },
        })
    }

    pub async fn get_item(&self, id: &str) -> Result<DataItem> {
        Self::delay(self.latency.get).await;
        self.lock()?
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("item {}", id)))
    }

    pub async fn create_item(&self, create: CreateDataItem) -> Result<DataItem> {
        create.validate()?;
        Self::delay(self.latency.write).await;

        let mut items = self.lock()?;
        let next_id = items
            .iter()
            .filter_map(|item| item.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let item = DataItem {
            id: next_id.to_string(),
            name: create.name,
            email: create.email,
            status: create.status,
            role: create.role,
            created_at: Utc::now(),
        };
        items.push(item.clone());
        debug!(id = %item.id, "item created");
        Ok(item)
    }

    pub async fn update_item(&self, id: &str, update: UpdateDataItem) -> Result<DataItem> {
        update.validate()?;
        Self::delay(self.latency.write).await;

        let mut items = self.lock()?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| AppError::not_found(format!("item {}", id)))?;
        update.apply(item);
        Ok(item.clone())
    }

    /// Remove and return the item
    pub async fn delete_item(&self, id: &str) -> Result<DataItem> {
        Self::delay(self.latency.write).await;

        let mut items = self.lock()?;
        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| AppError::not_found(format!("item {}", id)))?;
        Ok(items.remove(index))
    }

    /// Count per status, for the dashboard summary
    pub fn status_counts(&self) -> Result<[(ItemStatus, usize); 3]> {
        let items = self.lock()?;
        Ok(
            [ItemStatus::Active, ItemStatus::Inactive, ItemStatus::Pending].map(|status| {
                (
                    status,
                    items.iter().filter(|item| item.status == status).count(),
                )
            }),
        )
    }
}

/// 示例数据
pub fn sample_items() -> Vec<DataItem> {
    let rows = [
        ("John Doe", "john@example.com", ItemStatus::Active, Role::Admin, (2024, 1, 15)),
        ("Jane Smith", "jane@example.com", ItemStatus::Active, Role::User, (2024, 2, 10)),
        ("Bob Johnson", "bob@example.com", ItemStatus::Inactive, Role::Editor, (2024, 1, 20)),
        ("Alice Williams", "alice@example.com", ItemStatus::Pending, Role::User, (2024, 3, 5)),
        ("Charlie Brown", "charlie@example.com", ItemStatus::Active, Role::User, (2024, 2, 15)),
        ("Diana Prince", "diana@example.com", ItemStatus::Active, Role::Editor, (2024, 1, 25)),
        ("Edward Smith", "edward@example.com", ItemStatus::Inactive, Role::User, (2024, 3, 10)),
        ("Fiona Green", "fiona@example.com", ItemStatus::Pending, Role::User, (2024, 2, 20)),
        ("George Wilson", "george@example.com", ItemStatus::Active, Role::Admin, (2024, 1, 30)),
        ("Hannah Adams", "hannah@example.com", ItemStatus::Active, Role::User, (2024, 3, 15)),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (name, email, status, role, (y, m, d)))| DataItem {
            id: (i + 1).to_string(),
            name: name.to_string(),
            email: email.to_string(),
            status,
            role,
            created_at: Utc
                .with_ymd_and_hms(y, m, d, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        })
        .collect()
}
