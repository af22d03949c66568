use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::validation::{self, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Inactive,
    Pending,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
            ItemStatus::Pending => "pending",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ItemStatus::Active),
            "inactive" => Ok(ItemStatus::Inactive),
            "pending" => Ok(ItemStatus::Pending),
            _ => Err(format!("unknown status '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Editor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Editor => "editor",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "editor" => Ok(Role::Editor),
            _ => Err(format!("unknown role '{}'", s)),
        }
    }
}

/// A row of the admin data table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: ItemStatus,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDataItem {
    pub name: String,
    pub email: String,
    pub status: ItemStatus,
    pub role: Role,
}

impl CreateDataItem {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        validate_name(&mut errors, &self.name);
        validation::email(&mut errors, "email", &self.email);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDataItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl UpdateDataItem {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(name) = &self.name {
            validate_name(&mut errors, name);
        }
        if let Some(email) = &self.email {
            validation::email(&mut errors, "email", email);
        }
        errors.into_result()
    }

    pub fn apply(self, item: &mut DataItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(email) = self.email {
            item.email = email;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(role) = self.role {
            item.role = role;
        }
    }
}

fn validate_name(errors: &mut FieldErrors, name: &str) {
    validation::min_chars(errors, "name", name, 2, "Name must be at least 2 characters");
}

/// Column the list is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SortKey {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "role")]
    Role,
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortKey {
    pub fn compare(&self, a: &DataItem, b: &DataItem) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Email => a.email.cmp(&b.email),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
            SortKey::Role => a.role.as_str().cmp(b.role.as_str()),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query for one page of items
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Case-insensitive substring of name or email
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

/// Filters arrive as query strings where `status=` means "any"
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    10
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            search: None,
            status: None,
            role: None,
            sort: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListQuery {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.page == 0 {
            errors.add("page", "Page starts at 1");
        }
        if self.page_size == 0 {
            errors.add("pageSize", "Page size must be positive");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemPage {
    pub items: Vec<DataItem>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
        assert_eq!(query.sort, SortKey::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
    }

    #[test]
    fn test_create_validation_reports_each_field() {
        let create = CreateDataItem {
            name: "J".to_string(),
            email: "not-an-email".to_string(),
            status: ItemStatus::Active,
            role: Role::User,
        };
        let errors = create.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
    }

    #[test]
    fn test_update_validation_only_checks_present_fields() {
        assert!(UpdateDataItem::default().validate().is_ok());
        let update = UpdateDataItem {
            email: Some("bad".to_string()),
            ..UpdateDataItem::default()
        };
        assert!(update.validate().unwrap_err().get("email").is_some());
    }

    #[test]
    fn test_empty_filters_mean_no_filter() {
        let query: ListQuery =
            serde_json::from_str(r#"{"search": "", "status": "", "role": "editor"}"#).unwrap();
        assert_eq!(query.search, None);
        assert_eq!(query.status, None);
        assert_eq!(query.role, Some(Role::Editor));

        let bad = serde_json::from_str::<ListQuery>(r#"{"status": "archived"}"#);
        assert!(bad.is_err());
    }
}
