use std::cmp::Ordering;

use crate::config::PagingConfig;
use crate::database::models::CashCard;

use super::error::PagingError;
use super::page_order::PageOrder;
use super::types::{SortField, SortOrder};

/// A zero-based page of an owner's cards plus the order to slice it in.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Vec<SortOrder>) -> Self {
        Self { page, size: size.max(1), sort }
    }

    /// Build from raw query pairs (`page`, `size`, repeatable `sort`).
    ///
    /// Unusable `page` values fall back to 0 and unusable `size` values to the
    /// configured default; oversized pages are clamped. Unknown keys are ignored.
    pub fn from_query(pairs: &[(String, String)], paging: &PagingConfig) -> Result<Self, PagingError> {
        let mut page = 0u32;
        let mut size = paging.default_page_size;
        let mut sort = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    page = value
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .filter(|p| *p >= 0)
                        .map(|p| p.min(u32::MAX as i64) as u32)
                        .unwrap_or(0);
                }
                "size" => {
                    size = value
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .filter(|s| *s >= 1)
                        .map(|s| s.min(paging.max_page_size as i64) as u32)
                        .unwrap_or(paging.default_page_size);
                }
                "sort" => sort.extend(PageOrder::parse(value)?),
                _ => {}
            }
        }

        Ok(Self::new(page, size.min(paging.max_page_size), sort))
    }

    /// Requested sort, or ascending amount when none was given.
    pub fn sort_or_default(&self) -> Vec<SortOrder> {
        if self.sort.is_empty() {
            vec![SortOrder::asc(SortField::Amount)]
        } else {
            self.sort.clone()
        }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    /// Order `cards` and cut out this page. Ties fall back to ascending id.
    pub fn apply(&self, mut cards: Vec<CashCard>) -> Vec<CashCard> {
        let orders = self.sort_or_default();
        cards.sort_by(|a, b| {
            orders
                .iter()
                .map(|o| o.compare(a, b))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or_else(|| a.id.cmp(&b.id))
        });

        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        cards.into_iter().skip(offset).take(self.size as usize).collect()
    }
}
