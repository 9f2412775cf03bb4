//! Query options for list endpoints.
//!
//! [`QueryOptions`] is what callers hand in: every field optional, mirroring
//! the Etherscan query string. [`QueryOptions::validate`] runs once at the
//! boundary and yields [`ListOptions`] with defaults resolved.

use explorer_chain_index::{AddressRole, BlockRange};
use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::error::{EtherscanError, EtherscanResult};

/// Every role an address can play in a transaction.
pub const ALL_TRANSACTION_ROLES: [AddressRole; 3] = [
    AddressRole::Sender,
    AddressRole::Receiver,
    AddressRole::Creator,
];

/// Roles an address can play in a token transfer.
pub const TOKEN_TRANSFER_ROLES: [AddressRole; 2] = [AddressRole::Sender, AddressRole::Receiver];

/// Sort direction by block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Restricts a transaction listing to one side of the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBy {
    /// Address received the transaction, or is the contract it created.
    To,
    /// Address sent the transaction.
    From,
}

impl FilterBy {
    pub fn roles(self) -> &'static [AddressRole] {
        match self {
            Self::To => &[AddressRole::Receiver, AddressRole::Creator],
            Self::From => &[AddressRole::Sender],
        }
    }
}

/// Caller-supplied options for list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryOptions {
    /// Sort direction. Default depends on the endpoint.
    #[serde(default)]
    pub order_by_direction: Option<OrderDirection>,
    /// 1-indexed page number. Default: 1.
    #[serde(default)]
    pub page_number: Option<u64>,
    /// Page size. Default: `pagination.default_page_size`.
    #[serde(default)]
    pub page_size: Option<u64>,
    /// Inclusive lower block bound.
    #[serde(default)]
    pub start_block: Option<u64>,
    /// Inclusive upper block bound.
    #[serde(default)]
    pub end_block: Option<u64>,
    /// Role restriction for transaction listings.
    #[serde(default)]
    pub filter_by: Option<FilterBy>,
}

impl QueryOptions {
    pub fn order(mut self, direction: OrderDirection) -> Self {
        self.order_by_direction = Some(direction);
        self
    }

    pub fn page(mut self, number: u64, size: u64) -> Self {
        self.page_number = Some(number);
        self.page_size = Some(size);
        self
    }

    pub fn blocks(mut self, start: Option<u64>, end: Option<u64>) -> Self {
        self.start_block = start;
        self.end_block = end;
        self
    }

    pub fn filter_by(mut self, filter: FilterBy) -> Self {
        self.filter_by = Some(filter);
        self
    }

    /// Resolve defaults and check limits.
    pub fn validate(
        &self,
        pagination: &PaginationConfig,
        default_direction: OrderDirection,
    ) -> EtherscanResult<ListOptions> {
        let number = self.page_number.unwrap_or(1);
        if number == 0 {
            return Err(EtherscanError::InvalidOptions(
                "page_number must be a positive integer".to_string(),
            ));
        }

        let size = self.page_size.unwrap_or(pagination.default_page_size);
        if size == 0 {
            return Err(EtherscanError::InvalidOptions(
                "page_size must be a positive integer".to_string(),
            ));
        }
        if size > pagination.max_page_size {
            return Err(EtherscanError::InvalidOptions(format!(
                "page_size must be at most {}, got {}",
                pagination.max_page_size, size
            )));
        }

        Ok(ListOptions {
            direction: self.order_by_direction.unwrap_or(default_direction),
            page: Page { number, size },
            range: BlockRange::new(self.start_block, self.end_block),
            filter_by: self.filter_by,
        })
    }
}

/// Options with defaults resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub direction: OrderDirection,
    pub page: Page,
    pub range: BlockRange,
    pub filter_by: Option<FilterBy>,
}

impl ListOptions {
    /// Roles a transaction listing queries.
    pub fn transaction_roles(&self) -> &'static [AddressRole] {
        match self.filter_by {
            Some(filter) => filter.roles(),
            None => &ALL_TRANSACTION_ROLES,
        }
    }
}

/// A 1-indexed window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    /// Number of rows before this page, `None` if it overflows.
    pub fn offset(&self) -> Option<u64> {
        self.number.checked_sub(1)?.checked_mul(self.size)
    }

    /// Cut this page out of `items`. Pages past the end are empty.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let Some(offset) = self.offset() else {
            return Vec::new();
        };
        let Ok(offset) = usize::try_from(offset) else {
            return Vec::new();
        };
        let size = usize::try_from(self.size).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(size).collect()
    }
}
