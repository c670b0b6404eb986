//! Legacy database implementations.
//!
//! - [`MysqlDialect`]: renders [`SelectQuery`](crate::core::SelectQuery) as MySQL
//! - [`MysqlSource`]: [`LegacyDatabase`](crate::core::LegacyDatabase) over SQLx

mod dialect;
mod mysql;

pub use dialect::MysqlDialect;
pub use mysql::MysqlSource;
