//! 服务层 - 服务器核心服务
//!
//! # 服务列表
//!
//! - [`DirectusClient`] - CMS 菜单/库存客户端 (含内存缓存)
//! - [`TtlCache`] - 带过期时间的并发缓存
//! - [`https`] - HTTP 服务器与路由

pub mod cache;
pub mod directus;
pub mod https;

pub use cache::TtlCache;
pub use directus::{DirectusClient, FetchError, MenuSource, fetch_menu_items_or};
