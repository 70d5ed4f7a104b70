use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use shared::PricingContext;

/// 定价服务配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 8001 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (设置后按天滚动写文件) |
/// | DIRECTUS_URL | http://localhost:8055 | CMS 地址 |
/// | REQUEST_TIMEOUT_MS | 10000 | CMS 请求超时(毫秒) |
/// | MENU_CACHE_TTL_SECS | 300 | 菜单缓存时间(秒) |
/// | INVENTORY_CACHE_TTL_SECS | 60 | 库存缓存时间(秒) |
/// | TAX_RATE | 0.0875 | 税率 |
/// | DELIVERY_FEE | 3.99 | 配送费 |
/// | FREE_DELIVERY_MINIMUM | 25.00 | 免配送费门槛 |
/// | PROMO_RULES_FILE | - | 优惠码规则 JSON 文件 |
/// | BUSINESS_UTC_OFFSET_MINUTES | 0 | 营业时区偏移(分钟) |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=9000 TAX_RATE=0.07 cargo run -p pricing-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,

    // === CMS ===
    /// Directus 基础地址
    pub directus_url: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub menu_cache_ttl_secs: u64,
    pub inventory_cache_ttl_secs: u64,

    // === 定价参数 ===
    pub tax_rate: f64,
    pub delivery_fee: f64,
    pub free_delivery_minimum: f64,
    /// 优惠码规则文件，未设置时优惠码全部无效
    pub promo_rules_file: Option<String>,
    /// 营业时区相对 UTC 的偏移 (分钟)，用于按时段定价
    pub business_utc_offset_minutes: i32,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置 (测试时使用 HashMap)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| lookup(key).map(|v| v.trim().to_string());

        Self {
            http_port: parsed(&lookup, "HTTP_PORT", 8001),
            environment: parse("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: parse("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: parse("LOG_DIR").filter(|s| !s.is_empty()),

            directus_url: parse("DIRECTUS_URL")
                .unwrap_or_else(|| "http://localhost:8055".into()),
            request_timeout_ms: parsed(&lookup, "REQUEST_TIMEOUT_MS", 10_000),
            menu_cache_ttl_secs: parsed(&lookup, "MENU_CACHE_TTL_SECS", 300),
            inventory_cache_ttl_secs: parsed(&lookup, "INVENTORY_CACHE_TTL_SECS", 60),

            tax_rate: parsed(&lookup, "TAX_RATE", 0.0875),
            delivery_fee: parsed(&lookup, "DELIVERY_FEE", 3.99),
            free_delivery_minimum: parsed(&lookup, "FREE_DELIVERY_MINIMUM", 25.0),
            promo_rules_file: parse("PROMO_RULES_FILE").filter(|s| !s.is_empty()),
            business_utc_offset_minutes: parsed(&lookup, "BUSINESS_UTC_OFFSET_MINUTES", 0),
        }
    }

    /// 默认定价上下文 (无折扣)
    pub fn pricing_context(&self) -> PricingContext {
        PricingContext::new(self.tax_rate, self.delivery_fee, self.free_delivery_minimum)
    }

    /// 营业时区，偏移非法时回退到 UTC
    pub fn business_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.business_utc_offset_minutes * 60).unwrap_or_else(|| {
            tracing::warn!(
                offset_minutes = self.business_utc_offset_minutes,
                "Invalid business UTC offset, falling back to UTC"
            );
            Utc.fix()
        })
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.http_port, 8001);
        assert_eq!(config.directus_url, "http://localhost:8055");
        assert_eq!(config.menu_cache_ttl_secs, 300);
        assert_eq!(config.inventory_cache_ttl_secs, 60);
        assert!(config.is_development());
        assert!(config.promo_rules_file.is_none());

        let ctx = config.pricing_context();
        assert_eq!(ctx.tax_rate, 0.0875);
        assert_eq!(ctx.delivery_fee_flat, 3.99);
        assert_eq!(ctx.free_delivery_threshold, 25.0);
        assert_eq!(ctx.discount_amount, 0.0);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HTTP_PORT", "9000"),
            ("TAX_RATE", " 0.07 "),
            ("ENVIRONMENT", "production"),
            ("PROMO_RULES_FILE", "/etc/pricing/promos.json"),
        ]);
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.tax_rate, 0.07);
        assert!(config.is_production());
        assert_eq!(
            config.promo_rules_file.as_deref(),
            Some("/etc/pricing/promos.json")
        );
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config_from(&[("HTTP_PORT", "eighty"), ("DELIVERY_FEE", "free")]);
        assert_eq!(config.http_port, 8001);
        assert_eq!(config.delivery_fee, 3.99);
    }

    #[test]
    fn test_business_offset() {
        let config = config_from(&[("BUSINESS_UTC_OFFSET_MINUTES", "-300")]);
        assert_eq!(config.business_offset().local_minus_utc(), -300 * 60);

        let config = config_from(&[("BUSINESS_UTC_OFFSET_MINUTES", "100000")]);
        assert_eq!(config.business_offset().local_minus_utc(), 0);
    }
}
