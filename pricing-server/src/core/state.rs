use std::sync::Arc;

use shared::order_money::validate_context;
use shared::{AppError, AppResult, PricingContext};

use crate::core::Config;
use crate::pricing::PromoCatalog;
use crate::services::{DirectusClient, MenuSource};
use crate::utils::BusinessClock;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求 clone 一份的成本极低。
/// 定价上下文在启动时校验一次，之后只读。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pricing_context | PricingContext | 默认定价参数 (无折扣) |
/// | promos | Arc<PromoCatalog> | 优惠码规则 |
/// | menu_source | Arc<dyn MenuSource> | 菜单/库存来源 (Directus) |
/// | clock | BusinessClock | 营业时区时钟 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pricing_context: PricingContext,
    pub promos: Arc<PromoCatalog>,
    pub menu_source: Arc<dyn MenuSource>,
    pub clock: BusinessClock,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("pricing_context", &self.pricing_context)
            .field("promos", &self.promos.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 创建服务器状态 (手动构造，测试时注入替身数据源)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(
        config: Config,
        promos: PromoCatalog,
        menu_source: Arc<dyn MenuSource>,
        clock: BusinessClock,
    ) -> AppResult<Self> {
        let pricing_context = config.pricing_context();
        validate_context(&pricing_context).map_err(|e| {
            AppError::config(format!("invalid pricing configuration: {}", e))
        })?;

        Ok(Self {
            config,
            pricing_context,
            promos: Arc::new(promos),
            menu_source,
            clock,
        })
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 优惠码规则 (PROMO_RULES_FILE，未设置时为空)
    /// 2. Directus 客户端
    /// 3. 校验定价上下文
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let promos = match &config.promo_rules_file {
            Some(path) => PromoCatalog::load(path)?,
            None => {
                tracing::info!("PROMO_RULES_FILE not set, promo codes disabled");
                PromoCatalog::empty()
            }
        };

        let directus = DirectusClient::new(config)?;
        tracing::info!(url = %directus.base_url(), "Directus client ready");

        let state = Self::new(
            config.clone(),
            promos,
            Arc::new(directus),
            BusinessClock::new(config.business_offset()),
        )?;

        tracing::info!(
            tax_rate = state.pricing_context.tax_rate,
            delivery_fee = state.pricing_context.delivery_fee_flat,
            free_delivery_threshold = state.pricing_context.free_delivery_threshold,
            "Pricing context loaded"
        );

        Ok(state)
    }
}
