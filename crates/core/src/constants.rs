/// Quantity threshold below which a position is considered closed
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Decimal precision for computed return percentages
pub const DECIMAL_PRECISION: u32 = 6;

/// Default benchmark index ticker (MSCI World, Amundi ETF on Euronext Paris)
pub const DEFAULT_BENCHMARK_TICKER: &str = "CW8.PA";

/// Display label of the default benchmark
pub const DEFAULT_BENCHMARK_LABEL: &str = "MSCI World";

/// Profile loaded when no username has been entered yet
pub const DEFAULT_USERNAME: &str = "invite";

/// Storage key used when the deployment is single-tenant
pub const SINGLE_TENANT_KEY: &str = "default";

/// Largest price or quantity accepted for a single trade
pub const MAX_TRADE_AMOUNT: i64 = 1_000_000_000_000;
