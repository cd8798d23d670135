// Single source of truth for all default values.

// --- Binder ---
pub const DEFAULT_FAIL_FAST: bool = false;

// --- Catalogs ---
pub const DEFAULT_CATALOG_ENABLED: bool = true;
pub const DEFAULT_KAFKA_PRODUCER_PREFIX: &str = "kafka.producer.";
pub const DEFAULT_KAFKA_CONSUMER_PREFIX: &str = "kafka.consumer.";
pub const DEFAULT_THREADING_PREFIX: &str = "java.lang.";

// --- Tracing ---
pub const LOG_ENV_VAR: &str = "METERBIND_LOG";
pub const DEFAULT_LOG_FILTER: &str = "meterbind=info";
