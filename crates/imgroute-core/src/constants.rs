/// Separator between path segments in request paths and storage keys.
pub const SEPARATOR: char = '/';

/// Root folder, the catch-all route scope.
pub const ROOT_FOLDER: &str = "/";

/// Separator between chained steps of an inline transform chain.
pub const STEP_SEPARATOR: char = ',';

/// Separator between a step's type and its positional options.
pub const OPTION_SEPARATOR: char = '_';

/// Value of the `Server` response header.
pub const SERVER_NAME: &str = "imgroute";

// Environment variables
pub const ENV_CONFIG_PATH: &str = "IMGROUTE_CONFIG";
pub const ENV_SERVER_HOST: &str = "SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_CACHE_CAPACITY: &str = "IMAGE_CACHE_CAPACITY";
pub const ENV_MAX_CONCURRENT_REQUESTS: &str = "MAX_CONCURRENT_REQUESTS";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

// Defaults
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_CACHE_CAPACITY: usize = 0;
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 512;
