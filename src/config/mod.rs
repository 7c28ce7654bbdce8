mod loader;
mod model;

pub use loader::{ConfigLoader, FileConfigLoader, LOCAL_CONFIG_NAME};
pub use model::{
    Config, DEFAULT_CACHE_TTL_SECS, DEFAULT_GITLAB_URL, DEFAULT_INPUT_FILE, DEFAULT_TOKEN_ENV,
    GitlabConfig, RemoteConfig, RenderConfig,
};
