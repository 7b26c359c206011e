use typed_builder::TypedBuilder;

/// Prefix of every displayed short URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/r";

/// Consecutive generator collisions tolerated before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Configures an [`Engine`](crate::Engine) instance.
#[derive(Debug, Clone, TypedBuilder)]
pub struct EngineSettings {
    /// Base joined with a short code to form the displayed short URL.
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
