//! Environment-backed configuration for the avatar pipeline.
//!
//! Every field has a development-friendly default so the service can
//! start without any environment at all. `PERSONA_DATABASE_URL` takes
//! precedence over the conventional `DATABASE_URL`.

use std::path::PathBuf;

/// Default number of parallel pipeline workers.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Postgres connection string.
    pub database_url: String,
    /// Root directory for per-job scratch space.
    pub temp_storage_path: PathBuf,
    /// Root directory for finished avatar assets.
    pub output_path: PathBuf,
    /// Public URL prefix under which packaged assets are served.
    pub asset_base_url: String,
    /// Location of the DECA reconstruction model weights.
    pub deca_model_path: PathBuf,
    /// Whether reconstruction should request GPU execution.
    pub gpu_enabled: bool,
    /// Size of the task queue's worker pool.
    pub worker_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/persona".to_string(),
            temp_storage_path: PathBuf::from("./tmp/avatar_pipeline"),
            output_path: PathBuf::from("./var/avatars"),
            asset_base_url: "http://localhost:8000/assets".to_string(),
            deca_model_path: PathBuf::from("./models/deca"),
            gpu_enabled: false,
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

impl Settings {
    /// Build settings from environment variables, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(url) =
            env_var("PERSONA_DATABASE_URL").or_else(|| env_var("DATABASE_URL"))
        {
            settings.database_url = url;
        }
        if let Some(path) = env_var("PERSONA_TEMP_PATH") {
            settings.temp_storage_path = PathBuf::from(path);
        }
        if let Some(path) = env_var("PERSONA_OUTPUT_PATH") {
            settings.output_path = PathBuf::from(path);
        }
        if let Some(url) = env_var("PERSONA_ASSET_BASE_URL") {
            settings.asset_base_url = url;
        }
        if let Some(path) = env_var("PERSONA_DECA_MODEL_PATH") {
            settings.deca_model_path = PathBuf::from(path);
        }
        if let Some(flag) = env_var("PERSONA_GPU_ENABLED") {
            settings.gpu_enabled = parse_bool(&flag);
        }
        if let Some(count) = env_var("PERSONA_WORKER_COUNT") {
            if let Ok(count) = count.parse::<usize>() {
                settings.worker_count = count.max(1);
            }
        }

        settings
    }

    /// Create the scratch and output roots if they do not exist yet.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.temp_storage_path)?;
        std::fs::create_dir_all(&self.output_path)?;
        Ok(())
    }

    /// Asset base URL with any trailing slash removed, ready for joining
    /// with a file name.
    pub fn asset_base(&self) -> &str {
        self.asset_base_url.trim_end_matches('/')
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Accepts `1`, `true`, `yes`, and `on` (case-insensitive) as truthy.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
