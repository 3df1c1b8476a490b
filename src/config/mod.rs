// Configuration module
// Public interface for configuration loading

mod loader;
mod models;
mod settings;

pub use loader::{config_dir, history_path, load_config, prompts_dir};
pub use models::{default_models, list_models, model_id, resolve_model, ModelEntry, DEFAULT_MODEL};
pub use settings::{Config, OutputLength};
