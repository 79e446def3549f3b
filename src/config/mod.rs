pub mod loader;
pub mod schema;

pub use loader::{ConfigOverrides, get_config_path, load_config, save_config};
pub use schema::StoreConfig;
