pub mod env;
mod loader;

pub use env::{
    AppConfig, ClassificationMode, CollectionConfig, DirectoryConfig, DownloadConfig,
    SearchConfig, SplitTargets,
};
pub use loader::load_config;
