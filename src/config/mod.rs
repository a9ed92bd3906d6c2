mod settings;

pub use settings::{LookupConfig, Route53Config, Settings};
