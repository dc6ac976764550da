pub mod cache;
pub mod catalog;
pub mod config;
pub mod connectivity;
pub mod controller;
pub mod metrics;
pub mod remote;
pub mod repository;
pub mod testing;

pub use cache::{CacheError, CacheKey, CacheLookup, DiskCache, KeyValueStore, KeyValueStoreExt};
pub use catalog::{Genre, Movie, MovieDetails, Page, SpokenLanguage};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use connectivity::{Connectivity, ProbeMonitor};
pub use controller::{
    DetailsController, DetailsState, ListController, ListSnapshot, Subscription,
};
pub use remote::{RemoteCatalog, RemoteError, TmdbClient};
pub use repository::{CachedRepository, CatalogRepository};
