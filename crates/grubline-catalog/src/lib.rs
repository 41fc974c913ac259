pub mod client;
pub mod error;
pub mod normalize;
pub mod subscription;
pub mod types;

pub use client::CatalogClient;
pub use error::{FetchError, NormalizeError};
pub use normalize::{normalize, normalize_listing, normalize_menu, Catalog, DocumentKind};
pub use subscription::{
    DocumentSource, FetchState, Fetcher, RawDocument, ResourceId, Snapshot, Subscription,
};
