// Adapters layer: concrete implementations of the domain ports (local files, Cloud Storage, Vertex AI).

pub mod auth;
pub mod gcs;
pub mod http;
pub mod local;
pub mod vertex;

pub use gcs::GcsObjectStore;
pub use local::LocalStorage;
pub use vertex::VertexClient;
