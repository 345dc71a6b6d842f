//! Mock environment document model and persistence.

mod types;

pub use types::{Environment, Header, ResponseMode, RootChild, Route, RouteResponse, TlsOptions};
