//! Captured-traffic document model.

mod types;

pub use types::{
    CaptureContent, CaptureDocument, CaptureEntry, CaptureHeader, CaptureLog, CaptureRequest,
    CaptureResponse, QueryPair,
};
