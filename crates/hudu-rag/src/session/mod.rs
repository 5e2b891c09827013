//! Session lifecycle for uploaded documents

mod registry;

pub use registry::{Session, SessionRegistry};
