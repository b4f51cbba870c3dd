//! Pieces shared by every crate in the workspace: logging setup and
//! small wire types that do not belong to a single layer.

pub mod types;
pub mod utils;
