//! Persistence models: the sea-orm entity for the `user` table, row-level
//! helpers and connection setup.

pub mod errors;
pub mod db;
pub mod user;

#[cfg(test)]
mod tests;
