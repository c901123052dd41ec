//! Darling: merge RSS and Atom feeds, drop what you don't want to read, and
//! emit the rest as one feed.

pub mod app;
pub mod config;
pub mod feed;
pub mod filter;
pub mod output;
pub mod util;
