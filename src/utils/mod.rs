//! Utility modules for the site pipeline.

pub mod slug;
