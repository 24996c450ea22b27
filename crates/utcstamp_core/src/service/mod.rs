//! Use-case services built on top of repositories.

pub mod stamp_service;
