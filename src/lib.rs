//! Arlo downloader: watches an Arlo camera account and logs device activity.
//!
//! A library for resolving the downloader's configuration, logging in to
//! the camera cloud, and reporting attribute changes of every base station
//! and camera on the account.

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod session;
pub mod time;
pub mod transport;
