//! Core of the tracker browser: catalog model, era projection, media
//! retrieval, playback and the navigation state machine that ties them
//! together. Nothing in here touches the terminal.

pub mod catalog;
pub mod config;
pub mod era;
pub mod nav;
pub mod platform;
pub mod playback;
pub mod retrieval;
