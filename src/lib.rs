//! Collects a medium-balanced image dataset of artwork posts.
//!
//! Posts are pulled from a submissions search API, classified by the medium
//! named in their title, sampled so every class reaches the same count, and
//! downloaded into a `binary_tts/{train,val,test}/{digital,non_digital}` tree.

pub mod app;
pub mod classify;
pub mod collect;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod infrastructure;
pub mod source;
