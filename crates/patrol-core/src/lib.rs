//! Core types and definitions for the patrol simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! coordinates, entity identity, components, commands, configuration,
//! renderer snapshots, errors and constants. It has no dependency on the
//! ECS or on any random source.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod state;
pub mod types;
