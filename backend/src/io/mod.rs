//! # IO Module
//!
//! Interface layer between HTTP clients and the domain logic.

pub mod rest;
