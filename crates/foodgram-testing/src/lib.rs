//! Test helpers shared by Foodgram service test suites.

pub mod auth;
