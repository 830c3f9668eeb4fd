#[path = "../common/mod.rs"]
mod common;

mod admin;
mod auth;
mod bulk_delete;
mod contact;
mod public;
