//! FRB bridge crate for the portfolio UI shell.

pub mod api;
