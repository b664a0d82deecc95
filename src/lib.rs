pub mod app;
pub mod cli;
pub mod config;
pub mod dom;
pub mod nav;
pub mod output;
pub mod render;
pub mod search;
pub mod session;
pub mod source;
pub mod specimen;
pub mod swap;

#[cfg(test)]
mod tests;
