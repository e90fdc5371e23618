//! sweepscope entry point.

mod app;
mod commands;
mod config;
mod logging;
mod sweep;
mod ui;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    app::run().await
}
