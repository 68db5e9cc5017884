pub mod cache;
pub mod config;
pub mod declare;
pub mod logging;
pub mod provider;
pub mod report;
pub mod util;
pub mod web;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    web::serve().await
}
