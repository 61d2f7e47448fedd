mod cli;
mod commands;
mod infra;
mod session;

use hikkoshi_lens::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
