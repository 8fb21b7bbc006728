mod cli;
mod infra;
mod lookup;
mod routes;
mod server;

use address_verify::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
