mod cli;
#[cfg(test)]
mod fixtures;
mod infra;
mod routes;
mod server;

use employee_events::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
