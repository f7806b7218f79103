mod cli;
mod demo;
mod infra;

use candidate_compat::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
