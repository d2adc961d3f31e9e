#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Binary entrypoint that configures the global log facade and runs the demo workers.

use herald_demo::{DemoResult, run_demo};

/// Bootstraps logging and blocks until every worker finishes.
#[tokio::main]
async fn main() -> DemoResult<()> {
    run_demo().await
}
