//! `ruralcare` binary entrypoint.

use std::process;

#[tokio::main]
async fn main() {
    let code = ruralcare_cli::run().await;
    process::exit(code);
}
