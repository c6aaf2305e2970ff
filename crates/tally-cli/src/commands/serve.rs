//! Web server command

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, no_encrypt: bool, host: &str, port: u16) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    tally_server::run_server(db, host, port).await
}
