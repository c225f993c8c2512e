//! Status command for showing the configured activity service.

use std::io::Write;

use anyhow::{Context, Result};
use fl_aw::{Client, ServerInfo};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let client = Client::new(&config.server_url)
        .context("failed to create activity service client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let info = runtime
        .block_on(client.info())
        .map_err(|err| err.to_string());

    write_status(writer, config, &info)
}

fn write_status<W: Write>(
    writer: &mut W,
    config: &Config,
    info: &Result<ServerInfo, String>,
) -> Result<()> {
    writeln!(writer, "focusline status")?;
    writeln!(writer, "Server: {}", config.server_url)?;
    match &config.bucket {
        Some(bucket) => writeln!(writer, "Bucket: {bucket}")?,
        None => writeln!(writer, "Bucket prefix: {}", config.bucket_prefix)?,
    }

    match info {
        Ok(info) => writeln!(
            writer,
            "Reachable: yes ({} {} on {})",
            if info.testing { "testing" } else { "server" },
            info.version,
            info.hostname
        )?,
        Err(err) => writeln!(writer, "Reachable: no ({err})")?,
    }

    Ok(())
}
