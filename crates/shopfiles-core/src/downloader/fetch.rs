//! Single-stream HTTP GET into a part file.

use anyhow::{Context, Result};
use std::io;
use std::time::Duration;

use crate::config::ShopConfig;
use crate::storage::PartFile;

/// Transfers slower than this (bytes/sec) for a whole stall window are aborted.
pub const STALL_SPEED_LIMIT: u32 = 1;
/// Hard cap on a single transfer, however steadily it progresses.
pub const MAX_TRANSFER_TIME: Duration = Duration::from_secs(3600);

/// Timeouts for one file download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// The download fails once the connection has been quiet this long.
    pub stall_timeout: Duration,
    /// Whole-transfer limit.
    pub max_time: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            stall_timeout: Duration::from_secs(30),
            max_time: MAX_TRANSFER_TIME,
        }
    }
}

impl FetchOptions {
    pub fn from_config(cfg: &ShopConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            stall_timeout: cfg.download_timeout(),
            max_time: MAX_TRANSFER_TIME,
        }
    }
}

/// Downloads `url` with a single GET, appending the body to `part`.
/// Returns the number of bytes written. Non-2xx responses are errors.
pub fn fetch_into(url: &str, part: &mut PartFile, opts: &FetchOptions) -> Result<u64> {
    let mut write_err: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.fail_on_error(true)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(STALL_SPEED_LIMIT)?;
    easy.low_speed_time(opts.stall_timeout)?;
    easy.timeout(opts.max_time)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match part.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(e).with_context(|| format!("write {}", part.temp_path().display()));
    }
    if let Err(e) = performed {
        if e.is_operation_timedout() {
            anyhow::bail!("GET {} stalled or timed out: {}", url, e);
        }
        if e.is_http_returned_error() {
            let code = easy.response_code().unwrap_or(0);
            anyhow::bail!("GET {} returned HTTP {}", url, code);
        }
        return Err(e).context("GET request failed");
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }
    Ok(part.bytes_written())
}
