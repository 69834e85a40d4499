//! Command implementations behind the `helius` binary.
//!
//! Each command writes pretty-printed JSON to the supplied writer.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

pub mod config;
mod assets;
mod fees;
mod holders;
mod signature;
mod webhooks;

pub use assets::{asset, assets};
pub use fees::{FeeQuery, fee};
pub use holders::{HoldersQuery, holders};
pub use signature::verify_signature;
pub use webhooks::{delete_webhook, get_webhook, list_webhooks};

pub(crate) fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}
