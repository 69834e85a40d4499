use anyhow::{Context, Result, bail};
use log::debug;
use std::io::Write;
use std::path::Path;

use crate::webhook::{parse_events, validate_signature};

use super::print_json;

/// Verifies the signature of a webhook payload stored in `body_path` and, if
/// it is valid, prints the parsed events.
#[tracing::instrument(skip(secret, signature, out))]
pub fn verify_signature<W: Write>(
    body_path: &Path,
    signature: &str,
    secret: &str,
    out: &mut W,
) -> Result<()> {
    let body = std::fs::read(body_path)
        .with_context(|| format!("Failed to read payload from {}", body_path.display()))?;
    debug!("Read {} bytes from {}", body.len(), body_path.display());

    if !validate_signature(&body, signature, secret) {
        bail!("Signature does not match payload {}", body_path.display());
    }

    let events = parse_events(&body).context("Signature is valid but the payload is not a webhook event")?;
    print_json(out, &serde_json::json!({ "valid": true, "events": events }))
}
