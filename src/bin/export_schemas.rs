//! Exports JSON Schemas for the wire-facing platform types.
//!
//! Backend and frontend teams validate payloads against these instead of
//! re-declaring the shapes by hand. Run with the `cli` feature:
//!
//! ```text
//! cargo run --features cli --bin export_schemas -- --out-dir schemas
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use recimat::application::services::notifications::NotificationCounts;
use recimat::domain::entities::{Commitment, LogEntry, Proposal, Response, User};
use recimat::domain::services::visibility::PublicProfile;
use recimat::infrastructure::idempotency::IdempotencyKey;
use schemars::{JsonSchema, schema_for};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "export_schemas", about = "Write platform JSON Schemas to disk")]
struct Args {
    /// Directory the schema files are written to.
    #[arg(long, default_value = "schemas")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    write_schema::<Proposal>(&args.out_dir, "proposal")?;
    write_schema::<Response>(&args.out_dir, "response")?;
    write_schema::<Commitment>(&args.out_dir, "commitment")?;
    write_schema::<User>(&args.out_dir, "user")?;
    write_schema::<LogEntry>(&args.out_dir, "log_entry")?;
    write_schema::<PublicProfile>(&args.out_dir, "public_profile")?;
    write_schema::<NotificationCounts>(&args.out_dir, "notification_counts")?;
    write_schema::<IdempotencyKey>(&args.out_dir, "idempotency_key")?;

    Ok(())
}

fn write_schema<T: JsonSchema>(dir: &Path, name: &str) -> Result<()> {
    let schema = schema_for!(T);
    let path = dir.join(format!("{name}.schema.json"));
    let body = serde_json::to_string_pretty(&schema).context("serializing schema")?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
