//! Command handlers of the `adflow` binary.
//!
//! Each handler calls the API and returns an [`Output`]; printing is left to
//! the caller so handlers stay testable.

pub mod admin;
pub mod auth;
pub mod campaigns;
pub mod dashboard;
pub mod reports;

use crate::cli::Command;
use crate::services::ApiClient;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Output {
    Json(serde_json::Value),
    Message(String),
    /// Report bytes to print as-is.
    Raw(Vec<u8>),
    /// Report saved to a file.
    Saved { path: PathBuf, bytes: usize },
}

impl Output {
    pub(crate) fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Output::Json(
            serde_json::to_value(value).context("Failed to serialize output")?,
        ))
    }

    pub fn write_to(&self, out: &mut impl Write) -> Result<()> {
        match self {
            Output::Json(value) => {
                serde_json::to_writer_pretty(&mut *out, value)?;
                writeln!(out)?;
            }
            Output::Message(message) => writeln!(out, "{}", message)?,
            Output::Raw(bytes) => out.write_all(bytes)?,
            Output::Saved { path, bytes } => {
                writeln!(out, "Saved {} bytes to {}", bytes, path.display())?
            }
        }
        Ok(())
    }
}

pub async fn dispatch(client: &ApiClient, command: Command) -> Result<Output> {
    match command {
        Command::Login { username, password } => auth::login(client, username, password).await,
        Command::Register(args) => auth::register(client, args).await,
        Command::Logout => auth::logout(client).await,
        Command::Whoami => auth::whoami(client).await,
        Command::ChangePassword {
            current,
            new_password,
        } => auth::change_password(client, current, new_password).await,
        Command::Campaigns { command } => campaigns::handle(client, command).await,
        Command::Dashboard => dashboard::overview(client).await,
        Command::Platforms => dashboard::platforms(client).await,
        Command::Admin { command } => admin::handle(client, command).await,
        Command::Report { format, output } => reports::export(client, format, output).await,
    }
}
