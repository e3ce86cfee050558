//! CLI argument definitions.

use std::process::ExitCode;

use clap::Parser;

use crate::commands::ScanCmd;

#[derive(Parser)]
#[command(name = "repo-sbom")]
#[command(about = "Inventory the dependencies of every repository in a directory")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub scan: ScanCmd,
}

impl Cli {
    pub async fn execute(&self) -> anyhow::Result<ExitCode> {
        let status = self.scan.run().await?;
        Ok(status.into())
    }
}
