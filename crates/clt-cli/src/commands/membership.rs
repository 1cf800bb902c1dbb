//! The membership command: reconcile one club (or every configured club)
//! against its stored roster.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use clt_api::{ChessComClient, ClubDirectory};
use clt_config::Config;
use clt_reconcile::reconcile_club;
use clt_roster::store::{load_roster, save_roster};

pub async fn run(
    club: Option<&str>,
    all_clubs: bool,
    readonly: bool,
    config_path: &Path,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let directory =
        ChessComClient::new(&config.user_agent()).context("failed to build http client")?;

    let clubs: Vec<String> = if all_clubs {
        if config.clubs.is_empty() {
            bail!("--all-clubs given but no clubs are configured");
        }
        println!(
            "checking membership changes{} for the following club(s):",
            readonly_note(readonly)
        );
        println!("{}", config.clubs.join(", "));
        config.clubs.clone()
    } else {
        vec![config.resolve_club(club)?]
    };

    for club in &clubs {
        run_club(&directory, &config, club, readonly).await?;
    }
    Ok(())
}

async fn run_club(
    directory: &ChessComClient,
    config: &Config,
    club: &str,
    readonly: bool,
) -> Result<()> {
    println!(
        "checking membership changes{} for {club}",
        readonly_note(readonly)
    );

    let profile = directory
        .club_profile(club)
        .await
        .with_context(|| format!("failed to fetch club profile for '{club}'"))?;

    let data_dir = config.data_dir();
    let mut roster = load_roster(&data_dir, club)?;

    reconcile_club(directory, &profile, &mut roster).await?;

    if readonly {
        info!(club, "readonly run; roster not persisted");
        return Ok(());
    }
    save_roster(&data_dir, club, &roster)
}

fn readonly_note(readonly: bool) -> &'static str {
    if readonly {
        " without updating the record"
    } else {
        ""
    }
}
