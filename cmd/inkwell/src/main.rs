//! # Inkwell Binary
//!
//! Assembles the in-memory engagement core, seeds it with sample data, hammers
//! it with concurrent like traffic and checks that every post's cached like
//! counter agrees with its like records. Exits non-zero on drift.

mod app;
mod burst;
mod seed;

use anyhow::bail;
use configs::{AppConfig, LogConfig, LogFormat};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::Inkwell;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.log);

    let app = Inkwell::in_memory();
    let seeded = seed::run(&app, &config.seed)?;
    let tally = burst::run(&app, &seeded, &config.burst)?;
    info!(
        likes = tally.likes,
        unlikes = tally.unlikes,
        toggles = tally.toggles,
        rejected = tally.rejected,
        "engagement burst finished"
    );

    let mut drifted = 0;
    for &post_id in &seeded.posts {
        let records = app.post_likes.count_for(post_id)?;
        let cached = app.post_likes.cached_count(post_id)?;
        if cached != Some(records) {
            error!(%post_id, records, ?cached, "like counter out of step with like records");
            drifted += 1;
            app.post_likes.reconcile(post_id)?;
        } else {
            info!(%post_id, likes = records, comments = app.comments.comment_count_for_post(post_id)?, "post consistent");
        }
    }

    if drifted > 0 {
        bail!("{drifted} post(s) had drifting like counters");
    }
    info!(posts = seeded.posts.len(), "all like counters consistent");
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
