use crate::commands::{pipeline, render_ranking};
use crate::infra::{load_stations, SourceArgs, WeightArgs};
use clap::Args;
use hikkoshi_lens::config::AppConfig;
use hikkoshi_lens::error::AppError;
use hikkoshi_lens::ranking::{RawWeights, WeightError};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Args, Debug)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    /// Quiet period before an update is applied (defaults to HIKKOSHI_DEBOUNCE_MS)
    #[arg(long)]
    pub(crate) debounce_ms: Option<u64>,
    /// Stations shown after each update
    #[arg(long, default_value_t = 5)]
    pub(crate) top: usize,
}

/// Yields the most recent value once no newer one has arrived for the quiet period.
///
/// Every update restarts the timer; superseded values are dropped. A closed channel flushes
/// the pending value immediately.
pub(crate) struct Debouncer<T> {
    updates: mpsc::Receiver<T>,
    quiet: Duration,
}

impl<T> Debouncer<T> {
    pub(crate) fn new(updates: mpsc::Receiver<T>, quiet: Duration) -> Self {
        Self { updates, quiet }
    }

    pub(crate) async fn next(&mut self) -> Option<T> {
        let mut pending = self.updates.recv().await?;
        loop {
            tokio::select! {
                update = self.updates.recv() => match update {
                    Some(update) => pending = update,
                    None => return Some(pending),
                },
                _ = tokio::time::sleep(self.quiet) => return Some(pending),
            }
        }
    }
}

/// Accepts `access=40 rent=60` pairs or a JSON object of factor weights.
pub(crate) fn parse_update(line: &str) -> Result<RawWeights, WeightError> {
    let line = line.trim();
    if line.starts_with('{') {
        let values: BTreeMap<String, f64> =
            serde_json::from_str(line).map_err(|_| WeightError::Malformed(line.to_string()))?;
        return RawWeights::try_from(values);
    }
    RawWeights::parse_pairs(line)
}

pub(crate) async fn run_watch(args: WatchArgs, config: &AppConfig) -> Result<(), AppError> {
    let quiet = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.session.quiet_period());
    let stations = load_stations(&args.source, config)?;
    let pipeline = pipeline(config, None)?;

    let mut ranked = pipeline.rank(&stations, &args.weights.raw()?)?;
    ranked.truncate(args.top);
    render_ranking(&ranked);
    println!("\nEnter weights (e.g. access=40 rent=60), Ctrl-D to finish");

    let (sender, receiver) = mpsc::channel(32);
    let reader = tokio::spawn(read_updates(sender));
    let mut debouncer = Debouncer::new(receiver, quiet);

    while let Some(weights) = debouncer.next().await {
        let normalized = weights.normalize();
        let summary = normalized
            .iter()
            .map(|(factor, weight)| format!("{factor} {weight:.0}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("\nWeights: {summary}");

        let mut ranked = pipeline.rank(&stations, &weights)?;
        ranked.truncate(args.top);
        render_ranking(&ranked);
    }

    reader.await.map_err(std::io::Error::other)??;
    Ok(())
}

async fn read_updates(sender: mpsc::Sender<RawWeights>) -> Result<(), std::io::Error> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_update(&line) {
            Ok(weights) => {
                if sender.send(weights).await.is_err() {
                    break;
                }
            }
            Err(err) => tracing::warn!(error = %err, "ignoring weight update"),
        }
    }
    Ok(())
}
