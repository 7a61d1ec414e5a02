//! Fetch-then-select run with operator progress messages

use crate::error::Result;
use crate::proxy::models::{FetchOutcome, RankedProxy};
use crate::proxy::selector::best_latency;
use crate::proxy::{LatencyProbe, ProxyFetcher, ProxySelector};
use std::io::Write;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed {
        fetched: usize,
        selected: Vec<RankedProxy>,
    },
    /// The fetch was rejected or returned an empty list
    NothingProcessed,
}

/// Run one full fetch, probe and select cycle.
///
/// Progress lines are written to `out`. A rejected fetch ends the run
/// with [`RunOutcome::NothingProcessed`]; transport and file errors are
/// returned.
pub async fn run<P, W>(
    fetcher: &ProxyFetcher,
    selector: &ProxySelector<P>,
    out: &mut W,
) -> Result<RunOutcome>
where
    P: LatencyProbe,
    W: Write,
{
    writeln!(out, "Fetching proxies...")?;
    let outcome = fetcher.fetch().await?;
    report_fetch(&outcome, out)?;

    let proxies = outcome.into_proxies();
    if proxies.is_empty() {
        writeln!(out, "No proxies were processed.")?;
        return Ok(RunOutcome::NothingProcessed);
    }

    writeln!(out, "Testing proxy latency...")?;
    let selected = selector.select(&proxies).await?;
    writeln!(
        out,
        "{} filtered proxies saved to '{}'",
        selected.len(),
        selector.config().output_path.display()
    )?;
    if let Some(best) = best_latency(&selected) {
        writeln!(out, "Fastest proxy: {}", best)?;
    }
    writeln!(out, "Done!")?;

    Ok(RunOutcome::Completed {
        fetched: proxies.len(),
        selected,
    })
}

/// Write the operator message for a fetch result
pub fn report_fetch<W: Write>(outcome: &FetchOutcome, out: &mut W) -> Result<()> {
    match outcome {
        FetchOutcome::Saved { proxies, path } => {
            writeln!(out, "{} proxies saved to '{}'", proxies.len(), path.display())?
        }
        FetchOutcome::Rejected { status } => {
            writeln!(out, "Failed to fetch proxies (HTTP {}).", status)?
        }
    }
    Ok(())
}
