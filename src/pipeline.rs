use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::fetch::{FetchError, Fetcher};
use crate::model::BookRecord;
use crate::parser::clusters::{cluster_books, BookCluster};
use crate::parser::{assemble_all, isbn};

/// Fetch the index, split it into books, resolve one ISBN per book and
/// assemble the records. The first fetch error aborts the whole run.
pub async fn find_books(
    fetcher: &dyn Fetcher,
    index_url: &str,
    concurrency: usize,
) -> Result<Vec<BookRecord>, FetchError> {
    info!("Fetching book index: {}", index_url);
    let index = fetcher.fetch(index_url).await?;
    let clusters = cluster_books(&index.nodes);
    info!("Found {} book clusters", clusters.len());

    let isbns = resolve_isbns(fetcher, index_url, &clusters, concurrency).await?;

    Ok(assemble_all(&clusters, &isbns))
}

/// One ISBN per cluster, index-aligned with `clusters`.
///
/// At most `concurrency` detail fetches are in flight. Results come back in
/// cluster order and nothing past the first failing cluster is started.
async fn resolve_isbns(
    fetcher: &dyn Fetcher,
    index_url: &str,
    clusters: &[BookCluster],
    concurrency: usize,
) -> Result<Vec<String>, FetchError> {
    let linked = clusters.iter().filter(|c| c.detail_link().is_some()).count();
    let pb = ProgressBar::new(linked as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} detail pages")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    let progress = &pb;

    let isbns = stream::iter(clusters.iter().enumerate())
        .map(move |(i, cluster)| async move {
            let Some(href) = cluster.detail_link() else {
                debug!("Cluster {} has no detail link", i);
                return Ok::<_, FetchError>(isbn::UNAVAILABLE.to_string());
            };
            let page = fetcher.fetch(&resolve_link(index_url, href)).await?;
            let found = isbn::locate(&page.text);
            debug!("Cluster {} resolved ISBN {}", i, found);
            progress.inc(1);
            Ok::<_, FetchError>(found)
        })
        .buffered(concurrency.max(1))
        .try_collect::<Vec<_>>()
        .await;

    pb.finish_and_clear();
    isbns
}

/// Resolve `href` against the index page; fall back to the raw value.
fn resolve_link(index_url: &str, href: &str) -> String {
    url::Url::parse(index_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
