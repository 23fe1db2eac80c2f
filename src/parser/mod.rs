pub mod assemble;
pub mod clusters;
pub mod isbn;
pub mod nodes;
pub mod normalize;

use crate::model::BookRecord;
use clusters::BookCluster;

/// Zip clusters with their ISBNs (same index) into records, order preserved.
pub fn assemble_all(clusters: &[BookCluster], isbns: &[String]) -> Vec<BookRecord> {
    use rayon::prelude::*;

    clusters
        .par_iter()
        .zip(isbns.par_iter())
        .map(|(cluster, isbn)| assemble::assemble(cluster, isbn))
        .collect()
}
