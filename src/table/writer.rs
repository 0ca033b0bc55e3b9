use crate::cluster::Cluster;
use crate::error::Result;
use crate::sample::Dataset;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write cluster membership as CSV.
///
/// `cluster_number` is 1-based over `clusters` in the order given.
pub fn write_clusters<W: Write>(writer: W, dataset: &Dataset, clusters: &[Cluster]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["cluster_number".to_string(), "sample_name".to_string()];
    header.extend(dataset.schema().names().iter().cloned());
    wtr.write_record(&header)?;

    for (i, cluster) in clusters.iter().enumerate() {
        let number = (i + 1).to_string();
        for sample in cluster.samples(dataset) {
            let mut row = Vec::with_capacity(header.len());
            row.push(number.clone());
            row.push(sample.name().to_string());
            row.extend(sample.values().iter().map(|v| v.to_string()));
            wtr.write_record(&row)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// `<dir>/<prefix>_<YYYYMMDDHHMM>.csv`.
pub fn output_path(dir: impl AsRef<Path>, prefix: &str, at: DateTime<Local>) -> PathBuf {
    dir.as_ref()
        .join(format!("{prefix}_{}.csv", at.format("%Y%m%d%H%M")))
}

/// Write cluster membership to a timestamped file under `dir`, creating it if needed.
pub fn save_clusters(
    dir: impl AsRef<Path>,
    prefix: &str,
    dataset: &Dataset,
    clusters: &[Cluster],
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = output_path(dir, prefix, Local::now());
    write_clusters(File::create(&path)?, dataset, clusters)?;
    tracing::info!(path = %path.display(), clusters = clusters.len(), "saved cluster membership");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Ward;
    use crate::table::TableReader;
    use chrono::TimeZone;

    #[test]
    fn test_write_groups_rows_by_cluster() {
        let table = "name,a,b\np,0,0\nq,10,10\nr,1,0\n";
        let ds = TableReader::new().load(table.as_bytes()).unwrap();
        let clusters = Ward::new(2).cluster(&ds).unwrap();

        let mut buf = Vec::new();
        write_clusters(&mut buf, &ds, &clusters).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "cluster_number,sample_name,a,b");
        // q survives in place; {p, r} is appended after it.
        assert_eq!(&lines[1..], &["1,q,10,10", "2,p,0,0", "2,r,1,0"]);
    }

    #[test]
    fn test_output_path_embeds_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        let path = output_path("csv", "ward_method_result", at);
        assert_eq!(path, Path::new("csv/ward_method_result_202403090705.csv"));
    }
}
