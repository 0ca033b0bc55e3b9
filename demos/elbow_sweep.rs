use tracing_subscriber::EnvFilter;
use wardclust::cluster::{Clustering, Elbow, Ward};
use wardclust::{Dataset, FeatureSchema, Sample};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Three loose groups of token-count profiles.
    let schema = FeatureSchema::new("name", vec!["love".into(), "night".into(), "rain".into()]);
    let rows: [(&str, [f64; 3]); 9] = [
        ("ballad-1", [9.0, 2.0, 1.0]),
        ("ballad-2", [8.0, 3.0, 0.0]),
        ("ballad-3", [10.0, 1.0, 1.0]),
        ("club-1", [1.0, 9.0, 0.0]),
        ("club-2", [0.0, 8.0, 1.0]),
        ("club-3", [2.0, 10.0, 0.0]),
        ("storm-1", [0.0, 2.0, 9.0]),
        ("storm-2", [1.0, 1.0, 11.0]),
        ("storm-3", [0.0, 3.0, 8.0]),
    ];
    let samples = rows
        .iter()
        .map(|(name, v)| Sample::new(*name, v.to_vec()))
        .collect();
    let data = Dataset::new(schema, samples)?;

    let points = Elbow::new().with_max_clusters(6).sweep(&data)?;
    for p in &points {
        match p.log_dissimilarity {
            Some(log) => println!("k={:<2} log10(dissimilarity)={log:.3}", p.clusters_count),
            None => println!("k={:<2} log10(dissimilarity)=n/a", p.clusters_count),
        }
    }

    let labels = Ward::new(3).fit_predict(&data)?;
    for (sample, label) in data.samples().iter().zip(&labels) {
        println!("  {} -> cluster {}", sample.name(), label + 1);
    }

    Ok(())
}
