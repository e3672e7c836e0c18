//! The `quizdeck init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizdeck.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("data").context("failed to create data directory")?;
    write_if_missing(Path::new("data/manifest.json"), SAMPLE_MANIFEST)?;
    write_if_missing(Path::new("data/compute-questions.json"), COMPUTE_QUESTIONS)?;
    write_if_missing(Path::new("data/storage-questions.json"), STORAGE_QUESTIONS)?;

    println!("\nNext steps:");
    println!("  1. Add questions under data/ and list the files in data/manifest.json");
    println!("  2. Run: quizdeck validate");
    println!("  3. Run: quizdeck play --tags EC2");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdeck configuration

manifest = "manifest.json"
default_profile = "all"
# seed = 42

[source]
type = "directory"
path = "data"

# Serve the same layout over HTTP instead:
# [source]
# type = "http"
# base_url = "https://example.org/quiz-data"
# timeout_secs = 30
"#;

const SAMPLE_MANIFEST: &str = r#"{
    "files": [
        "compute-questions.json",
        "storage-questions.json"
    ],
    "profiles": {
        "compute": ["compute-questions.json"],
        "storage": ["storage-questions.json"]
    }
}
"#;

const COMPUTE_QUESTIONS: &str = r#"[
    {
        "id": "compute-1",
        "type": "multiple-choice",
        "question": "Which EC2 instance family earns CPU credits while idle?",
        "options": [
            "M (general purpose)",
            "T (burstable)",
            "C (compute optimized)",
            "R (memory optimized)"
        ],
        "correctIndex": 1,
        "explanation": "T instances accrue CPU credits below their baseline and spend them when bursting.",
        "tags": ["EC2"]
    },
    {
        "id": "compute-2",
        "type": "multiple-choice",
        "question": "What is the maximum execution time of a single Lambda invocation?",
        "options": ["5 minutes", "15 minutes", "1 hour", "Unlimited"],
        "correctIndex": 1,
        "tags": ["Lambda"]
    },
    {
        "id": "compute-3",
        "type": "open-ended",
        "question": "Which EC2 purchasing option can be interrupted with a two-minute warning?",
        "answer": "Spot Instances",
        "tags": ["EC2", "Cost"]
    }
]
"#;

const STORAGE_QUESTIONS: &str = r#"[
    {
        "id": "storage-1",
        "type": "multiple-choice",
        "question": "Which S3 storage class suits rarely accessed archives with retrieval times of hours?",
        "options": [
            "S3 Standard",
            "S3 Intelligent-Tiering",
            "S3 Glacier Deep Archive",
            "S3 One Zone-IA"
        ],
        "correctIndex": 2,
        "explanation": "Deep Archive is the lowest-cost class, with retrievals measured in hours.",
        "tags": ["S3", "Cost"]
    },
    {
        "id": "storage-2",
        "type": "open-ended",
        "question": "Which EBS volume type offers the highest provisioned IOPS?",
        "answer": "io2 Block Express",
        "tags": ["EBS"]
    }
]
"#;
