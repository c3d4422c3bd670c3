//! oil-compare: side-by-side fatty-acid comparison of two soap oils
//!
//! Usage:
//!   oil-compare <id-a> <id-b>                  # compare two oils from the bundled catalogue
//!   oil-compare <id-a> <id-b> <catalogue.json> # compare two oils from a custom catalogue
//!
//! Prints one JSON object: similarity (0-1), per-acid absolute differences and the
//! dominant acid of each oil. Exit 2 on bad usage or unknown ids.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::process;

use soap_engine::similarity::similarity;
use soap_engine::types::{FattyAcid, OilProfile};
use soap_engine::Catalogue;

#[derive(serde::Serialize)]
struct Comparison<'a> {
    a: &'a str,
    b: &'a str,
    similarity: f64,
    differences: BTreeMap<&'static str, f64>,
    dominant: BTreeMap<&'a str, &'static str>,
}

fn load_catalogue(path: Option<&String>) -> Catalogue {
    let loaded = match path {
        Some(path) => {
            let contents = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("oil-compare: cannot read {}: {}", path, e);
                process::exit(2);
            });
            Catalogue::from_json(&contents)
        }
        None => Catalogue::bundled(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("oil-compare: invalid catalogue: {}", e);
        process::exit(2);
    })
}

fn lookup<'c>(catalogue: &'c Catalogue, id: &str) -> &'c OilProfile {
    catalogue.get(id).unwrap_or_else(|| {
        eprintln!("oil-compare: unknown oil id {}", id);
        process::exit(2);
    })
}

fn compare<'a>(a: &'a OilProfile, b: &'a OilProfile) -> Comparison<'a> {
    let differences = FattyAcid::ALL
        .iter()
        .map(|&acid| {
            let diff = (a.fatty_acids.get(acid) - b.fatty_acids.get(acid)).abs();
            (acid.name(), diff)
        })
        .collect();

    let mut dominant = BTreeMap::new();
    dominant.insert(a.id.as_str(), a.fatty_acids.dominant().name());
    dominant.insert(b.id.as_str(), b.fatty_acids.dominant().name());

    Comparison {
        a: &a.id,
        b: &b.id,
        similarity: (similarity(a, b) * 1000.0).round() / 1000.0,
        differences,
        dominant,
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: oil-compare <id-a> <id-b> [catalogue.json]");
        process::exit(2);
    }

    let catalogue = load_catalogue(args.get(2));
    let a = lookup(&catalogue, &args[0]);
    let b = lookup(&catalogue, &args[1]);

    match serde_json::to_string_pretty(&compare(a, b)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("oil-compare: {}", e);
            process::exit(1);
        }
    }
}
