use quill_graph::{GraphNode, GraphStore};
use quill_kernel::{BigIntOrderedMap, BigUint};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::process;

pub fn load_json_or_exit<T: DeserializeOwned>(path: &str, what: &str) -> T {
    let raw = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {what} at {path}: {e}");
        process::exit(1);
    });
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        eprintln!("error: invalid {what} at {path}: {e}");
        process::exit(1);
    })
}

pub fn load_graph_or_exit(path: &str) -> GraphStore {
    let graph: BigIntOrderedMap<GraphNode> = load_json_or_exit(path, "notebook graph");
    GraphStore::from_graph(graph).unwrap_or_else(|e| {
        eprintln!("error: invalid notebook graph at {path}: {e}");
        process::exit(1);
    })
}

pub fn parse_note_id_or_exit(raw: &str) -> BigUint {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("error: invalid note id `{raw}`: {e}");
        process::exit(1);
    })
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization")
    );
}
