use crate::support::{load_graph_or_exit, print_json};
use quill_graph::{comments, latest_revision, snippet};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NoteSummary {
    id: String,
    revision: String,
    author: String,
    time_sent: u64,
    title: String,
    snippet: String,
    comments: usize,
}

pub fn run(graph: String, json: bool) {
    let store = load_graph_or_exit(&graph);

    let notes: Vec<NoteSummary> = store
        .roots()
        .map(|(id, note)| {
            let latest = latest_revision(note);
            NoteSummary {
                id: id.to_string(),
                revision: latest.revision.to_string(),
                author: latest.post.author.clone(),
                time_sent: latest.post.time_sent,
                snippet: snippet(&latest.body),
                title: latest.title,
                comments: comments(note).children.len(),
            }
        })
        .collect();

    if json {
        print_json(&notes);
        return;
    }

    println!("quill notes");
    println!("  notes: {}", notes.len());
    for note in &notes {
        let title = if note.title.is_empty() {
            "(untitled)"
        } else {
            note.title.as_str()
        };
        println!(
            "  - {} rev {} {title} [{} comments]",
            note.id, note.revision, note.comments
        );
        if !note.snippet.is_empty() {
            println!("      {}", note.snippet.replace('\n', " "));
        }
    }
}
