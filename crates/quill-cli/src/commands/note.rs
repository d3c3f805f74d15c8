use crate::support::{load_graph_or_exit, parse_note_id_or_exit, print_json};
use quill_graph::{Content, LatestRevision, adjacent_notes, comments, latest_revision};
use serde::Serialize;
use std::process;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentView {
    id: String,
    author: String,
    time_sent: u64,
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NoteView {
    id: String,
    latest: LatestRevision,
    newer: Option<String>,
    older: Option<String>,
    comments: Vec<CommentView>,
}

pub fn run(graph: String, note_id: String, json: bool) {
    let store = load_graph_or_exit(&graph);
    let id = parse_note_id_or_exit(&note_id);
    let note = store.graph().get(&id).unwrap_or_else(|| {
        eprintln!("error: note not found: {note_id}");
        process::exit(1);
    });

    let adjacent = adjacent_notes(store.graph(), &id);
    let view = NoteView {
        id: id.to_string(),
        latest: latest_revision(note),
        newer: adjacent.newer.map(|(key, _)| key.to_string()),
        older: adjacent.older.map(|(key, _)| key.to_string()),
        comments: comments(note)
            .children()
            .map(|(key, comment)| CommentView {
                id: key.to_string(),
                author: comment.post.author.clone(),
                time_sent: comment.post.time_sent,
                text: render_contents(&comment.post.contents),
            })
            .collect(),
    };

    if json {
        print_json(&view);
        return;
    }

    println!("quill note {}", view.id);
    println!("  revision: {}", view.latest.revision);
    println!("  title: {}", view.latest.title);
    println!("  author: {}", view.latest.post.author);
    println!("  newer: {}", view.newer.as_deref().unwrap_or("(none)"));
    println!("  older: {}", view.older.as_deref().unwrap_or("(none)"));
    println!();
    for line in view.latest.body.lines() {
        println!("  {line}");
    }
    println!();
    println!("  comments: {}", view.comments.len());
    for comment in &view.comments {
        println!("  - {} {}: {}", comment.id, comment.author, comment.text);
    }
}

fn render_contents(contents: &[Content]) -> String {
    contents
        .iter()
        .map(|block| match block {
            Content::Text(text) => text.clone(),
            Content::Mention(who) => who.clone(),
            Content::Reference(reference) => format!("{}{}", reference.graph, reference.index),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
