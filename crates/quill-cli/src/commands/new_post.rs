use crate::support::print_json;
use quill_graph::{FixedClock, PostFactory};
use tracing::debug;

pub struct Args {
    pub author: String,
    pub title: String,
    pub body: String,
    pub time: Option<u64>,
    pub hash: bool,
}

pub fn run(args: Args) {
    let (key, mut nodes) = match args.time {
        Some(time) => PostFactory::with_clock(FixedClock(time)).new_post(
            &args.author,
            &args.title,
            &args.body,
        ),
        None => PostFactory::new().new_post(&args.author, &args.title, &args.body),
    };
    if args.hash {
        for node in nodes.values_mut() {
            node.compute_hashes();
        }
    }
    debug!(key, hashed = args.hash, "built new post fragment");
    print_json(&nodes);
}
