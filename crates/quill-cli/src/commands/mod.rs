pub mod inbox;
pub mod new_post;
pub mod note;
pub mod notes;
