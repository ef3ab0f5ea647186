//! Book Bites: ask for a title, get a sneak peek.
//!
//! | Method | Path         | Description                               |
//! |--------|--------------|-------------------------------------------|
//! | GET    | `/`          | Greeting                                  |
//! | GET    | `/summarize` | Summarize a book by `title` and `author`  |
//! | GET    | `/docs`      | OpenAPI document for the routes above     |

pub mod api;
pub mod config;
pub mod openai;
pub mod samples;
pub mod summarizer;
