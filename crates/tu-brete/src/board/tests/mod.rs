mod common;
mod postings;
