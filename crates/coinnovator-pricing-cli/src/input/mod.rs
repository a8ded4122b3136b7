pub mod catalog;
pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// A JSON request from `--input <file>` if given, otherwise from piped stdin.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => file::read_json(p).map(Some),
        None => stdin::read_stdin(),
    }
}
