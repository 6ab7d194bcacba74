pub mod crack;
pub mod decrypt;
pub mod periods;
pub mod seed;

use runeforge::RfResult;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Reads a document from `path`, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> RfResult<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(fs::read_to_string(path)?)
}
