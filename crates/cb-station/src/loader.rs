//! City JSON loader.
//!
//! Decodes the document described in [`record`](crate::record) from a file or
//! any `Read` source.  Fetching the document over HTTP is left to the caller:
//! hand the response body to [`load_city_reader`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::{City, LoadResult};

/// Load a city document from a JSON file.
pub fn load_city_path(path: &Path) -> LoadResult<City> {
    let file = File::open(path)?;
    load_city_reader(BufReader::new(file))
}

/// Like [`load_city_path`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for documents that were
/// fetched elsewhere.
pub fn load_city_reader<R: Read>(reader: R) -> LoadResult<City> {
    Ok(serde_json::from_reader(reader)?)
}
