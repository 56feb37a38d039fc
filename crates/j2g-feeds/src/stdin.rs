//! Standard input feed, for `journalctl -o json | j2g --stdin <dest>`.

use tokio::io::{BufReader, Stdin};

pub fn stdin_reader() -> BufReader<Stdin> {
    BufReader::new(tokio::io::stdin())
}
