//! Codec passes on their own, without loading the document.

use std::path::Path;

use color_eyre::eyre::Result;
use mdfront_core::frontmatter::codec;

use super::read;

pub fn decode(path: &Path) -> Result<()> {
    println!("{}", codec::decode(&read(path)?));
    Ok(())
}

pub fn encode(path: &Path) -> Result<()> {
    println!("{}", codec::encode(&read(path)?));
    Ok(())
}
