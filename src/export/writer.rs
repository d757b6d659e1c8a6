//! Wraps the formatted nodes in the fixed envelope the front-end expects and
//! writes the document to its committed location.

use crate::export::format::FormattedProduct;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination, relative to the invocation directory. The parent directory is
/// expected to exist; a missing directory fails the run.
pub const OUTPUT_PATH: &str = "woonuxt_base/app/data/getProducts.json";

#[derive(Serialize)]
struct Envelope<'a> {
    data: EnvelopeData<'a>,
}

#[derive(Serialize)]
struct EnvelopeData<'a> {
    value: EnvelopeValue<'a>,
}

#[derive(Serialize)]
struct EnvelopeValue<'a> {
    products: EnvelopeProducts<'a>,
}

#[derive(Serialize)]
struct EnvelopeProducts<'a> {
    nodes: &'a [FormattedProduct],
}

/// Serialize with a 4-space indent, matching the formatting of the document
/// the storefront has committed.
fn to_indented_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Write the envelope to `path`, fully overwriting any prior content.
pub fn save_products_to(nodes: &[FormattedProduct], path: &Path) -> Result<PathBuf> {
    let envelope = Envelope {
        data: EnvelopeData {
            value: EnvelopeValue {
                products: EnvelopeProducts { nodes },
            },
        },
    };
    let json = to_indented_json(&envelope)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// Write the envelope to [`OUTPUT_PATH`].
pub fn save_products(nodes: &[FormattedProduct]) -> Result<PathBuf> {
    save_products_to(nodes, Path::new(OUTPUT_PATH))
}
