//! Generate OpenAPI specification files
//!
//! Writes pretty and compact JSON documents into `attendify-web/docs`.

use attendify_web::openapi::ApiDoc;
use std::fs;
use std::path::Path;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Generating OpenAPI specification files...");

    let docs_dir = Path::new("attendify-web/docs");
    if !docs_dir.exists() {
        fs::create_dir_all(docs_dir)?;
    }

    let openapi = ApiDoc::openapi();

    let json_path = docs_dir.join("openapi.json");
    fs::write(&json_path, openapi.to_pretty_json()?)?;
    println!("Generated: {}", json_path.display());

    // Compact variant for embedding
    let compact_path = docs_dir.join("openapi.compact.json");
    fs::write(&compact_path, serde_json::to_string(&openapi)?)?;
    println!("Generated: {}", compact_path.display());

    Ok(())
}
