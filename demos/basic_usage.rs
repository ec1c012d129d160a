// SPDX-License-Identifier: MIT
//! Basic usage example for CUBITs documents

use cubits::{encode_byte, Document, DocumentMetadata};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== CUBITs Documents - Basic Usage ===\n");

    // Step 1: Look at a single character run
    println!("1. Encoding one character...");
    let run = encode_byte(b'A');
    println!("   'A' -> {}", String::from_utf8_lossy(&run));

    // Step 2: Build a document
    println!("\n2. Creating document...");
    let mut doc = Document::new();
    doc.set_text("CUBITs keep text in rotated bit matrices.\nSecond line.");
    *doc.metadata_mut() = DocumentMetadata::untitled()
        .with_title("Demo")
        .with_author("example")
        .with_tags(["demo", "cubits"]);

    // Step 3: Save
    println!("\n3. Writing to file...");
    let output_path = std::env::temp_dir().join("cubits_demo.cub");
    doc.save_to(&output_path)?;
    println!("   Written to: {}", output_path.display());
    println!("   File size: {} bytes", std::fs::metadata(&output_path)?.len());

    // Step 4: Load
    println!("\n4. Reading from file...");
    let loaded = Document::open(PathBuf::from(&output_path))?;
    let stats = loaded.stats();
    println!("   {}", loaded.title_line());
    println!("   Title: {}", loaded.metadata().title.as_deref().unwrap_or(""));
    println!("   Tags: {}", loaded.metadata().tags_csv());
    println!(
        "   {} characters, {} words, {} lines",
        stats.characters, stats.words, stats.lines
    );
    assert_eq!(loaded.text(), doc.text());

    println!("\n=== Done ===");
    Ok(())
}
