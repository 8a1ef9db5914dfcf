// HeritageVault CLI - artifact hashing and verification tool

mod api;

use clap::{Parser, Subcommand};
use colored::Colorize;
use heritagevault_hash::{metadata_hash, verification_hash, ArtifactKind, ArtifactMetadata};

const DEFAULT_API: &str = "http://localhost:5000";

/// HeritageVault - artifact digest & catalog tool
#[derive(Parser)]
#[command(name = "heritagevault")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the content digests for a local artifact image
    Hash {
        /// Path to the image file
        path: String,

        /// Artifact name
        #[arg(long)]
        name: String,

        /// Artifact description
        #[arg(long, default_value = "")]
        description: String,

        /// Artifact type (batik, tenun, carving, kris, other)
        #[arg(long, value_name = "TYPE")]
        kind: String,

        /// Region of origin
        #[arg(long)]
        origin: String,

        /// Price in the smallest currency unit
        #[arg(long)]
        price: i64,
    },
    /// List artifacts registered on a server
    List {
        /// Base URL of the HeritageVault API
        #[arg(long, default_value = DEFAULT_API)]
        api: String,
    },
    /// Show a single artifact
    Show {
        /// Artifact identifier
        id: i32,

        #[arg(long, default_value = DEFAULT_API)]
        api: String,
    },
    /// Ask the server to re-check an artifact against its recorded digests
    Verify {
        /// Artifact identifier
        id: i32,

        #[arg(long, default_value = DEFAULT_API)]
        api: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Hash {
            path,
            name,
            description,
            kind,
            origin,
            price,
        } => handle_hash(&path, name, description, &kind, origin, price),
        Commands::List { api } => handle_list(&api),
        Commands::Show { id, api } => handle_show(&api, id),
        Commands::Verify { id, api } => handle_verify(&api, id),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn handle_hash(
    path: &str,
    name: String,
    description: String,
    kind: &str,
    origin: String,
    price: i64,
) -> anyhow::Result<()> {
    let kind: ArtifactKind = kind.parse()?;
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("failed to read '{}': {}", path, e))?;

    let metadata = ArtifactMetadata {
        name,
        description,
        kind,
        origin,
        price,
    };

    println!("{} {}", "file:".bold(), path);
    println!("{} {} bytes", "size:".bold(), bytes.len());
    println!("{} {}", "metadata hash:".bold(), metadata_hash(&metadata)?);
    println!(
        "{} {}",
        "verification hash:".bold(),
        verification_hash(&metadata, &bytes)?
    );
    Ok(())
}

fn handle_list(api: &str) -> anyhow::Result<()> {
    let artifacts = api::list_artifacts(api)?;
    if artifacts.is_empty() {
        println!("no artifacts registered");
        return Ok(());
    }
    for artifact in artifacts {
        println!("{}", format_artifact_line(&artifact));
    }
    Ok(())
}

fn handle_show(api: &str, id: i32) -> anyhow::Result<()> {
    let artifact = api::get_artifact(api, id)?;
    println!("{}", serde_json::to_string_pretty(&artifact)?);
    Ok(())
}

fn handle_verify(api: &str, id: i32) -> anyhow::Result<()> {
    let outcome = api::verify_artifact(api, id)?;
    let matched = outcome["matched"].as_bool().unwrap_or(false);
    if matched {
        println!(
            "{} artifact {} matches its recorded digests",
            "ok:".green().bold(),
            id
        );
    } else {
        println!(
            "{} artifact {} does not match its recorded digests",
            "mismatch:".red().bold(),
            id
        );
    }
    if let Some(message) = outcome["message"].as_str() {
        println!("{}", message.dimmed());
    }
    Ok(())
}

fn format_artifact_line(artifact: &serde_json::Value) -> String {
    let id = artifact["id"].as_i64().unwrap_or_default();
    let name = artifact["name"].as_str().unwrap_or("?");
    let kind = artifact["type"].as_str().unwrap_or("?");
    let origin = artifact["origin"].as_str().unwrap_or("?");
    let verified = artifact["verified"].as_bool().unwrap_or(false);
    let badge = if verified {
        "verified".green().to_string()
    } else {
        "unverified".yellow().to_string()
    };
    format!("#{id:<4} {name} ({kind}, {origin}) [{badge}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_line_includes_id_and_badge() {
        let artifact = serde_json::json!({
            "id": 7,
            "name": "Batik A",
            "type": "batik",
            "origin": "Solo",
            "verified": false
        });
        let line = format_artifact_line(&artifact);
        assert!(line.starts_with("#7"));
        assert!(line.contains("Batik A"));
        assert!(line.contains("batik"));
        assert!(line.contains("unverified"));
    }
}
