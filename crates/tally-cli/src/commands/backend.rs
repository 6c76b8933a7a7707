//! Text-generation backend diagnostics

use anyhow::Result;
use tally_core::{AIClient, TextGenBackend};

/// Test the configured backend: connectivity plus one sample generation
pub async fn cmd_backend() -> Result<()> {
    println!("🔍 Testing text-generation backend...\n");

    let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());
    println!("  AI_BACKEND: {}", backend);

    let Some(client) = AIClient::from_env() else {
        println!("\n⚠️  Backend not configured.");
        println!("\nTo set up Ollama:");
        println!("  1. Install Ollama: https://ollama.ai/download");
        println!("  2. Start the server: ollama serve");
        println!("  3. Pull a model: ollama pull llama3.2");
        println!("  4. Set environment variable: export OLLAMA_HOST=http://localhost:11434");
        return Ok(());
    };

    println!("  Host:  {}", client.host());
    println!("  Model: {}\n", client.model());

    print!("Checking availability... ");
    if !client.health_check().await {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach the backend at {}", client.host());
        return Ok(());
    }
    println!("✅ Connected");

    print!("Running sample generation... ");
    match client
        .generate("Reply with the single word: ready")
        .await
    {
        Ok(response) => {
            let preview: String = response.chars().take(60).collect();
            println!("✅ \"{}\"", preview.trim());
        }
        Err(e) => println!("❌ Error: {}", e),
    }

    Ok(())
}
