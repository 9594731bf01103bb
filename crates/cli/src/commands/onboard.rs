//! `careerchat onboard`: first-time setup.

use std::path::{Path, PathBuf};

use careerchat_config::{AppConfig, DEFAULT_CONFIG_FILE};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let defaults = AppConfig::default();

    println!("careerchat, first-time setup");
    println!("============================\n");

    // Knowledge directory
    if let Some(dir) = defaults.knowledge.summary.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created knowledge directory: {}", dir.display());
        }
    }

    let summary_path = &defaults.knowledge.summary;
    if !summary_path.exists() {
        std::fs::write(
            summary_path,
            concat!(
                "Write a short professional summary here.\n\n",
                "The chatbot answers questions about your career, education,\n",
                "experience and projects from this file and your profile PDF.\n",
            ),
        )?;
        println!("✅ Created {}", summary_path.display());
    }

    if !defaults.knowledge.profile_pdf.exists() {
        println!(
            "   Add your profile PDF (e.g. a LinkedIn export) at: {}",
            defaults.knowledge.profile_pdf.display()
        );
    }

    // Config file
    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set [persona] name and check [provider] in {}", config_path.display());
        println!("   2. Export TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID for lead notifications");
        println!("   3. Run: careerchat chat\n");
    }

    println!("🎉 Setup complete! Run `careerchat chat` to start chatting.\n");

    Ok(())
}
