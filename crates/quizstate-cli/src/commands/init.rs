//! The `quizstate init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizstate.toml").exists() {
        println!("quizstate.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write("quizstate.toml", SAMPLE_CONFIG)?;
    println!("Created quizstate.toml");

    println!("\nNext steps:");
    println!("  1. Edit quizstate.toml to choose where state is kept");
    println!("  2. Run: quizstate answer save intro-1 B --correct");
    println!("  3. Run: quizstate status");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizstate configuration

[backend]
type = "file"
data_dir = "./quizstate-data"
origin = "default"
# Bytes allowed per origin; 0 disables the limit.
quota_bytes = 5242880
read_only = false
"#;
