use anyhow::Context;
use pr_agent_core::{config::Config, io, paths, templates::TemplateCatalog};
use std::path::Path;

/// Scaffold `.pr-agent/config.yaml` and the default PR templates. Existing
/// files are never overwritten.
pub fn run(root: &Path, config: &Config) -> anyhow::Result<()> {
    println!("Initializing pr-agent in: {}", root.display());

    // 1. .pr-agent/config.yaml (written with defaults only, never with env overrides)
    io::ensure_dir(&paths::agent_dir(root))
        .with_context(|| format!("failed to create {}", paths::AGENT_DIR))?;
    if paths::config_path(root).exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
    } else {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    }

    // 2. Default PR templates
    let catalog = TemplateCatalog::with_defaults(config.templates_path(root));
    let created = catalog
        .scaffold()
        .with_context(|| format!("failed to write templates in {}", catalog.dir().display()))?;
    let rel = config.templates_dir.display();
    if created.is_empty() {
        println!("  exists:  {rel}/ (all templates present)");
    }
    for name in &created {
        println!("  created: {rel}/{name}");
    }

    println!("\nNext: point your agent host at `pr-agent serve`.");
    Ok(())
}
