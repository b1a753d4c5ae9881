//! `backpack show` - print the desired-state graph.

use crate::ui;
use anyhow::Result;

pub fn run(config_path: &str) -> Result<()> {
    let (_, registry) = super::load_graph(config_path)?;

    for org in registry.organizations() {
        ui::header(&format!("Organization {}", org.name));

        for team in org.teams() {
            println!("  team {} ({})", team.name, team.permission);
            for (repository, level) in org.repositories_for_team(&team.name) {
                ui::dim(&format!("  {} ({})", repository.name, level));
            }
        }

        for repository in org.repositories() {
            println!("  repository {}", repository.name);
            if !repository.description.is_empty() {
                ui::kv("  description", &repository.description);
            }
            if !repository.homepage.is_empty() {
                ui::kv("  homepage", &repository.homepage);
            }
            ui::kv(
                "  flags",
                &format!(
                    "private={} issues={} wiki={} downloads={}",
                    repository.private, repository.issues, repository.wiki, repository.downloads
                ),
            );
            if !repository.topics.is_empty() {
                ui::kv("  topics", &repository.topics.join(", "));
            }
            if !repository.tags.is_empty() {
                ui::kv("  tags", &repository.tags.join(", "));
            }
            for hook in repository.hooks() {
                let events = hook.sorted_events().join(", ");
                ui::dim(&format!(
                    "  hook {} ({}) [{}] active={}",
                    hook.name,
                    hook.hook_type(),
                    events,
                    hook.active
                ));
            }
        }
    }
    Ok(())
}
