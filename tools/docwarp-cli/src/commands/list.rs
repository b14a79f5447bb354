//! List the effect catalog.

use docwarp_common::config::AppConfig;
use docwarp_effect_catalog::EffectGroup;
use serde::Serialize;

#[derive(Serialize)]
struct GroupListing<'a> {
    group: EffectGroup,
    effects: Vec<&'a str>,
}

pub fn run(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let catalog = super::catalog(config);
    let groups = catalog.groups();

    if json {
        let listing: Vec<GroupListing<'_>> = groups
            .iter()
            .map(|(group, effects)| GroupListing {
                group: *group,
                effects: effects.iter().map(|d| d.effect_id.as_str()).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{} effects in {} families", catalog.len(), groups.len());
    for (group, effects) in &groups {
        println!();
        println!("{group}");
        for descriptor in effects {
            println!("  {}", descriptor.effect_id);
        }
    }

    Ok(())
}
