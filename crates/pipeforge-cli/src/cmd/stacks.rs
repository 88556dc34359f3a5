use crate::output::{print_json, print_table};
use pipeforge_core::preset::Preset;

pub fn run(json: bool) -> anyhow::Result<()> {
    if json {
        let presets: Vec<&Preset> = Preset::all().collect();
        return print_json(&presets);
    }

    let rows = Preset::all()
        .map(|p| {
            vec![
                p.stack.to_string(),
                format!("{} {}", p.runtime, p.runtime_version),
                p.port.to_string(),
                p.install_command.to_string(),
                p.test_command.to_string(),
                p.build_command.to_string(),
            ]
        })
        .collect();
    print_table(&["STACK", "RUNTIME", "PORT", "INSTALL", "TEST", "BUILD"], rows);
    Ok(())
}
