use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use tokenfield::cli::CliArgs;
use tokenfield::model::EditorModel;
use tokenfield::script::{load_script_file, replay, Step, StepRecord};
use tokenfield::Msg;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let startup = args.into_config().map_err(|e| anyhow!(e))?;

    tokenfield::tracing::init();

    let (script_preset, steps) = match &startup.script {
        Some(path) => {
            let script = load_script_file(path).map_err(|e| anyhow!(e))?;
            (script.preset, script.steps)
        }
        None => (None, stdin_steps().context("Failed to read stdin")?),
    };

    let config = startup
        .resolve_editor_config(script_preset.as_deref())
        .map_err(|e| anyhow!(e))?;
    tracing::info!(?config, steps = steps.len(), "replaying");

    let mut model = EditorModel::new(config);
    let records = replay(&mut model, &steps);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if startup.json {
        let report = serde_json::json!({
            "steps": records,
            "final": model.snapshot(),
            "history": model.history.entries(),
        });
        serde_json::to_writer_pretty(&mut out, &report).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        print_records(&mut out, &records)?;
        writeln!(out, "final: {}", model.snapshot())?;
        writeln!(out, "history:")?;
        for entry in model.history.entries() {
            writeln!(out, "  {} x{}", entry.snapshot, entry.repeat_count)?;
        }
    }
    Ok(())
}

/// Each stdin line is typed and submitted with Enter
fn stdin_steps() -> io::Result<Vec<Step>> {
    let mut steps = Vec::new();
    for line in io::stdin().lock().lines() {
        steps.push(Step::Send(Msg::insert(line?)));
        steps.push(Step::Send(Msg::enter()));
    }
    Ok(steps)
}

fn print_records(out: &mut impl Write, records: &[StepRecord]) -> Result<()> {
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, record.step)?;
        writeln!(out, "     tree: [{}]", record.tree.join(" "))?;
        for notification in &record.notifications {
            writeln!(out, "     -> {:?}", notification)?;
        }
    }
    Ok(())
}
