use std::path::Path;

use crate::cli::{
    commands::usage,
    context::{CommandResult, ShellContext},
    output,
    registry::CommandEntry,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write the whole ledger to a JSON file",
            "export <path>",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Replace the ledger with a JSON export",
            "import <path>",
            cmd_import,
        ),
        CommandEntry::new(
            "backup",
            "List or restore automatic backups",
            "backup list | backup restore <id>",
            cmd_backup,
        )
        .with_subcommands(&["list", "restore"]),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage("export <path>"));
    };
    let path = Path::new(path);
    context.manager.export_to_path(path)?;
    output::success(format!("Exported ledger to {}.", path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage("import <path>"));
    };
    if context.manager.is_initialized()
        && !context.confirm("Replace the current ledger with the imported one?")?
    {
        output::info("Import cancelled.");
        return Ok(());
    }
    let path = Path::new(path);
    context.manager.import_from_path(path)?;
    let data = context.manager.data()?;
    output::success(format!(
        "Imported {} record(s) from {}.",
        data.records.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["list"] => {
            let backups = context.storage.list_backups()?;
            output::section("Backups");
            if backups.is_empty() {
                output::info("No backups yet. One is written before every save.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = backups
                .iter()
                .map(|backup| {
                    vec![
                        backup.id.clone(),
                        backup
                            .created_at
                            .map(|stamp| stamp.format("%Y-%m-%d %H:%M:%S").to_string())
                            .unwrap_or_default(),
                        format!("{} B", backup.size_bytes),
                    ]
                })
                .collect();
            output::table(&["Id", "Created (UTC)", "Size"], &rows);
            Ok(())
        }
        ["restore", id] => {
            if !context.confirm("Replace the current ledger with this backup?")? {
                output::info("Restore cancelled.");
                return Ok(());
            }
            context.storage.restore_backup(id)?;
            for warning in context.manager.reload()? {
                output::warning(warning);
            }
            output::success(format!("Restored backup {id}."));
            Ok(())
        }
        _ => Err(usage("backup list | backup restore <id>")),
    }
}
