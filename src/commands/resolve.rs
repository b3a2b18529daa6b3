//! `taskalign resolve`: show what names canonicalize to.

use std::path::Path;

use crate::alias::{AliasResolver, AliasTable};
use crate::config::{ConfigOverrides, EngineConfig};
use crate::context::ServiceContext;

/// Prints one `name -> canonical` line per name.
///
/// # Errors
///
/// Returns an error string if the config or alias table cannot be loaded.
pub fn run(
    ctx: &ServiceContext,
    names: &[String],
    aliases: Option<&Path>,
    config: Option<&Path>,
) -> Result<u8, String> {
    let overrides =
        ConfigOverrides { alias_file: aliases.map(Path::to_path_buf), ..Default::default() };
    let config =
        EngineConfig::resolve(ctx.fs.as_ref(), config, overrides).map_err(|e| e.to_string())?;
    let table = AliasTable::load(ctx.fs.as_ref(), &config.alias_file).map_err(|e| e.to_string())?;
    let resolver = AliasResolver::new(&table);

    for line in describe(&resolver, names) {
        println!("{line}");
    }
    Ok(0)
}

fn describe(resolver: &AliasResolver, names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| {
            let canonical = resolver.resolve(name);
            let mut line = format!("{name} -> {canonical}");
            if resolver.known(name).is_none() {
                line.push_str(" (not in alias table)");
            }
            if resolver.is_out_of_scope(name) {
                line.push_str(" (out of scope)");
            }
            line
        })
        .collect()
}
