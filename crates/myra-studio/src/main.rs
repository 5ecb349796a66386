use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use myra_engine::logging::{init_logging, LoggingConfig};
use myra_ui::prelude::*;
use myra_ui::widget::children_of;

const USAGE: &str = "usage: myra-studio <input.xmmp> [output.xmmp]";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let output = args.next().map(PathBuf::from);

    let data = std::fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
    let project = Project::load(&data, Rc::new(Stylesheet::default()))
        .with_context(|| format!("loading {}", input.display()))?;
    log::info!("loaded {}", input.display());

    let export = project.export_options();
    if let Some(class) = &export.class {
        println!("class {}", class);
    }
    match project.root() {
        Some(root) => print_tree(root, 0),
        None => println!("(empty project)"),
    }

    if let Some(output) = output {
        std::fs::write(&output, project.save()).with_context(|| format!("writing {}", output.display()))?;
        log::info!("saved {}", output.display());
    }
    Ok(())
}

fn print_tree(widget: &dyn Widget, depth: usize) {
    let id = &widget.base().id;
    if id.is_empty() {
        println!("{:indent$}{}", "", widget.type_name(), indent = depth * 2);
    } else {
        println!("{:indent$}{} #{}", "", widget.type_name(), id, indent = depth * 2);
    }
    for child in children_of(widget) {
        print_tree(child, depth + 1);
    }
}
