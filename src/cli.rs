//! Minimal CLI: read XLR nodes → (effective | conditional | reference | fill | properties)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::{debug, info};
use xlr_resolve::{
    compute_effective_object, fill_in_generics, fill_in_own_generics, make_property_map, resolve_conditional,
    resolve_reference_node, GenericMap, NodeType, SyntaxNode,
};

use crate::path_de::read_json;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// resolve and compose XLR type nodes stored as JSON
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// merge an object type with the object type it extends
    Effective(EffectiveOut),
    /// evaluate conditional types whose operands are known primitives
    Conditional(ConditionalOut),
    /// instantiate a generic reference against its target type
    Reference(ReferenceOut),
    /// substitute generic symbols
    Fill(FillOut),
    /// list the property keys of a JSON document, quoted where needed
    Properties(PropertiesOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct EffectiveOut {
    /// the extending object type
    #[arg(long)]
    base: PathBuf,

    /// the object type being extended
    #[arg(long)]
    operand: PathBuf,

    /// let operand win on conflicting properties instead of failing
    #[arg(long, default_value_t = false)]
    allow_overlap: bool,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct ConditionalOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct ReferenceOut {
    /// the `ref` node, with its generic arguments / indexed property
    #[arg(long)]
    reference: PathBuf,

    /// the type the reference points at
    #[arg(long)]
    target: PathBuf,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct FillOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// JSON object of symbol → node; without it each node's own token defaults are used
    #[arg(long)]
    generics: Option<PathBuf>,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct PropertiesOut {
    /// JSON document whose top-level object is mapped
    #[arg(long, short)]
    input: PathBuf,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Read every input in parallel and apply `f`; results keep input order.
    fn load_process<F>(&self, f: F) -> Result<Vec<NodeType>>
    where
        F: Fn(&Path, NodeType) -> Result<NodeType> + Sync,
    {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        debug!(inputs = source_paths.len(), "resolved input paths");
        source_paths
            .par_iter()
            .map(|source_path| {
                let node = read_json::<NodeType>(source_path)?;
                f(source_path, node)
            })
            .collect()
    }
}

impl OutputSettings {
    fn emit(&self, nodes: Vec<NodeType>) -> Result<()> {
        let src = match nodes.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            _ => serde_json::to_string_pretty(&nodes)?,
        };
        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, &src).with_context(|| format!("failed to write {}", out.display()))?;
                info!(out = %out.display(), "wrote result");
            }
            None => println!("{src}"),
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Effective(target) => {
                if target.output_settings.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let base = expect_object(&target.base, read_json::<NodeType>(&target.base)?)?;
                let operand = expect_object(&target.operand, read_json::<NodeType>(&target.operand)?)?;
                let effective = compute_effective_object(&base, &operand, !target.allow_overlap)?;
                target.output_settings.emit(vec![NodeType::Object(effective)])
            }
            Command::Conditional(target) => {
                if target.output_settings.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let resolved = target.input_settings.load_process(|path, node| match node {
                    NodeType::Conditional(conditional) => Ok(resolve_conditional(&conditional)),
                    other => bail!("{}: expected a conditional node, found `{}`", path.display(), other.kind_name()),
                })?;
                target.output_settings.emit(resolved)
            }
            Command::Reference(target) => {
                if target.output_settings.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let reference = match read_json::<NodeType>(&target.reference)? {
                    NodeType::Ref(reference) => reference,
                    other => bail!(
                        "{}: expected a ref node, found `{}`",
                        target.reference.display(),
                        other.kind_name()
                    ),
                };
                let resolved = resolve_reference_node(&reference, &read_json::<NodeType>(&target.target)?);
                target.output_settings.emit(vec![resolved])
            }
            Command::Fill(target) => {
                if target.output_settings.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let generics = target.generics.as_deref().map(read_json::<GenericMap>).transpose()?;
                let filled = target.input_settings.load_process(|_, node| {
                    Ok(match &generics {
                        Some(generics) => fill_in_generics(&node, generics),
                        None => fill_in_own_generics(&node),
                    })
                })?;
                target.output_settings.emit(filled)
            }
            Command::Properties(target) => {
                let document = read_json::<serde_json::Value>(&target.input)?;
                let tree = SyntaxNode::from_value(&document);
                for (key, value) in make_property_map(&tree) {
                    println!("{key}\t{:?}", value.kind);
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn expect_object(path: &Path, node: NodeType) -> Result<xlr_resolve::ObjectType> {
    match node {
        NodeType::Object(object) => Ok(object),
        other => bail!("{}: expected an object node, found `{}`", path.display(), other.kind_name()),
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // explicit glob that matched nothing is almost always a typo
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
