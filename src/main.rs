mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, info};

use tessel_config::{DocumentFormat, FieldPath, ReconcilerConfig, ViewKind};
use tessel_overrides::override_service;
use tessel_reconcile::Reconciler;

/// Tessel - runtime input reconciliation for pipeline and service documents
#[derive(Parser)]
#[command(name = "tessel")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Reconciler config file (default: ~/.tessel/config.yaml or config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Log level used when RUST_LOG is not set
  #[arg(long, global = true, default_value = "warn")]
  log_level: String,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// List runtime input paths of a template
  Fields {
    /// Template file (JSON or YAML)
    template: PathBuf,

    /// Only list fields under this path
    #[arg(long)]
    base: Option<FieldPath>,
  },

  /// Check that required runtime inputs are filled in
  Validate {
    /// Template file (JSON or YAML)
    template: PathBuf,

    /// Data document (input set) to check
    data: PathBuf,

    /// View the data is validated for
    #[arg(long, default_value = "deployment_form", value_parser = parse_view)]
    view: ViewKind,
  },

  /// Classify every template leaf against a data document
  Describe {
    template: PathBuf,
    data: PathBuf,

    #[arg(long, default_value = "deployment_form", value_parser = parse_view)]
    view: ViewKind,
  },

  /// Produce input control descriptors for a template's runtime inputs
  Render {
    template: PathBuf,

    /// Prefix prepended to every data binding
    #[arg(long)]
    prefix: Option<FieldPath>,
  },

  /// Fill a template from input sets, later sets winning
  Merge {
    template: PathBuf,

    #[arg(required = true)]
    input_sets: Vec<PathBuf>,
  },

  /// Print the runtime-only skeleton of a template
  Skeleton { template: PathBuf },

  /// Replace leftover runtime markers in a data document with empty values
  Clear { template: PathBuf, data: PathBuf },

  /// Apply an override document to a service definition
  Override {
    /// Service definition file
    service: PathBuf,

    /// Override document with variables, manifests, configFiles, ...
    overrides: PathBuf,
  },
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();
  logging::init(&cli.log_level);

  let Some(command) = cli.command else {
    println!("tessel - use --help to see available commands");
    return Ok(ExitCode::SUCCESS);
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_async(command, cli.config).await })
}

async fn run_async(command: Commands, config_path: Option<PathBuf>) -> Result<ExitCode> {
  let reconciler = load_reconciler(config_path).await?;

  match command {
    Commands::Fields { template, base } => {
      let template = read_document(&template).await?;
      let base = base.unwrap_or_default();
      for path in reconciler.collect_runtime_fields(&template, &base) {
        println!("{path}");
      }
    }
    Commands::Validate {
      template,
      data,
      view,
    } => {
      let (template, data) = tokio::try_join!(read_document(&template), read_document(&data))?;
      let errors = reconciler.validate(&data, &template, view);
      print_json(&errors.to_value())?;
      if !errors.is_empty() {
        info!(errors = errors.len(), "validation failed");
        return Ok(ExitCode::FAILURE);
      }
    }
    Commands::Describe {
      template,
      data,
      view,
    } => {
      let (template, data) = tokio::try_join!(read_document(&template), read_document(&data))?;
      let fields = reconciler.describe_fields(&template, &data, view);
      print_json(&fields)?;
    }
    Commands::Render { template, prefix } => {
      let template = read_document(&template).await?;
      let prefix = prefix.unwrap_or_default();
      let fields: Vec<_> = reconciler.render_runtime_inputs(&template, &prefix).collect();
      print_json(&fields)?;
    }
    Commands::Merge {
      template,
      input_sets,
    } => {
      let (template, sets) = tokio::try_join!(
        read_document(&template),
        read_documents(&input_sets),
      )?;
      let outcome = reconciler.merge_input_sets(&template, &sets);
      print_json(&outcome)?;
      if !outcome.is_complete() {
        return Ok(ExitCode::FAILURE);
      }
    }
    Commands::Skeleton { template } => {
      let template = read_document(&template).await?;
      match reconciler.runtime_skeleton(&template) {
        Some(skeleton) => print_json(&skeleton)?,
        None => eprintln!("template has no runtime inputs"),
      }
    }
    Commands::Clear { template, data } => {
      let (template, data) = tokio::try_join!(read_document(&template), read_document(&data))?;
      print_json(&reconciler.clear_runtime_inputs(&data, &template))?;
    }
    Commands::Override {
      service,
      overrides,
    } => {
      let (service, overrides) =
        tokio::try_join!(read_document(&service), read_document(&overrides))?;
      let result = override_service(&service, &overrides).context("failed to apply overrides")?;
      print_json(&result)?;
    }
  }

  Ok(ExitCode::SUCCESS)
}

async fn load_reconciler(config_path: Option<PathBuf>) -> Result<Reconciler> {
  let path = config_path.or_else(default_config_path);
  let Some(path) = path else {
    return Reconciler::new(ReconcilerConfig::default()).context("invalid reconciler config");
  };
  let content = tokio::fs::read_to_string(&path)
    .await
    .with_context(|| format!("failed to read config file: {}", path.display()))?;
  debug!(path = %path.display(), "loading config");
  Reconciler::load(&content, DocumentFormat::from_path(&path))
    .with_context(|| format!("invalid config file: {}", path.display()))
}

/// First existing `~/.tessel/config.{yaml,yml,json}`.
fn default_config_path() -> Option<PathBuf> {
  let dir = dirs::home_dir()?.join(".tessel");
  ["config.yaml", "config.yml", "config.json"]
    .into_iter()
    .map(|name| dir.join(name))
    .find(|path| path.is_file())
}

async fn read_document(path: &Path) -> Result<Value> {
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read file: {}", path.display()))?;
  DocumentFormat::from_path(path)
    .parse(&content)
    .with_context(|| format!("failed to parse file: {}", path.display()))
}

/// Read every document concurrently, keeping the order of `paths`.
async fn read_documents(paths: &[PathBuf]) -> Result<Vec<Value>> {
  try_join_all(paths.iter().map(|path| read_document(path))).await
}

fn parse_view(text: &str) -> Result<ViewKind, String> {
  serde_json::from_value(Value::String(text.to_string())).map_err(|_| {
    format!(
      "unknown view '{text}' (expected deployment_form, input_set_form, trigger_form or template_editor)"
    )
  })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tessel-{}-{name}", std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
  }

  #[tokio::test]
  async fn test_read_documents_keeps_order() {
    let first = write_temp("first.yaml", "a: one\n");
    let second = write_temp("second.json", r#"{ "a": "two" }"#);

    let docs = read_documents(&[first.clone(), second.clone()]).await.unwrap();
    assert_eq!(docs, vec![json!({ "a": "one" }), json!({ "a": "two" })]);

    let missing = first.with_file_name("tessel-missing.json");
    assert!(read_documents(&[second.clone(), missing]).await.is_err());

    std::fs::remove_file(first).unwrap();
    std::fs::remove_file(second).unwrap();
  }

  #[test]
  fn test_parse_view() {
    assert_eq!(parse_view("trigger_form"), Ok(ViewKind::TriggerForm));
    assert!(parse_view("form").is_err());
  }
}
