use clap::{Parser, Subcommand};
use mailbench::compile::{self, CommandCompiler};
use mailbench::config::{self, PipelineConfig};
use mailbench::mail::{self, SmtpMailer};
use mailbench::{output, preview};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// SMTP overrides shared by `send` and `send-all`.
#[derive(clap::Args, Clone, Default)]
struct SmtpArgs {
    /// SMTP host (Mailpit default: localhost)
    #[arg(long)]
    host: Option<String>,
    /// SMTP port (Mailpit default: 1025)
    #[arg(long)]
    port: Option<u16>,
    /// Use implicit TLS (usually with port 465)
    #[arg(long)]
    secure: bool,
    /// SMTP username (or API key)
    #[arg(long)]
    user: Option<String>,
    /// SMTP password / token
    #[arg(long)]
    pass: Option<String>,
    /// From header
    #[arg(long)]
    from: Option<String>,
}

#[derive(Parser)]
#[command(name = "mailbench")]
#[command(about = "Build, preview and send MJML email templates")]
#[command(long_about = "\
Build, preview and send MJML email templates

Project structure:

  src/templates/
  ├── welcome.mjml                 # MJML template with Handlebars placeholders
  ├── welcome.subject.txt          # Subject template (optional)
  └── welcome.preheader.txt        # Preheader template (optional)
  data/
  ├── welcome.default.json         # One file per variant
  └── welcome.vip.json

Pipeline:
  build      src/templates + data → dist/<template>.<variant>.html
  preview    dist → public/previews (manifest.json, config.json, copies)
  send-all   dist/*.html → SMTP

Preheader resolution (first available wins):
  <name>.preheader.txt → hidden display:none block → visible body text

Run 'mailbench gen-config' to generate a documented mailbench.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile every template against every data variant
    Build {
        /// Build a single template (requires --data and --out)
        #[arg(long, requires_all = ["data", "out"])]
        template: Option<String>,
        /// Data file for single-template mode
        #[arg(long, requires_all = ["template", "out"])]
        data: Option<PathBuf>,
        /// Output HTML file for single-template mode
        #[arg(long, requires_all = ["template", "data"])]
        out: Option<PathBuf>,
    },
    /// Prepare the preview serving directory from compiled output
    Preview,
    /// Send one HTML file
    Send {
        /// HTML file to send
        #[arg(long)]
        file: PathBuf,
        /// Recipient(s), comma-separated
        #[arg(long)]
        to: String,
        #[arg(long, default_value = mail::DEFAULT_SUBJECT)]
        subject: String,
        #[command(flatten)]
        smtp: SmtpArgs,
    },
    /// Send every compiled email matching a glob
    SendAll {
        /// Recipient(s); repeatable and comma-separated
        #[arg(long)]
        to: Vec<String>,
        /// Glob of HTML files to send
        #[arg(long)]
        glob: Option<String>,
        /// Globs to exclude (replaces the configured list)
        #[arg(long)]
        exclude: Vec<String>,
        /// Subject prefix, e.g. "[DEV] "
        #[arg(long)]
        subject_prefix: Option<String>,
        /// List emails that would be sent, but do not send
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        smtp: SmtpArgs,
    },
    /// Print a stock mailbench.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Default `warn`, `info` with `--verbose`; `RUST_LOG` wins when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let load = || config::load_config(&cli.config);

    match cli.command {
        Command::Build {
            template,
            data,
            out,
        } => {
            let cfg = load()?;
            let compiler = CommandCompiler::from_config(&cfg.build);
            if let (Some(template), Some(data), Some(out)) = (template, data, out) {
                let build = compile::build_one(&cfg.paths.templates, &template, &data, &out, &compiler)?;
                let report = compile::BuildReport {
                    templates: vec![build],
                };
                output::print_build_output(&report);
            } else {
                let report = compile::build_all(&cfg.paths, &cfg.build, &compiler)?;
                output::print_build_output(&report);
            }
        }
        Command::Preview => {
            let cfg = load()?;
            let report = preview::prepare(&cfg.paths.dist, &cfg.serving_dir(), &cfg.preview)?;
            output::print_preview_output(&report);
        }
        Command::Send {
            file,
            to,
            subject,
            smtp,
        } => {
            let mut cfg = load()?;
            apply_smtp_args(&mut cfg, smtp)?;
            let mailer = SmtpMailer::from_config(&cfg.smtp)?;
            let sent = mail::send_file(&file, &[to], &subject, &cfg.send.from, &mailer)?;
            output::print_lines(&output::format_sent_one(&sent));
        }
        Command::SendAll {
            to,
            glob,
            exclude,
            subject_prefix,
            dry_run,
            smtp,
        } => {
            let mut cfg = load()?;
            apply_smtp_args(&mut cfg, smtp)?;
            if let Some(glob) = glob {
                cfg.send.include = glob;
            }
            if !exclude.is_empty() {
                cfg.send.exclude = exclude;
            }
            if let Some(prefix) = subject_prefix {
                cfg.send.subject_prefix = prefix;
            }

            let plan = mail::plan_send_all(
                &cfg.send.include,
                &cfg.send.exclude,
                &cfg.send.subject_prefix,
                &to,
            )?;
            output::print_lines(&output::format_send_plan(&plan, dry_run));
            if dry_run || plan.emails.is_empty() {
                return Ok(());
            }
            let mailer = SmtpMailer::from_config(&cfg.smtp)?;
            let sent = mail::deliver_all(&plan, &cfg.send.from, &mailer)?;
            output::print_lines(&output::format_sent(&sent));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Layer CLI SMTP flags over the loaded config and re-validate.
fn apply_smtp_args(cfg: &mut PipelineConfig, args: SmtpArgs) -> Result<(), config::ConfigError> {
    if let Some(host) = args.host {
        cfg.smtp.host = host;
    }
    if let Some(port) = args.port {
        cfg.smtp.port = port;
    }
    if args.secure {
        cfg.smtp.secure = true;
    }
    if args.user.is_some() {
        cfg.smtp.user = args.user;
    }
    if args.pass.is_some() {
        cfg.smtp.pass = args.pass;
    }
    if let Some(from) = args.from {
        cfg.send.from = from;
    }
    cfg.validate()
}
