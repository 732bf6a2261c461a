use clap::{Parser, Subcommand};
use fieldsmith::cli;
use fieldsmith::client::DEFAULT_ENDPOINT;
use fieldsmith::types::RunConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fieldsmith")]
#[command(about = "Materialize form fields from a CSV template, in dependency order")]
#[command(long_about = "Fieldsmith - CSV templates to remote form fields, created in dependency order

Reads a CSV describing the fields of a form and creates them in a remote
app definition through the platform API. Formulas and display conditions
may reference other rows with {N} placeholders; fields are created after
the fields they depend on, and each placeholder is rewritten to the
remote identifier as soon as it is known.

COMMANDS:
  push  - Create every field from the template on the remote app
  plan  - Show the dependency-resolved creation order
  check - Validate a template without making remote calls

EXAMPLES:
  fieldsmith check template.csv
  fieldsmith plan template.csv --verbose
  fieldsmith push template.csv --app-id UNT439473 --workplace-id DE04924 \\
      --requesting-user ops@example.com

The API key is read from --api-key or the FIELDSMITH_API_KEY environment
variable.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Create every field from the template on the remote app.

Fields are created one at a time, in dependency order, so a formula that
references another field is only submitted once that field's identifier
is known. A failed row does not stop the run: independent rows still
materialize, and rows depending on the failed one are reported as
skipped. Nothing is rolled back.

Use --dry-run to see the plan without making any remote call.

Use --two-pass for templates whose references cannot all be extracted up
front: every field is first created with its raw text, then updated with
fully resolved references once all identifiers exist. Every field is
written twice in that mode.")]
    /// Create every field from the template on the remote app
    Push {
        /// Path to the CSV template
        file: PathBuf,

        /// Target app ID
        #[arg(long, env = "FIELDSMITH_APP_ID")]
        app_id: String,

        /// Workplace the app belongs to
        #[arg(long, env = "FIELDSMITH_WORKPLACE_ID")]
        workplace_id: String,

        /// API key, sent as the x-api-key header
        #[arg(long, env = "FIELDSMITH_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Email address the changes are attributed to
        #[arg(long, env = "FIELDSMITH_USER")]
        requesting_user: String,

        /// Base URL of the app-definition API
        #[arg(long, env = "FIELDSMITH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Create all fields first, then update them with resolved references
        #[arg(long)]
        two_pass: bool,

        /// Show the plan without making remote calls
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show formulas and display conditions in the output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the dependency-resolved creation order
    Plan {
        /// Path to the CSV template
        file: PathBuf,

        /// Show formulas and display conditions in the output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a template without making remote calls
    Check {
        /// Path to the CSV template
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Push {
            file,
            app_id,
            workplace_id,
            api_key,
            requesting_user,
            endpoint,
            two_pass,
            dry_run,
            verbose,
        } => {
            let config = RunConfig {
                app_id,
                workplace_id,
                api_key,
                requesting_user,
                endpoint,
            };
            cli::push(file, config, two_pass, dry_run, verbose)
        }

        Commands::Plan { file, verbose } => cli::plan(file, verbose),

        Commands::Check { file } => cli::check(file),
    }?;

    Ok(())
}
